//! Unit algebra backends.
//!
//! The engine treats units as opaque tags. How two units combine under an
//! operator and how a unit is displayed is decided by a [`UnitLibrary`].
mod saved;
mod simple;

pub use saved::{OPERATIONS_FILE, Prompt, SavedUnitLibrary, UNITS_FILE};
pub use simple::SimpleUnitLibrary;

use std::{fmt, io, path::PathBuf};

/// Explicit unit that removes the unit of its value.
pub const NO_UNIT: &str = "None";

/// Answers unit questions for the engine.
pub trait UnitLibrary {
    /// Name shown in the output for `unit`.
    fn display_name(&mut self, unit: &str) -> Result<String, UnitError>;

    /// Unit of `left operator right`. `order_matters` is false for
    /// commutative operators, so a library may look the pair up either way.
    fn combine(
        &mut self,
        left: &str,
        right: &str,
        operator: &str,
        order_matters: bool,
    ) -> Result<String, UnitError>;
}

/// Operator under which unit tables are keyed; remainder and inline
/// division give the units of a division.
pub fn normalize_operator(operator: &str) -> &str {
    match operator {
        "%" | "//" => "/",
        other => other,
    }
}

/// A unit could not be resolved or stored. Never fatal for a calculation.
#[derive(Debug)]
pub enum UnitError {
    /// No display name is known and none could be asked for
    UnknownName(String),

    /// No result is known for the combination and none could be asked for
    Unresolved {
        left: String,
        operator: String,
        right: String,
    },

    /// A line of a unit table file is malformed
    InvalidRecord { file: PathBuf, line: usize },

    /// Reading or appending a unit table file failed
    Io { file: PathBuf, error: io::Error },
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::UnknownName(unit) => write!(f, "no display name for unit '{}'", unit),
            UnitError::Unresolved {
                left,
                operator,
                right,
            } => write!(
                f,
                "unit result of '{}' {} '{}' is unknown",
                left, operator, right
            ),
            UnitError::InvalidRecord { file, line } => {
                write!(f, "line {} of {} is invalid", line, file.display())
            }
            UnitError::Io { file, error } => write!(f, "{}: {}", file.display(), error),
        }
    }
}

impl std::error::Error for UnitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UnitError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}
