//! CLI support for mdcalc
//!
//! The commands of the `mdcalc` binary as library functions, so they can be
//! driven without a terminal.

mod build;
mod check;

pub use build::{BuildOptions, BuildReport, RESULT_FILE, execute_build};
pub use check::{CheckOptions, CheckResult, execute_check};

use std::{io, path::PathBuf};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// A document line is malformed
    Document { file: PathBuf, error: crate::DocumentError },
    /// The unit tables could not be loaded
    Units(crate::UnitError),
    /// IO error
    Io(io::Error),
    /// No expression given and nothing piped to stdin
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Document { file, error } => write!(f, "{}: {}", file.display(), error),
            CliError::Units(e) => write!(f, "Unit tables: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Pass an expression or pipe lines to stdin.")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Document { error, .. } => Some(error),
            CliError::Units(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::UnitError> for CliError {
    fn from(e: crate::UnitError) -> Self {
        CliError::Units(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
