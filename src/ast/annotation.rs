use std::sync::LazyLock;

use regex::Regex;

/// Decimal places used for a result line when the comment asks for none.
pub const DEFAULT_PRECISION: u32 = 2;

static PRECISION_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(\d+)(?:\s+|$)").expect("valid precision directive pattern"));

/// Caption and display precision carried by a comment node.
///
/// # Examples
/// ```
/// use mdcalc::ast::Annotation;
///
/// let a = Annotation::parse("#3 stress in the rod");
/// assert_eq!(a.precision, 3);
/// assert_eq!(a.caption, "stress in the rod");
///
/// let b = Annotation::parse("initial value");
/// assert_eq!(b.precision, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub caption: String,
    pub precision: u32,
}

impl Annotation {
    /// Reads the text of a comment token; a leading `#N` sets the precision.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some(found) = PRECISION_DIRECTIVE.captures(text)
            && let Ok(precision) = found[1].parse::<u32>()
        {
            return Annotation {
                caption: text[found[0].len()..].trim().to_string(),
                precision,
            };
        }
        Annotation {
            caption: text.to_string(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Default for Annotation {
    fn default() -> Self {
        Annotation {
            caption: String::new(),
            precision: DEFAULT_PRECISION,
        }
    }
}
