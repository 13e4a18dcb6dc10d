//! Markdown rendering of `.mdc` documents.
//!
//! A document is line based. The first character of a line selects its
//! kind:
//!
//! | Prefix | Line                                             |
//! |--------|--------------------------------------------------|
//! | `T`    | text, copied as is                               |
//! | `I`    | image path                                       |
//! | `C`    | calculation block                                |
//! | `\|`   | subproblem header                                |
//!
//! The content starts after the prefix and one separator character.
use std::fmt;

use crate::environment::{CalcError, Environment};

/// Line break emitted before every line of the input.
const LINE_BREAK: &str = "  \n";

/// Placeholder of the subproblem template replaced by the running index.
pub const INDEX_PLACEHOLDER: &str = "<n>";

/// Headings used by a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Title written once, at the first subproblem header
    pub header: String,
    /// Subproblem heading; `<n>` is replaced by 1, 2, ...
    pub subproblem: String,
}

impl DocumentOptions {
    pub fn new(header: &str, subproblem: &str) -> Self {
        DocumentOptions {
            header: header.to_string(),
            subproblem: subproblem.to_string(),
        }
    }
}

/// A calculation block that failed; the document shows an error in its place.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFailure {
    /// 0-based line of the block
    pub line: usize,
    pub error: CalcError,
}

impl fmt::Display for BlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error on line {}: {}", self.line + 1, self.error)
    }
}

impl std::error::Error for BlockFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub markdown: String,
    pub failures: Vec<BlockFailure>,
}

/// Malformed document line. Unlike a failing calculation this stops the
/// whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// Line starting with an unknown prefix (0-based line)
    InvalidPrefix { line: usize },

    /// `T` line without any text (0-based line)
    MissingText { line: usize },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::InvalidPrefix { line } => write!(
                f,
                "error on line {}: Every line must start with either T, I, C or |",
                line + 1
            ),
            DocumentError::MissingText { line } => write!(
                f,
                "error on line {}: Text lines must start with a T followed by a space followed by text",
                line + 1
            ),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Renders one document with `env`, which holds the variables of all its
/// calculation blocks.
///
/// # Examples
///
/// ```
/// use mdcalc::Environment;
/// use mdcalc::document::{render_document, DocumentOptions};
/// use mdcalc::units::SimpleUnitLibrary;
///
/// let mut env = Environment::new(Box::new(SimpleUnitLibrary));
/// let options = DocumentOptions::new("Problem 1", "1.<n>");
/// let source = "| \nT Find the area.\nC a = 3 * 4 : area";
/// let doc = render_document(source, &options, &mut env).unwrap();
///
/// assert!(doc.markdown.starts_with("# Problem 1\n### 1.1"));
/// assert!(doc.failures.is_empty());
/// ```
pub fn render_document(
    source: &str,
    options: &DocumentOptions,
    env: &mut Environment,
) -> Result<RenderedDocument, DocumentError> {
    let mut markdown = String::new();
    let mut failures = vec![];
    let mut started = false;
    let mut index = 1;

    for (line, text) in source.split('\n').enumerate() {
        let text = text.trim_end_matches('\r');
        markdown.push_str(LINE_BREAK);
        let Some(prefix) = text.chars().next() else {
            continue;
        };
        let content: String = text.chars().skip(2).collect();
        let content = content.trim();

        match prefix {
            '|' => {
                if !started {
                    markdown.clear();
                    markdown.push_str(&format!("# {}\n", options.header));
                    started = true;
                }
                markdown.push_str("### ");
                markdown.push_str(
                    &options
                        .subproblem
                        .replace(INDEX_PLACEHOLDER, &index.to_string()),
                );
                index += 1;
            }
            'T' => {
                if text.chars().count() < 3 {
                    return Err(DocumentError::MissingText { line });
                }
                markdown.push_str(content);
            }
            'I' => markdown.push_str(&format!("![Image!]({})", content)),
            'C' => {
                if let Err(error) = env.write_calculation(content, &mut markdown) {
                    markdown.push_str(&format!(
                        "### <span style=\"color:red\">Error: {}</span>",
                        error
                    ));
                    failures.push(BlockFailure { line, error });
                }
            }
            _ => return Err(DocumentError::InvalidPrefix { line }),
        }
    }

    Ok(RenderedDocument { markdown, failures })
}
