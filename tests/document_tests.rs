// tests/document_tests.rs

use mdcalc::units::SimpleUnitLibrary;
use mdcalc::{
    CalcError, DocumentError, DocumentOptions, Environment, EvalError, RenderedDocument,
    render_document,
};

fn render(source: &str) -> Result<RenderedDocument, DocumentError> {
    let mut env = Environment::new(Box::new(SimpleUnitLibrary));
    let options = DocumentOptions::new("Problem 1", "1.<n>");
    render_document(source, &options, &mut env)
}

// ============================================================================
// Line Kinds
// ============================================================================

#[test]
fn test_text_lines() {
    let doc = render("T Hello world\nT second line").unwrap();
    assert_eq!(doc.markdown, "  \nHello world  \nsecond line");
    assert!(doc.failures.is_empty());
}

#[test]
fn test_empty_lines_are_line_breaks() {
    let doc = render("T a\n\nT b").unwrap();
    assert_eq!(doc.markdown, "  \na  \n  \nb");
}

#[test]
fn test_image_line() {
    let doc = render("I figures/cart.png").unwrap();
    assert_eq!(doc.markdown, "  \n![Image!](figures/cart.png)");
}

#[test]
fn test_calculation_line() {
    let doc = render("C 1+1").unwrap();
    assert!(doc.markdown.starts_with("  \n$$\n\\begin{align*}\n"));
    assert!(doc.markdown.ends_with("\\end{align*}\n$$"));
}

#[test]
fn test_windows_line_endings() {
    let doc = render("T a\r\nT b\r\n").unwrap();
    assert_eq!(doc.markdown, "  \na  \nb  \n");
}

// ============================================================================
// Headers
// ============================================================================

#[test]
fn test_first_header_replaces_preceding_output() {
    let doc = render("T intro\n|\nT part one\n|\nT part two").unwrap();
    assert_eq!(
        doc.markdown,
        "# Problem 1\n### 1.1  \npart one  \n### 1.2  \npart two"
    );
}

// ============================================================================
// Variables and Failures
// ============================================================================

#[test]
fn test_blocks_share_variables() {
    let mut env = Environment::new(Box::new(SimpleUnitLibrary));
    let options = DocumentOptions::new("P", "<n>");
    let doc = render_document("C x = 2\nC y = x * 3", &options, &mut env).unwrap();
    assert!(doc.failures.is_empty());
    assert_eq!(env.variable("y").unwrap().value, 6.0);
}

#[test]
fn test_failed_block_continues() {
    let doc = render("T start\nC y + 1\nC 2*2").unwrap();
    assert!(doc.markdown.contains(
        "### <span style=\"color:red\">Error: variable 'y' undefined</span>"
    ));
    assert!(doc.markdown.ends_with("\\end{align*}\n$$"));

    assert_eq!(doc.failures.len(), 1);
    let failure = &doc.failures[0];
    assert_eq!(failure.line, 1);
    assert_eq!(
        failure.error,
        CalcError::Eval(EvalError::UndefinedVariable("y".into()))
    );
    assert_eq!(failure.to_string(), "error on line 2: variable 'y' undefined");
}

#[test]
fn test_syntax_error_marker() {
    let doc = render("C 5+").unwrap();
    assert!(doc.markdown.contains(
        "Error: syntax error: operator '+' is missing an operand"
    ));
}

// ============================================================================
// Malformed Documents
// ============================================================================

#[test]
fn test_invalid_prefix() {
    let error = render("T fine\nX nope").unwrap_err();
    assert_eq!(error, DocumentError::InvalidPrefix { line: 1 });
    assert_eq!(
        error.to_string(),
        "error on line 2: Every line must start with either T, I, C or |"
    );
}

#[test]
fn test_text_line_without_text() {
    assert_eq!(render("T"), Err(DocumentError::MissingText { line: 0 }));
    assert_eq!(render("T "), Err(DocumentError::MissingText { line: 0 }));
}
