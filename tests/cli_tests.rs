// tests/cli_tests.rs
#![cfg(feature = "cli")]

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use mdcalc::cli::{BuildOptions, CheckOptions, CliError, RESULT_FILE, execute_build, execute_check};
use mdcalc::units::{OPERATIONS_FILE, Prompt, UNITS_FILE};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mdcalc-cli-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn build_options(dir: &PathBuf) -> BuildOptions {
    BuildOptions {
        dir: dir.clone(),
        problem: "Problem".into(),
        title: "Week 1".into(),
        decimal_separator: ',',
    }
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn test_build_renders_documents_in_order() {
    let dir = temp_dir("order");
    fs::write(dir.join("1.mdc"), "|\nT first").unwrap();
    fs::write(dir.join("2.mdc"), "|\nT second").unwrap();
    // not reached: 3.mdc is missing
    fs::write(dir.join("4.mdc"), "T skipped").unwrap();

    let report = execute_build(&build_options(&dir), None).unwrap();
    assert_eq!(report.documents, 2);
    assert_eq!(report.output, dir.join(RESULT_FILE));

    let result = fs::read_to_string(dir.join(RESULT_FILE)).unwrap();
    assert_eq!(
        result,
        "<span style=\"font-size:0\">\n# Week 1\n</span>\n\n\
         # Problem 1\n### 1.1  \nfirst  \n\n\
         # Problem 2\n### 2.1  \nsecond  \n\n"
    );
}

#[test]
fn test_documents_do_not_share_variables() {
    let dir = temp_dir("scope");
    fs::write(dir.join("1.mdc"), "C x = 1").unwrap();
    fs::write(dir.join("2.mdc"), "C x + 1").unwrap();

    let report = execute_build(&build_options(&dir), None).unwrap();
    assert_eq!(report.failures.len(), 1);
    let (file, failure) = &report.failures[0];
    assert_eq!(file, &dir.join("2.mdc"));
    assert_eq!(failure.line, 0);
}

#[test]
fn test_units_are_shared_between_documents() {
    let dir = temp_dir("units");
    fs::write(dir.join("1.mdc"), "C 6 m / 2 s").unwrap();
    fs::write(dir.join("2.mdc"), "C 6 m / 2 s").unwrap();

    let asked = Rc::new(RefCell::new(Vec::<String>::new()));
    let log = Rc::clone(&asked);
    let prompt: Prompt = Box::new(move |question: &str| {
        log.borrow_mut().push(question.to_string());
        let answer = if question.starts_with("name") { "unit" } else { "mps" };
        Some(answer.to_string())
    });
    let report = execute_build(&build_options(&dir), Some(prompt)).unwrap();
    assert!(report.failures.is_empty());
    assert!(report.warnings.is_empty());

    // everything is asked while rendering the first document
    assert_eq!(
        *asked.borrow(),
        vec![
            "determine unit result of 'm' / 's': ".to_string(),
            "name unit 'm': ".to_string(),
            "name unit 's': ".to_string(),
            "name unit 'mps': ".to_string(),
        ]
    );
    assert_eq!(
        fs::read_to_string(dir.join(OPERATIONS_FILE)).unwrap(),
        "m / s mps\n"
    );
    assert_eq!(
        fs::read_to_string(dir.join(UNITS_FILE)).unwrap(),
        "m unit\ns unit\nmps unit\n"
    );
}

#[test]
fn test_malformed_document_aborts() {
    let dir = temp_dir("malformed");
    fs::write(dir.join("1.mdc"), "T fine\n? what").unwrap();

    match execute_build(&build_options(&dir), None) {
        Err(CliError::Document { file, .. }) => assert_eq!(file, dir.join("1.mdc")),
        other => panic!("expected a document error, got {:?}", other),
    }
    assert!(!dir.join(RESULT_FILE).exists());
}

#[test]
fn test_empty_project() {
    let dir = temp_dir("none");
    let report = execute_build(&build_options(&dir), None).unwrap();
    assert_eq!(report.documents, 0);
    assert_eq!(
        fs::read_to_string(dir.join(RESULT_FILE)).unwrap(),
        "<span style=\"font-size:0\">\n# Week 1\n</span>\n\n"
    );
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_check_shares_one_environment() {
    let options = CheckOptions {
        expressions: vec!["x = 5 m".into(), "x * 2".into(), "y".into()],
        ..CheckOptions::default()
    };
    let result = execute_check(&options).unwrap();
    assert_eq!(result.lines.len(), 3);

    let second = result.lines[1].outcome.as_ref().unwrap();
    assert_eq!(second.value, 10.0);
    assert_eq!(second.unit, "m");
    assert!(second.markup.starts_with("$$\n\\begin{align*}"));

    assert!(result.lines[2].outcome.is_err());
    assert!(result.failed());
}

#[test]
fn test_check_without_input() {
    assert!(matches!(
        execute_check(&CheckOptions::default()),
        Err(CliError::NoInput)
    ));
}
