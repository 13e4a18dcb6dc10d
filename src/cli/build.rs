//! Build every document of a project directory into one markdown file

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::CliError;
use crate::{
    BlockFailure, DocumentOptions, Environment, LatexFormatter, UnitError, render_document,
    units::{Prompt, SavedUnitLibrary, UnitLibrary},
};

/// Output file written into the project directory
pub const RESULT_FILE: &str = "Result.md";

/// Options for the build command
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding `1.mdc`, `2.mdc`, ... and the unit tables
    pub dir: PathBuf,
    /// Problem name; document `n` is headed `<problem> <n>`
    pub problem: String,
    /// Title of the result, hidden in the rendered page
    pub title: String,
    /// Character between integer and fractional digits
    pub decimal_separator: char,
}

/// What a build produced
#[derive(Debug)]
pub struct BuildReport {
    /// Path of the written result
    pub output: PathBuf,
    /// Number of documents rendered
    pub documents: usize,
    /// Failed calculation blocks, with the document they are in
    pub failures: Vec<(PathBuf, BlockFailure)>,
    /// Unit problems; the affected units are rendered empty
    pub warnings: Vec<UnitError>,
}

fn document_path(dir: &Path, n: usize) -> PathBuf {
    dir.join(format!("{}.mdc", n))
}

fn preamble(title: &str) -> String {
    format!("<span style=\"font-size:0\">\n# {}\n</span>\n\n", title)
}

/// Execute a build: renders `1.mdc`, `2.mdc`, ... until the first missing
/// file and writes them, in order, to [`RESULT_FILE`].
///
/// Every document gets a fresh variable store; the unit tables of the
/// directory are shared by all of them. A malformed document line aborts
/// the build before anything is written.
pub fn execute_build(options: &BuildOptions, prompt: Option<Prompt>) -> Result<BuildReport, CliError> {
    let mut library = SavedUnitLibrary::open(&options.dir)?;
    if let Some(prompt) = prompt {
        library = library.with_prompt(prompt);
    }
    let mut units: Box<dyn UnitLibrary> = Box::new(library);

    let mut output = preamble(&options.title);
    let mut failures = vec![];
    let mut warnings = vec![];
    let mut n = 1;

    loop {
        let path = document_path(&options.dir, n);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => return Err(CliError::Io(e)),
        };

        let document_options =
            DocumentOptions::new(&format!("{} {}", options.problem, n), &format!("{}.<n>", n));
        let mut env = Environment::new(units)
            .with_formatter(LatexFormatter::with_decimal_separator(options.decimal_separator));
        let rendered = render_document(&source, &document_options, &mut env).map_err(|error| {
            CliError::Document {
                file: path.clone(),
                error,
            }
        })?;

        output.push_str(&rendered.markdown);
        output.push_str("  \n\n");
        failures.extend(rendered.failures.into_iter().map(|f| (path.clone(), f)));
        warnings.extend(env.take_diagnostics());
        units = env.into_units();
        n += 1;
    }

    let result = options.dir.join(RESULT_FILE);
    fs::write(&result, output)?;
    Ok(BuildReport {
        output: result,
        documents: n - 1,
        failures,
        warnings,
    })
}
