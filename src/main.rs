use clap::{Parser as ClapParser, Subcommand};
use mdcalc::cli::{self, BuildOptions, CheckOptions, CheckResult, CliError};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "mdcalc")]
#[command(about = "mdcalc - Compile calculation documents into markdown with LaTeX math")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render 1.mdc, 2.mdc, ... of a directory into Result.md
    Build {
        /// Project directory with the documents and unit tables
        dir: PathBuf,

        /// Problem name, numbered per document
        problem: String,

        /// Title of the result
        title: String,

        /// Write decimals with a point instead of a comma
        #[arg(long)]
        decimal_point: bool,

        /// Never ask for unknown units
        #[arg(long)]
        no_prompt: bool,
    },

    /// Evaluate calculations and print their results
    Check {
        /// The calculation (reads one per line from stdin if not provided)
        expression: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Write decimals with a point instead of a comma
        #[arg(long)]
        decimal_point: bool,
    },
}

fn separator(decimal_point: bool) -> char {
    if decimal_point { '.' } else { ',' }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            dir,
            problem,
            title,
            decimal_point,
            no_prompt,
        } => run_build(
            BuildOptions {
                dir,
                problem,
                title,
                decimal_separator: separator(decimal_point),
            },
            !no_prompt && atty::is(atty::Stream::Stdin),
        ),
        Commands::Check {
            expression,
            json,
            decimal_point,
        } => run_check(expression, json, separator(decimal_point)),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Asks on the terminal; an empty answer is no answer.
fn ask(message: &str) -> Option<String> {
    print!("{}", message);
    io::stdout().flush().ok()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).ok()?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

fn run_build(options: BuildOptions, interactive: bool) -> Result<bool, CliError> {
    let prompt: Option<mdcalc::units::Prompt> = if interactive {
        Some(Box::new(ask))
    } else {
        None
    };
    let report = cli::execute_build(&options, prompt)?;

    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    for (file, failure) in &report.failures {
        eprintln!("{}: {}", file.display(), failure);
    }
    println!(
        "Wrote {} ({} document(s))",
        report.output.display(),
        report.documents
    );
    Ok(report.failures.is_empty())
}

fn run_check(expression: Option<String>, json: bool, decimal_separator: char) -> Result<bool, CliError> {
    let expressions = match expression {
        Some(code) => vec![code],
        None if !atty::is(atty::Stream::Stdin) => io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect(),
        None => vec![],
    };

    let options = CheckOptions {
        expressions,
        decimal_separator,
    };
    let result = cli::execute_check(&options)?;

    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    if json {
        print_json(&result);
    } else {
        print_text(&result);
    }
    Ok(!result.failed())
}

fn print_json(result: &CheckResult) {
    let lines: Vec<serde_json::Value> = result
        .lines
        .iter()
        .map(|line| match &line.outcome {
            Ok(value) => json!({
                "code": line.code,
                "value": value.value,
                "unit": value.unit,
                "markup": value.markup,
            }),
            Err(e) => json!({
                "code": line.code,
                "error": e.to_string(),
            }),
        })
        .collect();
    println!("{}", serde_json::Value::Array(lines));
}

fn print_text(result: &CheckResult) {
    for (i, line) in result.lines.iter().enumerate() {
        match &line.outcome {
            Ok(value) if value.unit.is_empty() => println!("{}", value.value),
            Ok(value) => println!("{} {}", value.value, value.unit),
            Err(e) => eprintln!("error on line {}: {}", i + 1, e),
        }
    }
}
