use std::{
    collections::HashMap,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use super::{UnitError, UnitLibrary, normalize_operator};

/// Display names, one `unit display name` record per line.
pub const UNITS_FILE: &str = "units.txt";

/// Unit results, one `left operator right result` record per line.
pub const OPERATIONS_FILE: &str = "operators.txt";

/// Asks an operator for a missing answer; `None` means no answer.
pub type Prompt = Box<dyn FnMut(&str) -> Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Operation {
    left: String,
    right: String,
    operator: String,
}

impl Operation {
    fn new(left: &str, right: &str, operator: &str) -> Self {
        Operation {
            left: left.to_string(),
            right: right.to_string(),
            operator: operator.to_string(),
        }
    }
}

/// Unit tables kept in two plain text files inside a project directory.
///
/// Missing entries are asked for through the prompt, if one is attached,
/// and appended to the files so the question is only asked once.
///
/// # Examples
///
/// ```no_run
/// use mdcalc::units::{SavedUnitLibrary, UnitLibrary};
///
/// let mut units = SavedUnitLibrary::open("problems/week1").unwrap();
/// let speed = units.combine("m", "s", "/", true);
/// ```
pub struct SavedUnitLibrary {
    names: HashMap<String, String>,
    operations: HashMap<Operation, String>,
    names_path: PathBuf,
    operations_path: PathBuf,
    prompt: Option<Prompt>,
}

impl SavedUnitLibrary {
    /// Loads the tables of `dir`. Missing files are empty tables.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, UnitError> {
        let names_path = dir.as_ref().join(UNITS_FILE);
        let operations_path = dir.as_ref().join(OPERATIONS_FILE);
        let names = load_names(&names_path, &read_table(&names_path)?)?;
        let operations = load_operations(&operations_path, &read_table(&operations_path)?)?;
        Ok(SavedUnitLibrary {
            names,
            operations,
            names_path,
            operations_path,
            prompt: None,
        })
    }

    pub fn with_prompt(mut self, prompt: impl FnMut(&str) -> Option<String> + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    fn ask(&mut self, message: &str) -> Option<String> {
        self.prompt.as_mut().and_then(|prompt| prompt(message))
    }
}

impl UnitLibrary for SavedUnitLibrary {
    fn display_name(&mut self, unit: &str) -> Result<String, UnitError> {
        if unit.is_empty() {
            return Ok(String::new());
        }
        if let Some(name) = self.names.get(unit) {
            return Ok(name.clone());
        }
        let name = self
            .ask(&format!("name unit '{}': ", unit))
            .ok_or_else(|| UnitError::UnknownName(unit.to_string()))?;
        self.names.insert(unit.to_string(), name.clone());
        append_record(&self.names_path, &format!("{} {}", unit, name))?;
        Ok(name)
    }

    fn combine(
        &mut self,
        left: &str,
        right: &str,
        operator: &str,
        order_matters: bool,
    ) -> Result<String, UnitError> {
        let operator = normalize_operator(operator);
        if let Some(result) = self.operations.get(&Operation::new(left, right, operator)) {
            return Ok(result.clone());
        }
        if !order_matters
            && let Some(result) = self.operations.get(&Operation::new(right, left, operator))
        {
            return Ok(result.clone());
        }

        let unresolved = || UnitError::Unresolved {
            left: left.to_string(),
            operator: operator.to_string(),
            right: right.to_string(),
        };
        let result = self
            .ask(&format!(
                "determine unit result of '{}' {} '{}': ",
                left, operator, right
            ))
            .ok_or_else(unresolved)?;
        // records are space separated
        if result.contains(char::is_whitespace) {
            return Err(unresolved());
        }
        self.operations
            .insert(Operation::new(left, right, operator), result.clone());
        append_record(
            &self.operations_path,
            &format!("{} {} {} {}", left, operator, right, result),
        )?;
        Ok(result)
    }
}

fn read_table(path: &Path) -> Result<String, UnitError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(error) => Err(UnitError::Io {
            file: path.to_path_buf(),
            error,
        }),
    }
}

fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| (i + 1, line))
}

fn load_names(path: &Path, text: &str) -> Result<HashMap<String, String>, UnitError> {
    let mut names = HashMap::new();
    for (line, record) in records(text) {
        let (unit, name) = record.split_once(' ').ok_or_else(|| UnitError::InvalidRecord {
            file: path.to_path_buf(),
            line,
        })?;
        names.insert(unit.to_string(), name.to_string());
    }
    Ok(names)
}

fn load_operations(path: &Path, text: &str) -> Result<HashMap<Operation, String>, UnitError> {
    let mut operations = HashMap::new();
    for (line, record) in records(text) {
        let fields: Vec<&str> = record.split(' ').collect();
        let [left, operator, right, result] = fields.as_slice() else {
            return Err(UnitError::InvalidRecord {
                file: path.to_path_buf(),
                line,
            });
        };
        operations.insert(Operation::new(left, right, operator), result.to_string());
    }
    Ok(operations)
}

fn append_record(path: &Path, record: &str) -> Result<(), UnitError> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "{}", record))
        .map_err(|error| UnitError::Io {
            file: path.to_path_buf(),
            error,
        })
}
