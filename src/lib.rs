pub mod ast;
pub mod builtins;
pub mod document;
pub mod environment;
pub mod evaluator;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod resolve;
pub mod units;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Annotation, Expr, Token};
pub use document::{BlockFailure, DocumentError, DocumentOptions, RenderedDocument, render_document};
pub use environment::{CalcError, Calculation, Environment, FunctionDef, OperatorDef};
pub use evaluator::{EvalError, Evaluation, MathError};
pub use format::{Formatter, LatexFormatter, Precision};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser};
pub use units::{SavedUnitLibrary, SimpleUnitLibrary, UnitError, UnitLibrary};
pub use value::Variable;
