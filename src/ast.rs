//! # mdcalc Calculation Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the syntax tree of the small
//! calculation language used inside `C` lines of an `.mdc` document.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes built by the parser
//! - **[annotation]** - Captions and display precision attached to comments
//!
//! ## Quick Start
//!
//! ```text
//! F = m * a : #1 force on the cart
//! ```
//!
//! This assigns `m * a` to `F` and shows the result rounded to one decimal
//! place, captioned "force on the cart".
//!
//! ## Core Concepts
//!
//! ### Units
//!
//! An identifier written directly after a value is its unit:
//!
//! ```text
//! 5 m + 3 m
//! (a + b)kg
//! ```
//!
//! ### Steps
//!
//! A comment inside a parenthesis marks an intermediate result that gets its
//! own line in the rendered output:
//!
//! ```text
//! (w * h : area) * d
//! ```
//!
//! ### Functions
//!
//! Functions are called by name immediately followed by `(`. There is no
//! unary minus operator; negation is written `neg(x)`.
pub mod annotation;
pub mod expressions;
pub mod tokens;

pub use annotation::Annotation;
pub use expressions::Expr;
pub use tokens::Token;
