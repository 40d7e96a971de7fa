//! Semantic analysis for the Aspen language.
//!
//! Two passes over the AST, in order:
//!
//! 1. **Scope and type checking** ([`Checker`]): builds the scope tree,
//!    resolves identifiers and annotates every expression with its
//!    inferred type.
//! 2. **Control-flow checking**: verifies that every function returns on
//!    all paths and flags statements that can never execute.
//!
//! Each pass is all-or-nothing; the first error aborts analysis and no
//! code is generated afterwards.

pub mod error;
pub mod scope;

mod check;
mod flow;

pub use check::{compatible, is_numeric, Checker};
pub use error::{SemaContext, SemaError, SemaErrorKind, SemaResult};

use aspen_syntax::ast::Program;

/// Run both semantic passes over `program`.
///
/// On success the returned [`Checker`] holds the scope tree for
/// inspection; the program's expressions have all been annotated with
/// concrete types.
pub fn analyze(program: &mut Program) -> SemaResult<Checker> {
    let mut checker = Checker::new();
    checker.check(program)?;
    flow::check_program(program)?;
    Ok(checker)
}
