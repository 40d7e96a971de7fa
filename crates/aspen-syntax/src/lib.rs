//! Aspen language syntax definitions and abstract syntax tree.
//!
//! This crate provides the foundational syntax elements for the Aspen
//! programming language: token definitions, abstract syntax tree (AST)
//! nodes, the [`ast::DataType`] lattice carried by every expression, and
//! the positioned error type shared by the lexer and parser. All other
//! crates in the Aspen workspace depend on these types.
//!
//! # Overview
//!
//! - [`token`]: Token types and lexical elements
//! - [`ast`]: Abstract syntax tree node definitions
//! - [`error`]: Positioned error type for the front end
//!
//! # Examples
//!
//! ```rust
//! use aspen_syntax::{DataType, Expr, ExprKind};
//!
//! let expr = Expr::new(ExprKind::IntLit(42));
//! assert_eq!(expr.ty, DataType::Iota); // untyped until checked
//! ```

pub mod ast;
pub mod error;
pub mod token;

// Re-export all public items for convenience
pub use ast::*;
pub use error::*;
pub use token::*;
