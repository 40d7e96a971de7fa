//! Error handling types shared by the Aspen lexer and parser.
//!
//! Both front-end stages report failures as an [`Error`]: a message plus
//! the 1-based line and column of the offending source position. The
//! driver renders these with the source line and a caret marker.
//!
//! # Examples
//!
//! ```rust
//! use aspen_syntax::error::{Error, Result, error};
//!
//! // Create an error with source location
//! let located = Error::with_span("Unexpected token", 10, 5);
//! assert_eq!(located.to_string(), "Unexpected token at 10:5");
//!
//! // Use the convenience function
//! fn might_fail() -> Result<i32> {
//!     error("Operation failed")
//! }
//! ```

use std::fmt;

/// An error produced while lexing or parsing Aspen source.
///
/// # Fields
///
/// - `msg`: Human-readable error description
/// - `line`: Optional 1-based line number in source file
/// - `col`: Optional 1-based column number in source file
#[derive(Debug, Clone)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates a new error with the given message and no source location.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates a new error with the given message and source location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use aspen_syntax::Error;
    ///
    /// let error = Error::with_span("Unexpected character '&'", 5, 12);
    /// println!("{}", error); // "Unexpected character '&' at 5:12"
    /// ```
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}

/// A specialized `Result` type for Aspen front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create an error result.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}

/// Convenience function to create an error result with source location.
///
/// # Examples
///
/// ```rust
/// use aspen_syntax::error::{Result, error_at};
///
/// fn reject_token(line: usize, col: usize) -> Result<String> {
///     error_at(line, col, "Unexpected character '&'")
/// }
/// ```
pub fn error_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(msg, line, col))
}
