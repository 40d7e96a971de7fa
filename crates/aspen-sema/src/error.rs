//! Semantic error taxonomy.
//!
//! A closed enumeration of error kinds paired with a structured context
//! record. The kind and context stay public so tests can assert on them
//! instead of matching message strings.

use std::fmt;

use aspen_syntax::ast::DataType;

/// Kinds of semantic errors.
///
/// `DeadCode` and `InfiniteLoopDetected` are reserved: no pass raises
/// them today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemaErrorKind {
    RedeclaredIdentifier,
    UndeclaredIdentifier,
    VarDeclTypeMismatch,
    VarAssignTypeMismatch,
    VarAssignToConstant,
    UndeclaredFunction,
    RedeclaredFunction,
    NotAFunction,
    InvalidSignature,
    ReturnTypeMismatch,
    ReturnOutsideFunction,
    ConditionNotBool,
    InvalidUnaryOperation,
    InvalidBinaryOperation,
    FunctionUsedAsVariable,
    WrongNumberOfArguments,
    UnreachableCode,
    DeadCode,
    MissingReturn,
    InfiniteLoopDetected,
}

/// Structured payload for a semantic error. Only the fields relevant to
/// the kind are populated; the rest stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemaContext {
    pub identifier: Option<String>,
    pub function: Option<String>,
    pub expected_type: Option<DataType>,
    pub actual_type: Option<DataType>,
    pub expected_signature: Vec<DataType>,
    pub actual_signature: Vec<DataType>,
    pub expected_args: Option<usize>,
    pub actual_args: Option<usize>,
    pub op: Option<&'static str>,
}

impl SemaContext {
    pub fn identifier(id: impl Into<String>) -> Self {
        Self {
            identifier: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self {
            function: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn actual_type(got: DataType) -> Self {
        Self {
            actual_type: Some(got),
            ..Self::default()
        }
    }

    pub fn type_mismatch(id: impl Into<String>, expected: DataType, got: DataType) -> Self {
        Self {
            identifier: Some(id.into()),
            expected_type: Some(expected),
            actual_type: Some(got),
            ..Self::default()
        }
    }

    pub fn return_mismatch(func: impl Into<String>, expected: DataType, got: DataType) -> Self {
        Self {
            function: Some(func.into()),
            expected_type: Some(expected),
            actual_type: Some(got),
            ..Self::default()
        }
    }

    pub fn invalid_op(op: &'static str, lhs: DataType, rhs: DataType) -> Self {
        Self {
            op: Some(op),
            expected_type: Some(lhs),
            actual_type: Some(rhs),
            ..Self::default()
        }
    }

    pub fn signature(
        func: impl Into<String>,
        expected: Vec<DataType>,
        actual: Vec<DataType>,
    ) -> Self {
        Self {
            function: Some(func.into()),
            expected_signature: expected,
            actual_signature: actual,
            ..Self::default()
        }
    }

    pub fn arg_count(func: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self {
            function: Some(func.into()),
            expected_args: Some(expected),
            actual_args: Some(actual),
            ..Self::default()
        }
    }
}

/// A semantic error: kind plus context. The first one encountered aborts
/// the pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SemaError {
    pub kind: SemaErrorKind,
    pub context: SemaContext,
}

impl SemaError {
    pub fn new(kind: SemaErrorKind, context: SemaContext) -> Self {
        Self { kind, context }
    }
}

fn fmt_signature(types: &[DataType]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for SemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = &self.context;
        let id = ctx.identifier.as_deref().unwrap_or("?");
        let func = ctx.function.as_deref().unwrap_or("?");
        let expected = ctx.expected_type.unwrap_or(DataType::Iota);
        let actual = ctx.actual_type.unwrap_or(DataType::Iota);
        match self.kind {
            SemaErrorKind::RedeclaredIdentifier => {
                write!(f, "Redeclaration of identifier '{}'", id)
            }
            SemaErrorKind::RedeclaredFunction => {
                write!(f, "Redeclaration of function '{}'", func)
            }
            SemaErrorKind::UndeclaredIdentifier => {
                write!(f, "Use of undeclared identifier '{}'", id)
            }
            SemaErrorKind::UndeclaredFunction => {
                write!(f, "Call to undeclared function '{}'", func)
            }
            SemaErrorKind::NotAFunction => {
                write!(f, "Identifier '{}' is not a function", id)
            }
            SemaErrorKind::VarDeclTypeMismatch => write!(
                f,
                "Type mismatch during variable declaration for '{}': expected '{}', got '{}'",
                id, expected, actual
            ),
            SemaErrorKind::VarAssignTypeMismatch => write!(
                f,
                "Type mismatch during variable assignment for '{}': expected '{}', got '{}'",
                id, expected, actual
            ),
            SemaErrorKind::VarAssignToConstant => {
                write!(f, "Attempt to assign to constant variable '{}'", id)
            }
            SemaErrorKind::ReturnTypeMismatch => write!(
                f,
                "Return type mismatch for function '{}': expected '{}', got '{}'",
                func, expected, actual
            ),
            SemaErrorKind::WrongNumberOfArguments => write!(
                f,
                "Wrong number of arguments in call to function '{}': expected {}, got {}",
                func,
                ctx.expected_args.unwrap_or(0),
                ctx.actual_args.unwrap_or(0)
            ),
            SemaErrorKind::InvalidSignature => write!(
                f,
                "Invalid signature for function '{}': expected ({}), got ({})",
                func,
                fmt_signature(&ctx.expected_signature),
                fmt_signature(&ctx.actual_signature)
            ),
            SemaErrorKind::ReturnOutsideFunction => {
                write!(f, "Return statement used outside of a function")
            }
            SemaErrorKind::ConditionNotBool => {
                write!(f, "Condition expression does not evaluate to bool")
            }
            SemaErrorKind::InvalidUnaryOperation => {
                write!(f, "Invalid unary operation on type '{}'", actual)
            }
            SemaErrorKind::InvalidBinaryOperation => write!(
                f,
                "Invalid binary operation '{}' between types '{}' and '{}'",
                ctx.op.unwrap_or("?"),
                expected,
                actual
            ),
            SemaErrorKind::FunctionUsedAsVariable => {
                write!(f, "Function '{}' used as a variable", func)
            }
            SemaErrorKind::UnreachableCode => write!(f, "Unreachable code detected"),
            SemaErrorKind::DeadCode => write!(f, "Dead code detected"),
            SemaErrorKind::MissingReturn => {
                write!(f, "Missing return statement in function '{}'", func)
            }
            SemaErrorKind::InfiniteLoopDetected => {
                write!(f, "Infinite loop detected in function '{}'", func)
            }
        }
    }
}

impl std::error::Error for SemaError {}

/// A specialized `Result` type for semantic analysis.
pub type SemaResult<T> = std::result::Result<T, SemaError>;
