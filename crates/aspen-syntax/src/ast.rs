//! AST (abstract syntax tree) types for the Aspen language.

use std::fmt;

/// Type tags as they appear in source (`int`, `float`, `bool`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Float,
    Bool,
}

/// Inferred type of an expression.
///
/// `Iota` means "no type assigned yet"; the scope-and-type checker
/// replaces it with one of the three concrete types. After a successful
/// check no expression is left at `Iota`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    Iota,
    Int,
    Float,
    Bool,
}

impl From<BaseType> for DataType {
    fn from(bt: BaseType) -> Self {
        match bt {
            BaseType::Int => DataType::Int,
            BaseType::Float => DataType::Float,
            BaseType::Bool => DataType::Bool,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Bool => write!(f, "bool"),
            DataType::Iota => write!(f, "iota"),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    /// The operator as written in source, used in diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
        }
    }

    /// Arithmetic operators take numeric operands and produce a numeric
    /// result; the rest are comparisons producing `bool`.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }
}

/// An expression together with its inferred type.
///
/// `ty` starts at [`DataType::Iota`] and is written by the checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: DataType,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            ty: DataType::Iota,
        }
    }
}

/// Expression shapes (literals, identifiers, operations, calls).
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    BoolLit(bool),
    Ident(String),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
    },
}

/// Function parameter with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: BaseType,
}

/// Function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: BaseType,
    pub body: Block,
}

/// Declarations (`var`, `let`, `func`).
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var {
        name: String,
        ty: BaseType,
        init: Expr,
    },
    Let {
        name: String,
        ty: BaseType,
        init: Expr,
    },
    Func(FuncDecl),
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { name: String, rhs: Expr },
    Print(Expr),
    Return(Expr),
    If {
        cond: Expr,
        then_blk: Block,
        else_blk: Option<Block>,
    },
    While { cond: Expr, body: Block },
    Block(Block),
}

/// One block-level item, tagged as declaration or statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Decl(Decl),
    Stmt(Stmt),
}

/// A braced block. `items` is in textual order; the control-flow checker
/// and the code generator rely on that order, so the parser must never
/// reorder declarations relative to statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub items: Vec<Item>,
}

/// Entire program: an ordered sequence of top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub decls: Vec<Decl>,
}
