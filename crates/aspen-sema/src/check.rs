//! Scope-and-type checking pass.
//!
//! Builds the scope tree, resolves every identifier, annotates every
//! expression with its inferred [`DataType`] and enforces the
//! declaration, assignment, call and return typing rules. The pass
//! mutates only the `ty` field of expressions, and only from `Iota` to a
//! concrete type, so running it twice is equivalent to running it once.

use aspen_syntax::ast::*;

use crate::error::{SemaContext, SemaError, SemaErrorKind, SemaResult};
use crate::scope::{ScopeId, ScopeTree, SymbolInfo, SymbolKind};

/// `compatible(target, source)`: may a value of type `source` be bound
/// to a slot of type `target`? Used for declarations, assignments,
/// return statements and argument passing.
///
/// The relation is directional and not transitive: int widens to float,
/// int and bool convert to each other, and nothing else mixes (in
/// particular bool never reaches float).
pub fn compatible(target: DataType, source: DataType) -> bool {
    if target == source {
        return true;
    }
    if source == DataType::Int && (target == DataType::Float || target == DataType::Bool) {
        return true;
    }
    if source == DataType::Bool && target == DataType::Int {
        return true;
    }
    false
}

/// Numeric types participate in arithmetic and mixed-type comparisons.
pub fn is_numeric(ty: DataType) -> bool {
    ty == DataType::Int || ty == DataType::Float
}

#[derive(Debug, Clone)]
struct CurrentFn {
    name: String,
    ret: DataType,
}

/// The scope-and-type checker.
pub struct Checker {
    scopes: ScopeTree,
    globals: ScopeId,
    current: ScopeId,
    current_fn: Option<CurrentFn>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        let mut scopes = ScopeTree::new();
        let globals = scopes.push_scope(None);
        Self {
            scopes,
            globals,
            current: globals,
            current_fn: None,
        }
    }

    /// The scope tree built by [`Checker::check`].
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// The root (global) scope.
    pub fn globals(&self) -> ScopeId {
        self.globals
    }

    /// Run the pass over a whole program.
    pub fn check(&mut self, program: &mut Program) -> SemaResult<()> {
        for decl in &mut program.decls {
            self.check_decl(decl)?;
        }
        Ok(())
    }

    fn check_decl(&mut self, decl: &mut Decl) -> SemaResult<()> {
        match decl {
            Decl::Var { name, ty, init } => {
                self.check_binding(name.as_str(), *ty, init, SymbolKind::Variable)
            }
            Decl::Let { name, ty, init } => {
                self.check_binding(name.as_str(), *ty, init, SymbolKind::Constant)
            }
            Decl::Func(f) => self.check_func(f),
        }
    }

    fn check_binding(
        &mut self,
        name: &str,
        ty: BaseType,
        init: &mut Expr,
        kind: SymbolKind,
    ) -> SemaResult<()> {
        if self.scopes.declared_here(self.current, name) {
            if let Some(existing) = self.scopes.lookup(self.current, name) {
                if existing.kind == SymbolKind::Function {
                    return Err(SemaError::new(
                        SemaErrorKind::FunctionUsedAsVariable,
                        SemaContext::function(name),
                    ));
                }
            }
            return Err(SemaError::new(
                SemaErrorKind::RedeclaredIdentifier,
                SemaContext::identifier(name),
            ));
        }

        let declared = DataType::from(ty);
        let init_ty = self.check_expr(init)?;
        if !compatible(declared, init_ty) {
            return Err(SemaError::new(
                SemaErrorKind::VarDeclTypeMismatch,
                SemaContext::type_mismatch(name, declared, init_ty),
            ));
        }

        self.scopes.insert(
            self.current,
            SymbolInfo {
                name: name.to_string(),
                kind,
                ty: declared,
                param_types: Vec::new(),
            },
        );
        Ok(())
    }

    fn check_func(&mut self, f: &mut FuncDecl) -> SemaResult<()> {
        if self.scopes.declared_here(self.current, &f.name) {
            return Err(SemaError::new(
                SemaErrorKind::RedeclaredFunction,
                SemaContext::function(&f.name),
            ));
        }

        let ret = DataType::from(f.ret);
        let param_types: Vec<DataType> = f.params.iter().map(|p| DataType::from(p.ty)).collect();

        // The function's symbol goes in before its body is visited, so
        // direct recursion resolves. A callee declared later does not.
        self.scopes.insert(
            self.current,
            SymbolInfo {
                name: f.name.clone(),
                kind: SymbolKind::Function,
                ty: ret,
                param_types,
            },
        );

        let saved_scope = self.current;
        self.current = self.scopes.push_scope(Some(saved_scope));

        for p in &f.params {
            if self.scopes.declared_here(self.current, &p.name) {
                return Err(SemaError::new(
                    SemaErrorKind::RedeclaredIdentifier,
                    SemaContext::identifier(&p.name),
                ));
            }
            self.scopes.insert(
                self.current,
                SymbolInfo {
                    name: p.name.clone(),
                    kind: SymbolKind::Variable,
                    ty: DataType::from(p.ty),
                    param_types: Vec::new(),
                },
            );
        }

        let saved_fn = self.current_fn.replace(CurrentFn {
            name: f.name.clone(),
            ret,
        });
        self.check_block(&mut f.body)?;
        self.current_fn = saved_fn;
        self.current = saved_scope;
        Ok(())
    }

    fn check_block(&mut self, block: &mut Block) -> SemaResult<()> {
        let saved = self.current;
        self.current = self.scopes.push_scope(Some(saved));

        // Declarations first, then statements. Only the control-flow
        // checker and the code generator consume the textual order.
        for item in &mut block.items {
            if let Item::Decl(d) = item {
                self.check_decl(d)?;
            }
        }
        for item in &mut block.items {
            if let Item::Stmt(s) = item {
                self.check_stmt(s)?;
            }
        }

        self.current = saved;
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) -> SemaResult<()> {
        match stmt {
            Stmt::Assign { name, rhs } => {
                let symbol = match self.scopes.lookup(self.current, name) {
                    None => {
                        return Err(SemaError::new(
                            SemaErrorKind::UndeclaredIdentifier,
                            SemaContext::identifier(name.as_str()),
                        ))
                    }
                    Some(s) => s.clone(),
                };
                if symbol.kind == SymbolKind::Function {
                    return Err(SemaError::new(
                        SemaErrorKind::FunctionUsedAsVariable,
                        SemaContext::function(name.as_str()),
                    ));
                }
                if symbol.kind == SymbolKind::Constant {
                    return Err(SemaError::new(
                        SemaErrorKind::VarAssignToConstant,
                        SemaContext::identifier(name.as_str()),
                    ));
                }
                let rhs_ty = self.check_expr(rhs)?;
                if !compatible(symbol.ty, rhs_ty) {
                    return Err(SemaError::new(
                        SemaErrorKind::VarAssignTypeMismatch,
                        SemaContext::type_mismatch(name.as_str(), symbol.ty, rhs_ty),
                    ));
                }
                Ok(())
            }
            Stmt::Print(expr) => {
                self.check_expr(expr)?;
                Ok(())
            }
            Stmt::Return(expr) => {
                let current_fn = match &self.current_fn {
                    None => {
                        return Err(SemaError::new(
                            SemaErrorKind::ReturnOutsideFunction,
                            SemaContext::default(),
                        ))
                    }
                    Some(f) => f.clone(),
                };
                let ty = self.check_expr(expr)?;
                if !compatible(current_fn.ret, ty) {
                    return Err(SemaError::new(
                        SemaErrorKind::ReturnTypeMismatch,
                        SemaContext::return_mismatch(&current_fn.name, current_fn.ret, ty),
                    ));
                }
                Ok(())
            }
            Stmt::If {
                cond,
                then_blk,
                else_blk,
            } => {
                if self.check_expr(cond)? != DataType::Bool {
                    return Err(SemaError::new(
                        SemaErrorKind::ConditionNotBool,
                        SemaContext::default(),
                    ));
                }
                self.check_block(then_blk)?;
                if let Some(else_blk) = else_blk {
                    self.check_block(else_blk)?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                if self.check_expr(cond)? != DataType::Bool {
                    return Err(SemaError::new(
                        SemaErrorKind::ConditionNotBool,
                        SemaContext::default(),
                    ));
                }
                self.check_block(body)
            }
            Stmt::Block(block) => self.check_block(block),
        }
    }

    fn check_expr(&mut self, expr: &mut Expr) -> SemaResult<DataType> {
        let ty = match &mut expr.kind {
            ExprKind::IntLit(_) => DataType::Int,
            ExprKind::FloatLit(_) => DataType::Float,
            ExprKind::BoolLit(_) => DataType::Bool,
            ExprKind::Ident(name) => {
                let symbol = match self.scopes.lookup(self.current, name) {
                    None => {
                        return Err(SemaError::new(
                            SemaErrorKind::UndeclaredIdentifier,
                            SemaContext::identifier(name.as_str()),
                        ))
                    }
                    Some(s) => s.clone(),
                };
                if symbol.kind == SymbolKind::Function {
                    return Err(SemaError::new(
                        SemaErrorKind::FunctionUsedAsVariable,
                        SemaContext::function(name.as_str()),
                    ));
                }
                symbol.ty
            }
            ExprKind::Unary {
                op: UnOp::Neg,
                operand,
            } => {
                let operand_ty = self.check_expr(operand)?;
                if !is_numeric(operand_ty) {
                    return Err(SemaError::new(
                        SemaErrorKind::InvalidUnaryOperation,
                        SemaContext::actual_type(operand_ty),
                    ));
                }
                operand_ty
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let op = *op;
                let lhs_ty = self.check_expr(lhs)?;
                let rhs_ty = self.check_expr(rhs)?;
                if op.is_arithmetic() {
                    if !is_numeric(lhs_ty) || !is_numeric(rhs_ty) {
                        return Err(SemaError::new(
                            SemaErrorKind::InvalidBinaryOperation,
                            SemaContext::invalid_op(op.symbol(), lhs_ty, rhs_ty),
                        ));
                    }
                    if lhs_ty == DataType::Float || rhs_ty == DataType::Float {
                        DataType::Float
                    } else {
                        DataType::Int
                    }
                } else {
                    // Comparisons allow two numerics (mixed is fine) or
                    // two operands of the same type.
                    let both_numeric = is_numeric(lhs_ty) && is_numeric(rhs_ty);
                    if !both_numeric && lhs_ty != rhs_ty {
                        return Err(SemaError::new(
                            SemaErrorKind::InvalidBinaryOperation,
                            SemaContext::invalid_op(op.symbol(), lhs_ty, rhs_ty),
                        ));
                    }
                    DataType::Bool
                }
            }
            ExprKind::Call { callee, args } => {
                let symbol = match self.scopes.lookup(self.current, callee) {
                    None => {
                        return Err(SemaError::new(
                            SemaErrorKind::UndeclaredFunction,
                            SemaContext::function(callee.as_str()),
                        ))
                    }
                    Some(s) => s.clone(),
                };
                if symbol.kind != SymbolKind::Function {
                    return Err(SemaError::new(
                        SemaErrorKind::NotAFunction,
                        SemaContext::identifier(callee.as_str()),
                    ));
                }
                if args.len() != symbol.param_types.len() {
                    return Err(SemaError::new(
                        SemaErrorKind::WrongNumberOfArguments,
                        SemaContext::arg_count(
                            callee.as_str(),
                            symbol.param_types.len(),
                            args.len(),
                        ),
                    ));
                }
                let mut arg_types = Vec::with_capacity(args.len());
                for (arg, &param_ty) in args.iter_mut().zip(&symbol.param_types) {
                    let arg_ty = self.check_expr(arg)?;
                    arg_types.push(arg_ty);
                    if !compatible(param_ty, arg_ty) {
                        return Err(SemaError::new(
                            SemaErrorKind::InvalidSignature,
                            SemaContext::signature(
                                callee.as_str(),
                                symbol.param_types.clone(),
                                arg_types,
                            ),
                        ));
                    }
                }
                symbol.ty
            }
        };
        expr.ty = ty;
        Ok(ty)
    }
}
