//! Control-flow checking: missing returns and unreachable code.
//!
//! Runs after the scope-and-type pass and reads the AST only. A block
//! "always returns" when scanning its items in textual order reaches a
//! statement that returns on every path; anything after that point is
//! unreachable.

use aspen_syntax::ast::*;

use crate::error::{SemaContext, SemaError, SemaErrorKind, SemaResult};

/// Check every function body for a guaranteed return and for code that
/// can never execute.
pub fn check_program(program: &Program) -> SemaResult<()> {
    for decl in &program.decls {
        if let Decl::Func(f) = decl {
            check_function(f)?;
        }
    }
    Ok(())
}

fn check_function(f: &FuncDecl) -> SemaResult<()> {
    let always_returns = analyze_block(&f.body)?;
    if !always_returns {
        return Err(SemaError::new(
            SemaErrorKind::MissingReturn,
            SemaContext::function(&f.name),
        ));
    }
    Ok(())
}

fn analyze_block(block: &Block) -> SemaResult<bool> {
    analyze_items(&block.items)
}

fn analyze_items(items: &[Item]) -> SemaResult<bool> {
    let mut terminated = false;

    for item in items {
        if terminated {
            return Err(SemaError::new(
                SemaErrorKind::UnreachableCode,
                SemaContext::default(),
            ));
        }

        let stmt_returns = match item {
            Item::Stmt(Stmt::Return(_)) => true,
            Item::Stmt(Stmt::If {
                then_blk, else_blk, ..
            }) => {
                let then_returns = analyze_block(then_blk)?;
                let else_returns = match else_blk {
                    Some(b) => analyze_block(b)?,
                    None => false,
                };
                else_blk.is_some() && then_returns && else_returns
            }
            Item::Stmt(Stmt::While { body, .. }) => {
                // The body still gets an unreachable-code scan, but a
                // loop never counts as terminating: its condition is not
                // evaluated statically.
                analyze_block(body)?;
                false
            }
            Item::Stmt(Stmt::Block(b)) => analyze_block(b)?,
            _ => false,
        };

        if stmt_returns {
            terminated = true;
        }
    }

    Ok(terminated)
}
