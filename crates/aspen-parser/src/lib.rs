pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use aspen_lexer::Lexer;
    use aspen_syntax::ast::*;

    fn parse_expr_str(input: &str) -> Expr {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Program {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_program().expect("Parsing should succeed")
    }

    #[test]
    fn test_literal_expressions() {
        assert!(matches!(parse_expr_str("42").kind, ExprKind::IntLit(42)));
        assert!(matches!(parse_expr_str("3.5").kind, ExprKind::FloatLit(v) if v == 3.5));
        assert!(matches!(parse_expr_str("true").kind, ExprKind::BoolLit(true)));
        assert!(matches!(parse_expr_str("false").kind, ExprKind::BoolLit(false)));
    }

    #[test]
    fn test_untyped_until_checked() {
        assert_eq!(parse_expr_str("1 + 2").ty, DataType::Iota);
    }

    #[test]
    fn test_identifier_expressions() {
        assert!(matches!(parse_expr_str("variable").kind, ExprKind::Ident(s) if s == "variable"));
        assert!(matches!(parse_expr_str("my_var").kind, ExprKind::Ident(s) if s == "my_var"));
    }

    #[test]
    fn test_binary_operators() {
        assert!(matches!(
            parse_expr_str("1 + 2").kind,
            ExprKind::Binary { op: BinOp::Add, .. }
        ));
        assert!(matches!(
            parse_expr_str("5 - 3").kind,
            ExprKind::Binary { op: BinOp::Sub, .. }
        ));
        assert!(matches!(
            parse_expr_str("4 * 6").kind,
            ExprKind::Binary { op: BinOp::Mul, .. }
        ));
        assert!(matches!(
            parse_expr_str("8 / 2").kind,
            ExprKind::Binary { op: BinOp::Div, .. }
        ));
        assert!(matches!(
            parse_expr_str("1 == 2").kind,
            ExprKind::Binary { op: BinOp::Eq, .. }
        ));
        assert!(matches!(
            parse_expr_str("1 != 2").kind,
            ExprKind::Binary { op: BinOp::Neq, .. }
        ));
        assert!(matches!(
            parse_expr_str("1 <= 2").kind,
            ExprKind::Binary { op: BinOp::Le, .. }
        ));
        assert!(matches!(
            parse_expr_str("1 >= 2").kind,
            ExprKind::Binary { op: BinOp::Ge, .. }
        ));
    }

    #[test]
    fn test_unary_negation() {
        assert!(matches!(
            parse_expr_str("-x").kind,
            ExprKind::Unary { op: UnOp::Neg, .. }
        ));
    }

    #[test]
    fn test_operator_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        if let ExprKind::Binary { op, rhs, .. } = parse_expr_str("1 + 2 * 3").kind {
            assert_eq!(op, BinOp::Add);
            assert!(matches!(rhs.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
        } else {
            panic!("Expected Add at the root");
        }
        // comparisons bind looser than arithmetic
        assert!(matches!(
            parse_expr_str("1 + 1 < 2 * 2").kind,
            ExprKind::Binary { op: BinOp::Lt, .. }
        ));
    }

    #[test]
    fn test_parenthesized_expressions() {
        assert!(matches!(
            parse_expr_str("(1 + 2) * 3").kind,
            ExprKind::Binary { op: BinOp::Mul, .. }
        ));
    }

    #[test]
    fn test_function_calls() {
        if let ExprKind::Call { callee, args } = parse_expr_str("foo()").kind {
            assert_eq!(callee, "foo");
            assert_eq!(args.len(), 0);
        } else {
            panic!("Expected Call");
        }

        if let ExprKind::Call { callee, args } = parse_expr_str("add(1, 2)").kind {
            assert_eq!(callee, "add");
            assert_eq!(args.len(), 2);
        } else {
            panic!("Expected Call");
        }
    }

    #[test]
    fn test_var_and_let_decls() {
        let prog = parse_program_str("var x: int = 1; let y: float = 2.5;");
        assert_eq!(prog.decls.len(), 2);
        assert!(matches!(
            &prog.decls[0],
            Decl::Var { name, ty: BaseType::Int, .. } if name == "x"
        ));
        assert!(matches!(
            &prog.decls[1],
            Decl::Let { name, ty: BaseType::Float, .. } if name == "y"
        ));
    }

    #[test]
    fn test_func_decl() {
        let prog = parse_program_str("func add(a: int, b: int): int { return a + b; }");
        let Decl::Func(f) = &prog.decls[0] else {
            panic!("Expected Func");
        };
        assert_eq!(f.name, "add");
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].name, "a");
        assert_eq!(f.ret, BaseType::Int);
        assert_eq!(f.body.items.len(), 1);
    }

    #[test]
    fn test_block_items_stay_in_textual_order() {
        let prog = parse_program_str(
            "func main(): int { print 1; var x: int = 2; x = 3; return x; }",
        );
        let Decl::Func(f) = &prog.decls[0] else {
            panic!("Expected Func");
        };
        let items = &f.body.items;
        assert_eq!(items.len(), 4);
        assert!(matches!(items[0], Item::Stmt(Stmt::Print(_))));
        assert!(matches!(items[1], Item::Decl(Decl::Var { .. })));
        assert!(matches!(items[2], Item::Stmt(Stmt::Assign { .. })));
        assert!(matches!(items[3], Item::Stmt(Stmt::Return(_))));
    }

    #[test]
    fn test_if_else_and_while() {
        let prog = parse_program_str(
            "func main(): int { if (true) { return 1; } else { return 2; } }",
        );
        let Decl::Func(f) = &prog.decls[0] else {
            panic!("Expected Func");
        };
        assert!(matches!(
            &f.body.items[0],
            Item::Stmt(Stmt::If { else_blk: Some(_), .. })
        ));

        let prog = parse_program_str("func main(): int { while (1 < 2) { print 0; } return 0; }");
        let Decl::Func(f) = &prog.decls[0] else {
            panic!("Expected Func");
        };
        assert!(matches!(&f.body.items[0], Item::Stmt(Stmt::While { .. })));
    }

    #[test]
    fn test_nested_block_statement() {
        let prog = parse_program_str("func main(): int { { var x: int = 1; } return 0; }");
        let Decl::Func(f) = &prog.decls[0] else {
            panic!("Expected Func");
        };
        assert!(matches!(&f.body.items[0], Item::Stmt(Stmt::Block(_))));
    }

    #[test]
    fn test_parse_error_has_position() {
        let mut lexer = Lexer::new("func main(): int {\n  var x int = 1;\n}");
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.line, Some(2));
        assert!(err.msg.contains("Expected"));
    }
}
