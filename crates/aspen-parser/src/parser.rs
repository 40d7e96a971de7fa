//! Recursive-descent parser for the Aspen language.
//!
//! Consumes the token stream produced by `aspen-lexer` and builds a
//! [`Program`]. Block items are pushed in textual order; the later
//! passes depend on declarations and statements staying interleaved the
//! way they were written.

use aspen_syntax::ast::*;
use aspen_syntax::error::{Error, Result};
use aspen_syntax::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser over a token stream (must end with `Eof`).
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if !matches!(t.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        t
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            self.unexpected(what)
        }
    }

    fn unexpected<T>(&self, what: &str) -> Result<T> {
        let t = self.peek();
        Err(Error::with_span(format!("Expected {}", what), t.line, t.col))
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        if let TokenKind::Ident(_) = self.peek().kind {
            match self.advance().kind {
                TokenKind::Ident(name) => Ok(name),
                _ => unreachable!(),
            }
        } else {
            self.unexpected(what)
        }
    }

    /// Parse a whole program: a sequence of top-level declarations.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut decls = Vec::new();
        while !self.check(&TokenKind::Eof) {
            decls.push(self.parse_decl()?);
        }
        Ok(Program { decls })
    }

    fn parse_decl(&mut self) -> Result<Decl> {
        match self.peek().kind {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Let => self.parse_let_decl(),
            TokenKind::Func => self.parse_func_decl(),
            _ => self.unexpected("declaration ('var', 'let' or 'func')"),
        }
    }

    fn parse_var_decl(&mut self) -> Result<Decl> {
        self.expect(TokenKind::Var, "'var'")?;
        let name = self.expect_ident("variable name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Equal, "'='")?;
        let init = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Decl::Var { name, ty, init })
    }

    fn parse_let_decl(&mut self) -> Result<Decl> {
        self.expect(TokenKind::Let, "'let'")?;
        let name = self.expect_ident("constant name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Equal, "'='")?;
        let init = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Decl::Let { name, ty, init })
    }

    fn parse_func_decl(&mut self) -> Result<Decl> {
        self.expect(TokenKind::Func, "'func'")?;
        let name = self.expect_ident("function name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let pname = self.expect_ident("parameter name")?;
                self.expect(TokenKind::Colon, "':'")?;
                let pty = self.parse_type()?;
                params.push(Param { name: pname, ty: pty });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Colon, "':'")?;
        let ret = self.parse_type()?;
        let body = self.parse_block()?;
        Ok(Decl::Func(FuncDecl {
            name,
            params,
            ret,
            body,
        }))
    }

    fn parse_type(&mut self) -> Result<BaseType> {
        match self.peek().kind {
            TokenKind::KwInt => {
                self.advance();
                Ok(BaseType::Int)
            }
            TokenKind::KwFloat => {
                self.advance();
                Ok(BaseType::Float)
            }
            TokenKind::KwBool => {
                self.advance();
                Ok(BaseType::Bool)
            }
            _ => self.unexpected("type ('int', 'float' or 'bool')"),
        }
    }

    fn parse_block(&mut self) -> Result<Block> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            let item = match self.peek().kind {
                TokenKind::Var => Item::Decl(self.parse_var_decl()?),
                TokenKind::Let => Item::Decl(self.parse_let_decl()?),
                _ => Item::Stmt(self.parse_stmt()?),
            };
            items.push(item);
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Block { items })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.peek().kind {
            TokenKind::Print => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Print(expr))
            }
            TokenKind::Return => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Return(expr))
            }
            TokenKind::If => {
                self.advance();
                self.expect(TokenKind::LParen, "'('")?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                let then_blk = self.parse_block()?;
                let else_blk = if self.eat(&TokenKind::Else) {
                    Some(self.parse_block()?)
                } else {
                    None
                };
                Ok(Stmt::If {
                    cond,
                    then_blk,
                    else_blk,
                })
            }
            TokenKind::While => {
                self.advance();
                self.expect(TokenKind::LParen, "'('")?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                let body = self.parse_block()?;
                Ok(Stmt::While { cond, body })
            }
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Ident(_) => {
                let name = self.expect_ident("identifier")?;
                self.expect(TokenKind::Equal, "'='")?;
                let rhs = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Stmt::Assign { name, rhs })
            }
            _ => self.unexpected("statement"),
        }
    }

    /// Parse a single expression (the precedence ladder entry point).
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Neq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::new(ExprKind::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinOp::Lt,
                TokenKind::Greater => BinOp::Gt,
                TokenKind::LessEq => BinOp::Le,
                TokenKind::GreaterEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::new(ExprKind::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::new(ExprKind::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::new(ExprKind::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Minus) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::new(ExprKind::Unary {
                op: UnOp::Neg,
                operand: Box::new(operand),
            }));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Int(v) => {
                self.advance();
                Ok(Expr::new(ExprKind::IntLit(v)))
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(Expr::new(ExprKind::FloatLit(v)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(false)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.eat(&TokenKind::LParen) {
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen, "')'")?;
                    Ok(Expr::new(ExprKind::Call { callee: name, args }))
                } else {
                    Ok(Expr::new(ExprKind::Ident(name)))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            _ => self.unexpected("expression"),
        }
    }
}
