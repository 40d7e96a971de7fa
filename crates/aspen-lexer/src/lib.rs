//! Aspen lexer: converts source text into tokens.
use aspen_syntax::error::Result;
use aspen_syntax::token::{Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    self.advance();
                    if c2 == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        // A '.' followed by a digit makes this a float literal.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            s.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            let val: f64 = s.parse().map_err(|_| {
                aspen_syntax::error::Error::with_span("Invalid number", start_line, start_col)
            })?;
            return Ok(Token {
                kind: TokenKind::Float(val),
                line: start_line,
                col: start_col,
            });
        }
        let val: i64 = s.parse().map_err(|_| {
            aspen_syntax::error::Error::with_span("Invalid number", start_line, start_col)
        })?;
        Ok(Token {
            kind: TokenKind::Int(val),
            line: start_line,
            col: start_col,
        })
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match s.as_str() {
            "func" => TokenKind::Func,
            "var" => TokenKind::Var,
            "let" => TokenKind::Let,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "int" => TokenKind::KwInt,
            "float" => TokenKind::KwFloat,
            "bool" => TokenKind::KwBool,
            _ => TokenKind::Ident(s),
        };
        Token {
            kind,
            line: start_line,
            col: start_col,
        }
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let line = self.line;
            let col = self.col;
            let tk = match self.peek() {
                None => {
                    tokens.push(Token {
                        kind: TokenKind::Eof,
                        line,
                        col,
                    });
                    break;
                }
                Some('(') => {
                    self.advance();
                    Token { kind: TokenKind::LParen, line, col }
                }
                Some(')') => {
                    self.advance();
                    Token { kind: TokenKind::RParen, line, col }
                }
                Some('{') => {
                    self.advance();
                    Token { kind: TokenKind::LBrace, line, col }
                }
                Some('}') => {
                    self.advance();
                    Token { kind: TokenKind::RBrace, line, col }
                }
                Some(',') => {
                    self.advance();
                    Token { kind: TokenKind::Comma, line, col }
                }
                Some(':') => {
                    self.advance();
                    Token { kind: TokenKind::Colon, line, col }
                }
                Some(';') => {
                    self.advance();
                    Token { kind: TokenKind::Semicolon, line, col }
                }
                Some('=') => {
                    if self.peek_next() == Some('=') {
                        self.advance();
                        self.advance();
                        Token { kind: TokenKind::EqEq, line, col }
                    } else {
                        self.advance();
                        Token { kind: TokenKind::Equal, line, col }
                    }
                }
                Some('!') => {
                    if self.peek_next() == Some('=') {
                        self.advance();
                        self.advance();
                        Token { kind: TokenKind::NotEq, line, col }
                    } else {
                        return aspen_syntax::error::error_at(
                            line,
                            col,
                            "Unexpected '!' (did you mean '!='?)",
                        );
                    }
                }
                Some('<') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        Token { kind: TokenKind::LessEq, line, col }
                    } else {
                        Token { kind: TokenKind::Less, line, col }
                    }
                }
                Some('>') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        Token { kind: TokenKind::GreaterEq, line, col }
                    } else {
                        Token { kind: TokenKind::Greater, line, col }
                    }
                }
                Some('+') => {
                    self.advance();
                    Token { kind: TokenKind::Plus, line, col }
                }
                Some('-') => {
                    self.advance();
                    Token { kind: TokenKind::Minus, line, col }
                }
                Some('*') => {
                    self.advance();
                    Token { kind: TokenKind::Star, line, col }
                }
                Some('/') => {
                    self.advance();
                    Token { kind: TokenKind::Slash, line, col }
                }
                Some(c) if c.is_ascii_digit() => self.read_number()?,
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                Some(other) => {
                    return aspen_syntax::error::error_at(
                        line,
                        col,
                        format!("Unexpected character '{}'", other),
                    );
                }
            };
            tokens.push(tk);
        }
        Ok(tokens)
    }
}
