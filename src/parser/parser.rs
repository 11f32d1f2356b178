use crate::{
    error::{Error, Result},
    lexer::{Token, TokenKind},
};

use super::{Assignment, BinOpKind, Block, Expr, Literal, Program, Stmt};

#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    /// A stream that does not end in [`TokenKind::Eof`] gets one appended,
    /// positioned at its last token.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.kind == TokenKind::Eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token::new(TokenKind::Eof, line, column));
        }
        Self { tokens, index: 0 }
    }

    pub fn parse(&mut self) -> Result<Program> {
        let program = self.parse_program()?;
        tracing::debug!(statements = program.0.len(), "parsed program");
        Ok(program)
    }

    /// Anything past the end reads as the final end-of-input token.
    fn peek_nth(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + offset).min(last)]
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let t = self.peek().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        t
    }

    fn error(&self, expected: impl Into<String>) -> Error {
        let t = self.peek();
        Error::SyntaxError {
            line: t.line,
            column: t.column,
            expected: expected.into(),
            found: t.kind.to_string(),
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek().kind.same_kind(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.peek().kind.same_kind(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(kind.to_string()))
        }
    }

    fn eat_ident(&mut self) -> Result<String> {
        match self.eat(&TokenKind::Identifier(String::new()))?.kind {
            TokenKind::Identifier(name) => Ok(name),
            _ => unreachable!("eat checked the token kind"),
        }
    }

    /// program = (stmt ";"?)*
    fn parse_program(&mut self) -> Result<Program> {
        let mut stmts = vec![];

        while !self.is_eof() {
            stmts.push(self.parse_stmt()?);
            self.consume(&TokenKind::SemiColon);
        }

        Ok(Program(stmts))
    }

    /// stmt = "let" ident "=" expr
    ///      | ident "=" expr
    ///      | "{" (stmt ";"?)* "}"
    ///      | expr
    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.peek().kind {
            TokenKind::Let => self.parse_var_decl(),
            TokenKind::LeftBrace => self.parse_block(),
            TokenKind::Identifier(_) if self.peek_nth(1).kind == TokenKind::Assign => {
                self.parse_assignment()
            }
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    fn parse_var_decl(&mut self) -> Result<Stmt> {
        self.eat(&TokenKind::Let)?;
        let name = self.eat_ident()?;
        self.eat(&TokenKind::Assign)?;
        let initializer = self.parse_expr()?;
        Ok(Stmt::VarDecl(name, initializer))
    }

    fn parse_assignment(&mut self) -> Result<Stmt> {
        let name = self.eat_ident()?;
        self.eat(&TokenKind::Assign)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assignment(Assignment {
            name,
            index: None,
            value,
        }))
    }

    fn parse_block(&mut self) -> Result<Stmt> {
        self.eat(&TokenKind::LeftBrace)?;
        let mut stmts = vec![];
        while !self.consume(&TokenKind::RightBrace) {
            if self.is_eof() {
                return Err(self.error(TokenKind::RightBrace.to_string()));
            }
            stmts.push(self.parse_stmt()?);
            self.consume(&TokenKind::SemiColon);
        }
        Ok(Stmt::Block(Block(stmts)))
    }

    /// expr = term ("+" term | "-" term)*
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut node = self.parse_term()?;

        loop {
            let kind = if self.consume(&TokenKind::Plus) {
                BinOpKind::Add
            } else if self.consume(&TokenKind::Minus) {
                BinOpKind::Sub
            } else {
                return Ok(node);
            };
            node = Expr::binary(kind, node, self.parse_term()?);
        }
    }

    /// term = factor ("*" factor | "/" factor)*
    fn parse_term(&mut self) -> Result<Expr> {
        let mut node = self.parse_factor()?;

        loop {
            let kind = if self.consume(&TokenKind::Star) {
                BinOpKind::Mul
            } else if self.consume(&TokenKind::Slash) {
                BinOpKind::Div
            } else {
                return Ok(node);
            };
            node = Expr::binary(kind, node, self.parse_factor()?);
        }
    }

    /// factor = num
    ///        | ident
    ///        | "(" expr ")"
    fn parse_factor(&mut self) -> Result<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(Expr::Literal(Literal::Int(value)))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(Expr::Literal(Literal::Float(value)))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::Variable(name))
            }
            TokenKind::LeftParen => {
                self.advance();
                let node = self.parse_expr()?;
                self.eat(&TokenKind::RightParen)?;
                Ok(node)
            }
            _ => Err(self.error("number, identifier, or '('")),
        }
    }
}
