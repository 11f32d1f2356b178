use crate::error::{Error, Result};

use super::{
    token::{KEYWORDS, ONE_SYMBOL_TOKENS},
    Token, TokenKind,
};

#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    tokens: Vec<Token>,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            tokens: vec![],
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek(0) {
            self.index += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn new_token(&mut self, kind: TokenKind, len: usize, line: usize, column: usize) {
        self.tokens.push(Token::new(kind, line, column));
        for _ in 0..len {
            self.advance();
        }
    }

    fn take_while(&self, f: impl Fn(char) -> bool) -> String {
        self.chars[self.index..]
            .iter()
            .take_while(|&&c| f(c))
            .collect()
    }

    /// number = [0-9]+ ("." [0-9]+)?
    fn parse_number(&mut self) -> Result<()> {
        let (line, column) = (self.line, self.column);
        let int_part = self.take_while(|c| c.is_ascii_digit());

        let has_fraction = self.peek(int_part.len()) == Some('.')
            && self
                .peek(int_part.len() + 1)
                .is_some_and(|c| c.is_ascii_digit());

        if has_fraction {
            let frac_part: String = self.chars[self.index + int_part.len() + 1..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            let s = format!("{}.{}", int_part, frac_part);
            let value = s.parse().map_err(|_| Error::SyntaxError {
                line,
                column,
                expected: "float literal".to_string(),
                found: s.clone(),
            })?;
            self.new_token(TokenKind::Float(value), s.len(), line, column);
        } else {
            let value = int_part.parse().map_err(|_| Error::SyntaxError {
                line,
                column,
                expected: "integer literal in range".to_string(),
                found: int_part.clone(),
            })?;
            self.new_token(TokenKind::Integer(value), int_part.len(), line, column);
        }
        Ok(())
    }

    fn parse_identifier(&mut self) {
        let (line, column) = (self.line, self.column);
        let s = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');

        if let Some(kind) = KEYWORDS.get(s.as_str()) {
            self.new_token(kind.clone(), s.len(), line, column);
        } else {
            let len = s.len();
            self.new_token(TokenKind::Identifier(s), len, line, column);
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek(0).is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    /// An unterminated block comment runs to the end of the input.
    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(c) = self.peek(0) {
            if c == '*' && self.peek(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn _tokenize(&mut self) -> Result<()> {
        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek(1) == Some('/') {
                self.skip_line_comment();
            } else if c == '/' && self.peek(1) == Some('*') {
                self.skip_block_comment();
            } else if c.is_ascii_digit() {
                self.parse_number()?;
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.parse_identifier();
            } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
                self.new_token(kind.clone(), 1, self.line, self.column);
            } else {
                return Err(Error::UnrecognizedCharacter {
                    line: self.line,
                    column: self.column,
                    found: c,
                });
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, self.line, self.column));
        Ok(())
    }

    /// Splits `s` into tokens, always terminated by [`TokenKind::Eof`].
    pub fn tokenize(s: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(s);
        lexer._tokenize()?;
        tracing::debug!(tokens = lexer.tokens.len(), "tokenized input");

        Ok(lexer.tokens)
    }
}
