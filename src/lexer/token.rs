use std::fmt;

use phf::phf_map;

pub(super) static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "let" => TokenKind::Let,
};

pub(super) static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Plus,
    '-' => TokenKind::Minus,
    '*' => TokenKind::Star,
    '/' => TokenKind::Slash,
    '=' => TokenKind::Assign,
    '(' => TokenKind::LeftParen,
    ')' => TokenKind::RightParen,
    '{' => TokenKind::LeftBrace,
    '}' => TokenKind::RightBrace,
    ';' => TokenKind::SemiColon,
};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Integer(i64),
    Float(f64),
    Identifier(String),

    Plus,
    Minus,
    Star,
    Slash,
    Assign,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    SemiColon,

    Let,
    Eof,
}

impl TokenKind {
    /// Compares the variant only, ignoring any literal payload.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(_) => write!(f, "integer literal"),
            TokenKind::Float(_) => write!(f, "float literal"),
            TokenKind::Identifier(_) => write!(f, "identifier"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBrace => write!(f, "'{{'"),
            TokenKind::RightBrace => write!(f, "'}}'"),
            TokenKind::SemiColon => write!(f, "';'"),
            TokenKind::Let => write!(f, "'let'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}
