use std::{fmt, str::FromStr};

use crate::{
    analyzer::{FunctionType, SymbolType},
    error::Error,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Program(pub Vec<Stmt>);

#[derive(Clone, Debug, PartialEq)]
pub struct Block(pub Vec<Stmt>);

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `let name = initializer`, typed after its initializer.
    VarDecl(String, Expr),
    Declaration(Declaration),
    /// Makes the function callable. Its body is not lowered.
    FunctionDecl(String, FunctionType),
    Assignment(Assignment),
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),
    While(Expr, Box<Stmt>),
    Block(Block),
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub ty: SymbolType,
    pub name: String,
    pub is_const: bool,
    pub array_size: Option<i64>,
}

impl Declaration {
    pub fn scalar(ty: SymbolType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            is_const: false,
            array_size: None,
        }
    }

    pub fn array(ty: SymbolType, name: impl Into<String>, size: i64) -> Self {
        Self {
            array_size: Some(size),
            ..Self::scalar(ty, name)
        }
    }

    pub fn constant(ty: SymbolType, name: impl Into<String>) -> Self {
        Self {
            is_const: true,
            ..Self::scalar(ty, name)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub index: Option<Expr>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Binary(BinOpKind, Box<Expr>, Box<Expr>),
    Unary(UnaryOpKind, Box<Expr>),
    Literal(Literal),
    Variable(String),
    ArrayAccess(String, Box<Expr>),
    Call(String, Vec<Expr>),
}

impl Expr {
    pub fn binary(kind: BinOpKind, left: Expr, right: Expr) -> Self {
        Expr::Binary(kind, Box::new(left), Box::new(right))
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Literal(Literal::Float(value))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{:?}", v),
            Literal::Bool(v) => write!(f, "{}", v),
            Literal::Text(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,

    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,

    LogicalAnd,
    LogicalOr,
}

impl BinOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::LessThan => "<",
            BinOpKind::GreaterThan => ">",
            BinOpKind::LessEqual => "<=",
            BinOpKind::GreaterEqual => ">=",
            BinOpKind::Equal => "==",
            BinOpKind::NotEqual => "!=",
            BinOpKind::LogicalAnd => "&&",
            BinOpKind::LogicalOr => "||",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div
        )
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinOpKind::LessThan
                | BinOpKind::GreaterThan
                | BinOpKind::LessEqual
                | BinOpKind::GreaterEqual
                | BinOpKind::Equal
                | BinOpKind::NotEqual
        )
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinOpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "+" => BinOpKind::Add,
            "-" => BinOpKind::Sub,
            "*" => BinOpKind::Mul,
            "/" => BinOpKind::Div,
            "<" => BinOpKind::LessThan,
            ">" => BinOpKind::GreaterThan,
            "<=" => BinOpKind::LessEqual,
            ">=" => BinOpKind::GreaterEqual,
            "==" => BinOpKind::Equal,
            "!=" => BinOpKind::NotEqual,
            "&&" => BinOpKind::LogicalAnd,
            "||" => BinOpKind::LogicalOr,
            _ => return Err(Error::UnknownOperator { op: s.to_string() }),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    Neg,
    LogicalNot,
}

impl UnaryOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOpKind::Neg => "-",
            UnaryOpKind::LogicalNot => "!",
        }
    }
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnaryOpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" => Ok(UnaryOpKind::Neg),
            "!" => Ok(UnaryOpKind::LogicalNot),
            _ => Err(Error::UnknownOperator { op: s.to_string() }),
        }
    }
}
