use std::fmt;

use crate::parser::{BinOpKind, UnaryOpKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    Binary(BinOpKind),
    Unary(UnaryOpKind),
    Assign,
    IfNot,
    Goto,
    Label,
    Alloc,
    ArrayStore,
    ArrayLoad,
    Call,
    IntToFloat,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Binary(kind) => kind.as_str(),
            Op::Unary(kind) => kind.as_str(),
            Op::Assign => "=",
            Op::IfNot => "ifnot",
            Op::Goto => "goto",
            Op::Label => "label",
            Op::Alloc => "alloc",
            Op::ArrayStore => "arraystore",
            Op::ArrayLoad => "arrayload",
            Op::Call => "call",
            Op::IntToFloat => "inttofloat",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// Variable, temporary, label or function name.
    Name(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Argument list of a `call`; missing values stay `None`.
    Args(Vec<Option<Operand>>),
}

impl Operand {
    pub fn name(name: impl Into<String>) -> Self {
        Operand::Name(name.into())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Name(name) => f.write_str(name),
            Operand::Int(v) => write!(f, "{}", v),
            Operand::Float(v) => write!(f, "{:?}", v),
            Operand::Bool(v) => write!(f, "{}", v),
            Operand::Char(c) => write!(f, "{:?}", c),
            Operand::Args(args) => {
                let args = args.iter().map(display_slot).collect::<Vec<_>>().join(", ");
                f.write_str(&args)
            }
        }
    }
}

fn display_slot(operand: &Option<Operand>) -> String {
    operand
        .as_ref()
        .map_or_else(|| "_".to_string(), |o| o.to_string())
}

/// One three-address instruction: `(op, arg1, arg2, result)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Quad {
    pub op: Op,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
    pub result: Option<Operand>,
}

impl Quad {
    pub fn new(
        op: Op,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        result: Option<Operand>,
    ) -> Self {
        Self {
            op,
            arg1,
            arg2,
            result,
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg1 = display_slot(&self.arg1);
        let arg2 = display_slot(&self.arg2);
        let result = display_slot(&self.result);

        match self.op {
            Op::Label => write!(f, "{}:", arg1),
            Op::IfNot => write!(f, "ifnot {} goto {}", arg1, result),
            Op::Goto => write!(f, "goto {}", result),
            Op::Alloc => write!(f, "alloc {}, {}", arg1, arg2),
            Op::ArrayStore => write!(f, "arraystore {}, {}, {}", arg1, arg2, result),
            Op::ArrayLoad => write!(f, "{} = arrayload {}, {}", result, arg1, arg2),
            Op::Call if self.result.is_some() => write!(f, "{} = call {}({})", result, arg1, arg2),
            Op::Call => write!(f, "call {}({})", arg1, arg2),
            Op::IntToFloat => write!(f, "{} = inttofloat {}", result, arg1),
            Op::Assign => write!(f, "{} = {}", result, arg1),
            Op::Unary(kind) => write!(f, "{} = {}{}", result, kind, arg1),
            Op::Binary(kind) => write!(f, "{} = {} {} {}", result, arg1, kind, arg2),
        }
    }
}
