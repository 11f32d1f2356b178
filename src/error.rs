//! Error types shared by every stage of the pipeline.

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Declaration,
    Name,
    Type,
    Const,
}

/// Compilation errors. The first one raised aborts the stage that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lexing and parsing
    /// Token did not match what the grammar expected at this point.
    #[error("Syntax error at line {line}, column {column}: expected {expected}, got {found}")]
    SyntaxError {
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },

    #[error("Syntax error at line {line}, column {column}: unrecognized character '{found}'")]
    UnrecognizedCharacter {
        line: usize,
        column: usize,
        found: char,
    },

    /// The JSON tree could not be turned into an AST.
    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    // Declarations
    #[error("Declaration error: '{name}' is already declared in this scope")]
    DuplicateDeclaration { name: String },

    #[error("Declaration error: array '{name}' must have a positive size, got {size}")]
    InvalidArraySize { name: String, size: i64 },

    #[error("Declaration error: unknown type '{name}'")]
    UnknownType { name: String },

    // Name resolution
    #[error("Name error: '{name}' is not declared")]
    UndeclaredVariable { name: String },

    #[error("Name error: function '{name}' is not declared")]
    UndeclaredFunction { name: String },

    // Type checking
    /// A value of the wrong type showed up where a specific type is required.
    #[error("Type error: {context}: expected {expected}, got {found}")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    #[error("Type error: invalid operands for '{op}': {left} and {right}")]
    InvalidOperands {
        op: String,
        left: String,
        right: String,
    },

    #[error("Type error: invalid operand for unary '{op}': {operand}")]
    InvalidOperand { op: String, operand: String },

    #[error("Type error: unknown operator '{op}'")]
    UnknownOperator { op: String },

    #[error("Type error: function '{name}' expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Type error: invalid literal value {value}")]
    InvalidLiteral { value: String },

    #[error("Type error: '{name}' is an array and cannot be assigned as a whole")]
    ArrayAssignment { name: String },

    #[error("Type error: '{name}' is not an array")]
    NotAnArray { name: String },

    #[error("Const error: cannot assign to constant '{name}'")]
    ConstAssignment { name: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SyntaxError { .. }
            | Error::UnrecognizedCharacter { .. }
            | Error::MalformedTree(_) => ErrorKind::Syntax,
            Error::DuplicateDeclaration { .. }
            | Error::InvalidArraySize { .. }
            | Error::UnknownType { .. } => ErrorKind::Declaration,
            Error::UndeclaredVariable { .. } | Error::UndeclaredFunction { .. } => ErrorKind::Name,
            Error::TypeMismatch { .. }
            | Error::InvalidOperands { .. }
            | Error::InvalidOperand { .. }
            | Error::UnknownOperator { .. }
            | Error::ArityMismatch { .. }
            | Error::InvalidLiteral { .. }
            | Error::ArrayAssignment { .. }
            | Error::NotAnArray { .. } => ErrorKind::Type,
            Error::ConstAssignment { .. } => ErrorKind::Const,
        }
    }

    /// Const violations count as type errors too.
    pub fn is_type_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Type | ErrorKind::Const)
    }

    pub(crate) fn mismatch(
        context: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Error::TypeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_error_is_a_type_error() {
        let err = Error::ConstAssignment {
            name: "MAX".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Const);
        assert!(err.is_type_error());
        assert!(!Error::UndeclaredVariable {
            name: "x".to_string()
        }
        .is_type_error());
    }

    #[test]
    fn syntax_error_message_carries_position() {
        let err = Error::SyntaxError {
            line: 3,
            column: 7,
            expected: "')'".to_string(),
            found: "end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Syntax error at line 3, column 7: expected ')', got end of input"
        );
    }
}
