use std::{fmt, str::FromStr};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolType {
    Int,
    Float,
    Char,
    Bool,
}

impl SymbolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolType::Int => "int",
            SymbolType::Float => "float",
            SymbolType::Char => "char",
            SymbolType::Bool => "bool",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, SymbolType::Int | SymbolType::Float)
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(SymbolType::Int),
            "float" => Ok(SymbolType::Float),
            "char" => Ok(SymbolType::Char),
            "bool" => Ok(SymbolType::Bool),
            _ => Err(Error::UnknownType {
                name: s.to_string(),
            }),
        }
    }
}

/// Fixed-size array; two array types are equal iff base and size match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayType {
    pub base: SymbolType,
    pub size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub return_type: SymbolType,
    pub params: Vec<SymbolType>,
}

impl FunctionType {
    pub fn new(return_type: SymbolType, params: Vec<SymbolType>) -> Self {
        Self {
            return_type,
            params,
        }
    }
}

/// Anything a name can be bound to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolInfo {
    Scalar(SymbolType),
    Array(ArrayType),
    Function(FunctionType),
}

impl SymbolInfo {
    pub fn as_scalar(&self) -> Option<SymbolType> {
        match self {
            SymbolInfo::Scalar(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_scalar(&self, ty: SymbolType) -> bool {
        self.as_scalar() == Some(ty)
    }

    pub fn is_numeric(&self) -> bool {
        self.as_scalar().is_some_and(|t| t.is_numeric())
    }
}

impl From<SymbolType> for SymbolInfo {
    fn from(ty: SymbolType) -> Self {
        SymbolInfo::Scalar(ty)
    }
}

impl From<ArrayType> for SymbolInfo {
    fn from(ty: ArrayType) -> Self {
        SymbolInfo::Array(ty)
    }
}

impl From<FunctionType> for SymbolInfo {
    fn from(ty: FunctionType) -> Self {
        SymbolInfo::Function(ty)
    }
}

impl fmt::Display for SymbolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolInfo::Scalar(t) => write!(f, "{}", t),
            SymbolInfo::Array(ArrayType { base, size }) => write!(f, "{}[{}]", base, size),
            SymbolInfo::Function(FunctionType {
                return_type,
                params,
            }) => {
                let params = params
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "fn({}) -> {}", params, return_type)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_types_compare_by_value() {
        let a = ArrayType {
            base: SymbolType::Int,
            size: 10,
        };
        let b = ArrayType {
            base: SymbolType::Int,
            size: 10,
        };
        let c = ArrayType {
            base: SymbolType::Float,
            size: 10,
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn type_names_round_trip() {
        for ty in [
            SymbolType::Int,
            SymbolType::Float,
            SymbolType::Char,
            SymbolType::Bool,
        ] {
            assert_eq!(ty.as_str().parse::<SymbolType>().unwrap(), ty);
        }
        assert!(matches!(
            "double".parse::<SymbolType>(),
            Err(Error::UnknownType { .. })
        ));
    }

    #[test]
    fn display() {
        let f = FunctionType::new(SymbolType::Float, vec![SymbolType::Float, SymbolType::Int]);
        assert_eq!(SymbolInfo::from(f).to_string(), "fn(float, int) -> float");
        let a = ArrayType {
            base: SymbolType::Char,
            size: 4,
        };
        assert_eq!(SymbolInfo::from(a).to_string(), "char[4]");
    }
}
