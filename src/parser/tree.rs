//! Reader for the JSON tagged tree, an alternate front end to [`Parser`](super::Parser).
//!
//! Every node is an object whose `"type"` field names its kind:
//!
//! ```json
//! { "type": "assignment", "var_name": "x",
//!   "expr": { "type": "literal", "value": 42 } }
//! ```
//!
//! The input is either one node or an array of top-level nodes.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    analyzer::FunctionType,
    error::{Error, Result},
};

use super::{Assignment, Block, Declaration, Expr, Literal, Program, Stmt};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Declaration {
        data_type: String,
        var_name: String,
        #[serde(default)]
        is_const: bool,
        #[serde(default)]
        array_size: Option<i64>,
    },
    /// Only the signature is read; `params` holds `[type, name]` pairs.
    FunctionDecl {
        func_name: String,
        return_type: String,
        #[serde(default)]
        params: Vec<(String, String)>,
    },
    Assignment {
        var_name: String,
        expr: Box<TreeNode>,
        #[serde(default)]
        index: Option<Box<TreeNode>>,
    },
    BinaryOp {
        op: String,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    UnaryOp {
        op: String,
        operand: Box<TreeNode>,
    },
    ArrayAccess {
        array_name: String,
        index: Box<TreeNode>,
    },
    If {
        condition: Box<TreeNode>,
        then_block: Box<TreeNode>,
        #[serde(default)]
        else_block: Option<Box<TreeNode>>,
    },
    While {
        condition: Box<TreeNode>,
        body: Box<TreeNode>,
    },
    FunctionCall {
        func_name: String,
        #[serde(default)]
        args: Vec<TreeNode>,
    },
    Variable {
        name: String,
    },
    Literal {
        value: Value,
    },
    Block {
        #[serde(default)]
        statements: Vec<TreeNode>,
    },
}

impl TreeNode {
    fn tag(&self) -> &'static str {
        match self {
            TreeNode::Declaration { .. } => "declaration",
            TreeNode::FunctionDecl { .. } => "function_decl",
            TreeNode::Assignment { .. } => "assignment",
            TreeNode::BinaryOp { .. } => "binary_op",
            TreeNode::UnaryOp { .. } => "unary_op",
            TreeNode::ArrayAccess { .. } => "array_access",
            TreeNode::If { .. } => "if",
            TreeNode::While { .. } => "while",
            TreeNode::FunctionCall { .. } => "function_call",
            TreeNode::Variable { .. } => "variable",
            TreeNode::Literal { .. } => "literal",
            TreeNode::Block { .. } => "block",
        }
    }

    pub fn into_stmt(self) -> Result<Stmt> {
        Ok(match self {
            TreeNode::Declaration {
                data_type,
                var_name,
                is_const,
                array_size,
            } => Stmt::Declaration(Declaration {
                ty: data_type.parse()?,
                name: var_name,
                is_const,
                array_size,
            }),
            TreeNode::FunctionDecl {
                func_name,
                return_type,
                params,
            } => Stmt::FunctionDecl(
                func_name,
                FunctionType::new(
                    return_type.parse()?,
                    params
                        .iter()
                        .map(|(ty, _)| ty.parse())
                        .collect::<Result<_>>()?,
                ),
            ),
            TreeNode::Assignment {
                var_name,
                expr,
                index,
            } => Stmt::Assignment(Assignment {
                name: var_name,
                index: index.map(|i| i.into_expr()).transpose()?,
                value: expr.into_expr()?,
            }),
            TreeNode::If {
                condition,
                then_block,
                else_block,
            } => Stmt::If(
                condition.into_expr()?,
                Box::new(then_block.into_stmt()?),
                else_block
                    .map(|e| e.into_stmt().map(Box::new))
                    .transpose()?,
            ),
            TreeNode::While { condition, body } => {
                Stmt::While(condition.into_expr()?, Box::new(body.into_stmt()?))
            }
            TreeNode::Block { statements } => Stmt::Block(Block(
                statements
                    .into_iter()
                    .map(TreeNode::into_stmt)
                    .collect::<Result<_>>()?,
            )),
            expr => Stmt::Expr(expr.into_expr()?),
        })
    }

    pub fn into_expr(self) -> Result<Expr> {
        Ok(match self {
            TreeNode::BinaryOp { op, left, right } => {
                Expr::binary(op.parse()?, left.into_expr()?, right.into_expr()?)
            }
            TreeNode::UnaryOp { op, operand } => {
                Expr::Unary(op.parse()?, Box::new(operand.into_expr()?))
            }
            TreeNode::ArrayAccess { array_name, index } => {
                Expr::ArrayAccess(array_name, Box::new(index.into_expr()?))
            }
            TreeNode::FunctionCall { func_name, args } => Expr::Call(
                func_name,
                args.into_iter()
                    .map(TreeNode::into_expr)
                    .collect::<Result<_>>()?,
            ),
            TreeNode::Variable { name } => Expr::Variable(name),
            TreeNode::Literal { value } => Expr::Literal(literal_from_json(value)?),
            stmt => {
                return Err(Error::MalformedTree(format!(
                    "'{}' node used where an expression is expected",
                    stmt.tag()
                )))
            }
        })
    }
}

/// Literal shapes follow the JSON value: integral numbers are `Int`, other
/// numbers `Float`. Strings of any length are kept as `Text` and checked later.
fn literal_from_json(value: Value) -> Result<Literal> {
    match value {
        Value::Bool(b) => Ok(Literal::Bool(b)),
        Value::Number(ref n) => {
            if let Some(i) = n.as_i64() {
                Ok(Literal::Int(i))
            } else if n.is_f64() {
                n.as_f64()
                    .map(Literal::Float)
                    .ok_or_else(|| Error::InvalidLiteral {
                        value: value.to_string(),
                    })
            } else {
                Err(Error::InvalidLiteral {
                    value: value.to_string(),
                })
            }
        }
        Value::String(s) => Ok(Literal::Text(s)),
        other => Err(Error::InvalidLiteral {
            value: other.to_string(),
        }),
    }
}

pub fn parse_tree(json: &str) -> Result<Program> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| Error::MalformedTree(e.to_string()))?;
    let nodes: Vec<TreeNode> = match value {
        Value::Array(_) => serde_json::from_value(value),
        _ => serde_json::from_value(value).map(|node| vec![node]),
    }
    .map_err(|e| Error::MalformedTree(e.to_string()))?;

    let stmts = nodes
        .into_iter()
        .map(TreeNode::into_stmt)
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(statements = stmts.len(), "read tagged tree");
    Ok(Program(stmts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::SymbolType,
        parser::{BinOpKind, UnaryOpKind},
    };

    #[test]
    fn declaration_defaults() {
        let program = parse_tree(r#"{"type": "declaration", "data_type": "int", "var_name": "x"}"#)
            .unwrap();
        assert_eq!(
            program.0,
            vec![Stmt::Declaration(Declaration::scalar(SymbolType::Int, "x"))]
        );
    }

    #[test]
    fn array_assignment() {
        let json = r#"[
            {"type": "declaration", "data_type": "int", "var_name": "arr", "array_size": 5},
            {"type": "assignment", "var_name": "arr",
             "index": {"type": "literal", "value": 2},
             "expr": {"type": "literal", "value": 10}}
        ]"#;
        let program = parse_tree(json).unwrap();
        assert_eq!(
            program.0,
            vec![
                Stmt::Declaration(Declaration::array(SymbolType::Int, "arr", 5)),
                Stmt::Assignment(Assignment {
                    name: "arr".to_string(),
                    index: Some(Expr::int(2)),
                    value: Expr::int(10),
                }),
            ]
        );
    }

    #[test]
    fn literal_shapes() {
        let lit = |json: &str| {
            let node: TreeNode = serde_json::from_str(json).unwrap();
            node.into_expr()
        };
        assert_eq!(
            lit(r#"{"type": "literal", "value": true}"#).unwrap(),
            Expr::Literal(Literal::Bool(true))
        );
        assert_eq!(
            lit(r#"{"type": "literal", "value": 7}"#).unwrap(),
            Expr::int(7)
        );
        assert_eq!(
            lit(r#"{"type": "literal", "value": 2.0}"#).unwrap(),
            Expr::float(2.0)
        );
        assert_eq!(
            lit(r#"{"type": "literal", "value": "ab"}"#).unwrap(),
            Expr::Literal(Literal::Text("ab".to_string()))
        );
        assert!(matches!(
            lit(r#"{"type": "literal", "value": null}"#),
            Err(Error::InvalidLiteral { .. })
        ));
        assert!(matches!(
            lit(r#"{"type": "literal", "value": [1]}"#),
            Err(Error::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn operators() {
        let json = r#"{"type": "unary_op", "op": "!",
            "operand": {"type": "binary_op", "op": "<=",
                "left": {"type": "variable", "name": "n"},
                "right": {"type": "literal", "value": 1}}}"#;
        let program = parse_tree(json).unwrap();
        assert_eq!(
            program.0,
            vec![Stmt::Expr(Expr::Unary(
                UnaryOpKind::LogicalNot,
                Box::new(Expr::binary(BinOpKind::LessEqual, Expr::var("n"), Expr::int(1))),
            ))]
        );
    }

    #[test]
    fn unknown_operator() {
        let json = r#"{"type": "binary_op", "op": "%",
            "left": {"type": "literal", "value": 1},
            "right": {"type": "literal", "value": 2}}"#;
        let err = parse_tree(json).unwrap_err();
        assert_eq!(err, Error::UnknownOperator { op: "%".to_string() });
        assert!(err.is_type_error());
    }

    #[test]
    fn unknown_data_type() {
        let json = r#"{"type": "declaration", "data_type": "string", "var_name": "s"}"#;
        assert_eq!(
            parse_tree(json).unwrap_err(),
            Error::UnknownType {
                name: "string".to_string()
            }
        );
    }

    #[test]
    fn statement_in_expression_position() {
        let json = r#"{"type": "assignment", "var_name": "x",
            "expr": {"type": "block", "statements": []}}"#;
        assert!(matches!(parse_tree(json), Err(Error::MalformedTree(_))));
    }

    #[test]
    fn function_declaration_signature() {
        let json = r#"{"type": "function_decl", "func_name": "factorial",
            "return_type": "int", "params": [["int", "n"]],
            "body": {"type": "block", "statements": [{"type": "return"}]}}"#;
        assert_eq!(
            parse_tree(json).unwrap().0,
            vec![Stmt::FunctionDecl(
                "factorial".to_string(),
                FunctionType::new(SymbolType::Int, vec![SymbolType::Int]),
            )]
        );

        let json = r#"{"type": "function_decl", "func_name": "f",
            "return_type": "int", "params": [["long", "n"]]}"#;
        assert!(matches!(parse_tree(json), Err(Error::UnknownType { .. })));
    }

    #[test]
    fn unknown_node_type() {
        let json = r#"{"type": "return", "value": {"type": "literal", "value": 1}}"#;
        assert!(matches!(parse_tree(json), Err(Error::MalformedTree(_))));
    }
}
