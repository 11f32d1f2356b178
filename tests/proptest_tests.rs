//! Property tests for the source front end and code generator.

use proptest::prelude::*;
use quadc::analyzer::SemanticAnalyzer;
use quadc::codegen::{Op, Operand, Quad};
use quadc::lexer::Lexer;
use quadc::parser::{BinOpKind, Expr, Literal, Parser, Stmt};
use quadc::{compile, compile_tree};

fn parse_expr(source: &str) -> Expr {
    let tokens = Lexer::tokenize(source).unwrap();
    let program = Parser::new(tokens).parse().unwrap();
    match program.0.as_slice() {
        [Stmt::Expr(expr)] => expr.clone(),
        other => panic!("expected one expression statement, got {:?}", other),
    }
}

fn operator() -> impl Strategy<Value = (&'static str, BinOpKind)> {
    prop_oneof![
        Just(("+", BinOpKind::Add)),
        Just(("-", BinOpKind::Sub)),
        Just(("*", BinOpKind::Mul)),
        Just(("/", BinOpKind::Div)),
    ]
}

/// Mirrors the grammar: `*` and `/` bind tighter, all four are left-associative.
fn reference_tree(operands: &[i64], ops: &[BinOpKind]) -> Expr {
    let term = |start: usize, end: usize| {
        let mut node = Expr::int(operands[start]);
        for (op, n) in ops[start..end].iter().zip(&operands[start + 1..=end]) {
            node = Expr::binary(*op, node, Expr::int(*n));
        }
        node
    };

    let mut start = 0;
    let mut expr: Option<Expr> = None;
    let mut pending: Option<BinOpKind> = None;
    for i in 0..=ops.len() {
        let additive = ops
            .get(i)
            .is_some_and(|op| matches!(op, BinOpKind::Add | BinOpKind::Sub));
        if i == ops.len() || additive {
            let t = term(start, i);
            expr = Some(match (expr, pending) {
                (Some(e), Some(op)) => Expr::binary(op, e, t),
                _ => t,
            });
            pending = ops.get(i).copied();
            start = i + 1;
        }
    }
    expr.unwrap()
}

fn numbers(code: &[Quad], prefix: char) -> Vec<usize> {
    let mut seen = vec![];
    for quad in code {
        for slot in [&quad.arg1, &quad.arg2, &quad.result] {
            if let Some(Operand::Name(name)) = slot {
                if let Some(n) = name.strip_prefix(prefix).and_then(|n| n.parse().ok()) {
                    if !seen.contains(&n) {
                        seen.push(n);
                    }
                }
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn lexer_never_panics(source in "[ -~\n]{0,200}") {
        let _ = Lexer::tokenize(&source);
    }

    #[test]
    fn compile_never_panics(source in "[a-z0-9 ={}();+*/.-]{0,120}") {
        let _ = compile(&source);
    }

    #[test]
    fn integer_literal(n in 0i64..=i64::MAX) {
        prop_assert_eq!(parse_expr(&n.to_string()), Expr::Literal(Literal::Int(n)));
    }

    #[test]
    fn precedence_and_associativity(
        first in 0i64..1000,
        rest in prop::collection::vec((operator(), 0i64..1000), 0..8),
    ) {
        let mut source = first.to_string();
        let mut operands = vec![first];
        let mut ops = vec![];
        for ((text, op), n) in &rest {
            source.push_str(&format!(" {} {}", text, n));
            operands.push(*n);
            ops.push(*op);
        }

        prop_assert_eq!(parse_expr(&source), reference_tree(&operands, &ops));
    }

    #[test]
    fn one_temp_per_operator(ops in prop::collection::vec(operator(), 1..10)) {
        let mut source = String::from("let x = 1");
        for (text, _) in &ops {
            source.push_str(&format!(" {} 2", text));
        }

        let code = compile(&source).unwrap();
        let temps = numbers(&code, 't');
        prop_assert_eq!(temps, (0..ops.len()).collect::<Vec<_>>());
    }

    #[test]
    fn nested_loops_get_fresh_labels(depth in 1usize..6) {
        let mut json = r#"{"type": "block", "statements": []}"#.to_string();
        for _ in 0..depth {
            json = format!(
                r#"{{"type": "while", "condition": {{"type": "literal", "value": true}}, "body": {}}}"#,
                json
            );
        }

        let code = compile_tree(&json, SemanticAnalyzer::new()).unwrap();
        let defined: Vec<&Quad> = code.iter().filter(|q| q.op == Op::Label).collect();
        prop_assert_eq!(defined.len(), 2 * depth);

        let mut labels = numbers(&code, 'L');
        labels.sort_unstable();
        prop_assert_eq!(labels, (0..2 * depth).collect::<Vec<_>>());
    }
}
