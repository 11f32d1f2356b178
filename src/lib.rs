//! A small compiler front end: tokens are parsed into an AST, the AST is
//! type-checked against lexical scopes, and valid programs are lowered to a
//! linear list of three-address instructions.
//!
//! ```
//! let code = quadc::compile("let x = 2 + 3 * 4; x = x - 1").unwrap();
//! let lines: Vec<_> = code.iter().map(|q| q.to_string()).collect();
//! assert_eq!(
//!     lines,
//!     ["t0 = 3 * 4", "t1 = 2 + t0", "x = t1", "t2 = x - 1", "x = t2"]
//! );
//! ```

pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

use analyzer::SemanticAnalyzer;
use codegen::Quad;
use lexer::Lexer;
use parser::{Parser, Program};

pub use error::{Error, ErrorKind, Result};

pub fn parse_source(source: &str) -> Result<Program> {
    let tokens = Lexer::tokenize(source)?;
    let mut parser = Parser::new(tokens);
    parser.parse()
}

/// Runs `analyzer` over `program`. Functions the program calls must already
/// be registered on `analyzer`.
pub fn lower(program: &Program, mut analyzer: SemanticAnalyzer) -> Result<Vec<Quad>> {
    analyzer.visit_program(program)?;
    Ok(analyzer.into_code())
}

pub fn compile(source: &str) -> Result<Vec<Quad>> {
    let program = parse_source(source)?;
    lower(&program, SemanticAnalyzer::new())
}

/// Like [`compile`], but reads the JSON tagged tree form of a program.
pub fn compile_tree(json: &str, analyzer: SemanticAnalyzer) -> Result<Vec<Quad>> {
    let program = parser::parse_tree(json)?;
    lower(&program, analyzer)
}
