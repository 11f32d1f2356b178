mod ast;
mod parser;
mod tree;

pub use ast::*;
pub use parser::*;
pub use tree::*;
