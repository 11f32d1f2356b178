mod codegen;
mod quad;

pub use codegen::*;
pub use quad::*;
