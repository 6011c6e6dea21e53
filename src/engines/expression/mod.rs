pub mod ast;
pub mod parser;
pub mod compiler;

pub use ast::{BinaryOp, Expr, Function, Inputs, Variable};
pub use compiler::{CompiledExpression, ExpressionCompiler, Signature};
pub use parser::parse;
