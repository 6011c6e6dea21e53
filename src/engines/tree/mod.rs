pub mod node;
pub mod builder;
pub mod operators;

pub use builder::{TerminalSet, TreeBuilder};
pub use node::{Operator, OperatorFamily, Terminal, TreeNode};
pub use operators::{point_mutation, subtree_crossover};
