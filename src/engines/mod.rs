pub mod evolution;
pub mod expression;
pub mod generation;
pub mod grammar;
pub mod tree;
