pub mod genome;
pub mod operators;

pub use genome::ByteGenome;
