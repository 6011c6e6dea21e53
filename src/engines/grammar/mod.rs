pub mod gene_consumer;
pub mod grammar;
pub mod presets;

pub use gene_consumer::GeneConsumer;
pub use grammar::{default_terminal, Derivation, DerivationLimits, Grammar, Production};
