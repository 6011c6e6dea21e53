pub mod traits;
pub mod evolution;
pub mod grammar;
pub mod tree;
pub mod manager;

pub use manager::{AppConfig, ConfigManager, VariantKind};
pub use evolution::EvolutionConfig;
pub use grammar::{CrossoverKind, GrammarConfig};
pub use tree::TreeConfig;
