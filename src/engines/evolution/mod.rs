pub mod algorithm;
pub mod history;

pub use algorithm::{EvolutionaryAlgorithm, GenerationObserver, Spawner};
pub use history::{GenerationHistory, GenerationSnapshot};
