//! Interactive evolutionary art: grammar-derived expressions, GP trees and
//! parametric curves evolved from user ratings.

pub mod config;
pub mod engines;
pub mod error;
pub mod individuals;
pub mod types;

pub use config::{AppConfig, ConfigManager, VariantKind};
pub use engines::evolution::{EvolutionaryAlgorithm, GenerationSnapshot};
pub use error::{EvoartError, Result};
pub use individuals::{Individual, MidiSink, Playback, Visualize};
pub use types::{IndividualId, IndividualState, PresentationSettings};
