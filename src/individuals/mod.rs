//! Evolvable representations.
//!
//! Every variant implements [`Individual`]; planar ones also expose
//! [`Visualize`].

pub mod binary;
pub mod field;
pub mod grammatical;
pub mod pattern;
pub mod radius;
pub mod superformula;
pub mod traits;
pub mod tree_pattern;

pub use binary::BinaryPatternIndividual;
pub use grammatical::{ExpressionSpec, Grammatical};
pub use pattern::PatternIndividual;
pub use radius::{PolarPoint, PolarSampling, RadiusIndividual};
pub use superformula::{CurvePoint, SuperFormulaIndividual, SuperFormulaParams};
pub use traits::{Individual, MidiSink, Playback, Visualize};
pub use tree_pattern::TreePatternIndividual;
