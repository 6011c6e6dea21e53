use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an individual.
///
/// Copies made with `Clone` keep the id: a history snapshot of an individual is
/// the same individual. Offspring from crossover always get a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndividualId(u64);

impl IndividualId {
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bookkeeping shared by every variant: identity, user score and selection flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualState {
    pub id: IndividualId,
    pub fitness: u32,
    pub selected: bool,
}

impl IndividualState {
    pub fn new() -> Self {
        Self {
            id: IndividualId::next(),
            fitness: 0,
            selected: false,
        }
    }
}

impl Default for IndividualState {
    fn default() -> Self {
        Self::new()
    }
}

/// Presentation options owned by the surrounding UI layer.
///
/// Passed explicitly into whatever needs it (e.g. field cache keys) instead of
/// being looked up globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationSettings {
    pub palette: String,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            palette: "viridis".to_string(),
        }
    }
}
