use crate::individuals::Individual;
use chrono::{DateTime, Utc};

/// Frozen copy of one generation. The stored individuals are clones, so later
/// changes to the live population never reach a snapshot.
#[derive(Debug, Clone)]
pub struct GenerationSnapshot<I> {
    pub generation: usize,
    pub population: Vec<I>,
    /// Selected individuals at the time of the snapshot, in selection order.
    pub selected: Vec<I>,
    pub recorded_at: DateTime<Utc>,
}

impl<I: Individual> GenerationSnapshot<I> {
    pub fn capture(generation: usize, population: &[I], selected: Vec<I>) -> Self {
        Self {
            generation,
            population: population.to_vec(),
            selected,
            recorded_at: Utc::now(),
        }
    }

    pub fn average_fitness(&self) -> f64 {
        if self.population.is_empty() {
            return 0.0;
        }
        let total: u64 = self.population.iter().map(|i| u64::from(i.fitness())).sum();
        total as f64 / self.population.len() as f64
    }
}

/// Append-only list of snapshots, indexed in recording order.
#[derive(Debug, Clone)]
pub struct GenerationHistory<I> {
    snapshots: Vec<GenerationSnapshot<I>>,
}

impl<I> Default for GenerationHistory<I> {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }
}

impl<I> GenerationHistory<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: GenerationSnapshot<I>) {
        self.snapshots.push(snapshot);
    }

    pub fn get(&self, index: usize) -> Option<&GenerationSnapshot<I>> {
        self.snapshots.get(index)
    }

    pub fn latest(&self) -> Option<&GenerationSnapshot<I>> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationSnapshot<I>> {
        self.snapshots.iter()
    }
}
