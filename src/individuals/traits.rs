use crate::types::{IndividualId, IndividualState, PresentationSettings};
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Contract every evolvable representation fulfils.
///
/// `Clone` is a deep, independent copy that keeps id and fitness. Offspring
/// from [`Individual::crossover`] are new individuals with fresh ids.
pub trait Individual: Clone + fmt::Debug {
    type Genome: Clone + PartialEq + fmt::Debug;
    type Phenotype;

    fn state(&self) -> &IndividualState;
    fn state_mut(&mut self) -> &mut IndividualState;

    fn genome(&self) -> &Self::Genome;

    /// Pure function of the genome (and the variant's fixed configuration).
    fn phenotype(&self) -> Self::Phenotype;

    /// Perturb the genome in place and drop every cache derived from it.
    fn mutate(&mut self, rate: f64, rng: &mut dyn RngCore);

    fn crossover(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self);

    fn id(&self) -> IndividualId {
        self.state().id
    }

    fn fitness(&self) -> u32 {
        self.state().fitness
    }

    fn is_selected(&self) -> bool {
        self.state().selected
    }

    /// Sampling capability for planar variants.
    fn as_visual(&self) -> Option<&dyn Visualize> {
        None
    }

    /// Audio playback capability.
    fn as_playback(&mut self) -> Option<&mut dyn Playback> {
        None
    }
}

/// Numeric raster of a phenotype; turning it into pixels is up to the caller.
pub trait Visualize {
    /// Row-major `height × width` intensities in `[0, 1]` over the square
    /// `[-1, 1]²`.
    fn intensity_field(&self, width: usize, height: usize) -> Vec<f64>;

    /// Stable identifier of the current genome.
    fn genome_key(&self) -> String;

    /// Key a renderer can cache its output under.
    fn render_key(&self, width: usize, height: usize, settings: &PresentationSettings) -> String {
        format!(
            "{}_{}x{}_{}",
            self.genome_key(),
            width,
            height,
            settings.palette
        )
    }
}

/// Byte sink for MIDI messages; the core passes it through without reading it.
pub trait MidiSink: Send + Sync {
    fn send(&self, bytes: &[u8]);
}

pub trait Playback {
    fn set_midi_output(&mut self, output: Arc<dyn MidiSink>);
    fn play(&mut self);
    fn stop(&mut self);
}
