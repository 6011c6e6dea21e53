use super::grammatical::{ExpressionSpec, Grammatical};
use super::traits::Individual;
use crate::engines::generation::ByteGenome;
use crate::types::IndividualState;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

/// Radii are clamped to this magnitude before drawing.
pub const RADIUS_LIMIT: f64 = 50.0;

/// Parameter range and resolution for sampling a polar curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarSampling {
    pub t_min: f64,
    pub t_max: f64,
    pub num_points: usize,
}

impl Default for PolarSampling {
    fn default() -> Self {
        Self {
            t_min: 0.0,
            t_max: 10.0 * PI,
            num_points: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub t: f64,
    pub r: f64,
}

impl PolarPoint {
    pub fn to_cartesian(&self) -> (f64, f64) {
        (self.r * self.t.cos(), self.r * self.t.sin())
    }
}

/// Grammatical-evolution individual whose phenotype is a polar radius `r(t)`.
#[derive(Debug, Clone)]
pub struct RadiusIndividual {
    core: Grammatical,
    sampling: PolarSampling,
}

impl RadiusIndividual {
    pub fn random(spec: Arc<ExpressionSpec>, rng: &mut dyn RngCore) -> Self {
        Self::wrap(Grammatical::random(spec, rng))
    }

    pub fn from_genome(spec: Arc<ExpressionSpec>, genome: ByteGenome) -> Self {
        Self::wrap(Grammatical::from_genome(spec, genome))
    }

    fn wrap(core: Grammatical) -> Self {
        Self {
            core,
            sampling: PolarSampling::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: PolarSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn sampling(&self) -> PolarSampling {
        self.sampling
    }

    pub fn expression(&self) -> &str {
        self.core.expression()
    }

    /// Radius at `t`, clamped to `[-RADIUS_LIMIT, RADIUS_LIMIT]`.
    pub fn radius(&self, t: f64) -> f64 {
        self.core
            .compiled()
            .eval_t(t)
            .clamp(-RADIUS_LIMIT, RADIUS_LIMIT)
    }

    /// `num_points + 1` evenly spaced samples from `t_min` to `t_max` inclusive.
    pub fn polar_points(&self) -> Vec<PolarPoint> {
        let PolarSampling {
            t_min,
            t_max,
            num_points,
        } = self.sampling;
        let steps = num_points.max(1);
        let step = (t_max - t_min) / steps as f64;

        (0..=steps)
            .map(|i| {
                let t = t_min + i as f64 * step;
                PolarPoint {
                    t,
                    r: self.radius(t),
                }
            })
            .collect()
    }
}

impl Individual for RadiusIndividual {
    type Genome = ByteGenome;
    type Phenotype = String;

    fn state(&self) -> &IndividualState {
        &self.core.state
    }

    fn state_mut(&mut self) -> &mut IndividualState {
        &mut self.core.state
    }

    fn genome(&self) -> &ByteGenome {
        self.core.genome()
    }

    fn phenotype(&self) -> String {
        self.expression().to_string()
    }

    fn mutate(&mut self, rate: f64, rng: &mut dyn RngCore) {
        self.core.mutate(rate, rng);
    }

    fn crossover(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self) {
        let (a, b) = self.core.offspring(&other.core, rng);
        (
            Self::wrap(a).with_sampling(self.sampling),
            Self::wrap(b).with_sampling(other.sampling),
        )
    }
}
