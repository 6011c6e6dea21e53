use super::traits::Individual;
use crate::error::{EvoartError, Result};
use crate::types::IndividualState;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

pub const GENOME_LENGTH: usize = 7;
pub const DENOMINATORS: [f64; 9] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0];

const NUMERATOR: usize = 0;
const DENOMINATOR: usize = 1;
const MIN_COMPONENT: f64 = 1e-10;
const FALLBACK_RADIUS: f64 = 0.1;

/// Decoded, clamped superformula parameters. `m = numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperFormulaParams {
    pub numerator: u32,
    pub denominator: u32,
    pub n1: f64,
    pub n2: f64,
    pub n3: f64,
    pub a: f64,
    pub b: f64,
}

impl SuperFormulaParams {
    pub fn m(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Gielis radius `(|cos(mφ/4)/a|^n2 + |sin(mφ/4)/b|^n3)^(-1/n1)`.
    ///
    /// Components are floored at 1e-10; any non-finite or non-positive result
    /// becomes 0.1.
    pub fn radius(&self, phi: f64) -> f64 {
        let angle = self.m() * phi / 4.0;
        let cos_part = (angle.cos() / self.a).abs().max(MIN_COMPONENT);
        let sin_part = (angle.sin() / self.b).abs().max(MIN_COMPONENT);

        let sum = cos_part.powf(self.n2) + sin_part.powf(self.n3);
        if !sum.is_finite() || sum <= 0.0 {
            return FALLBACK_RADIUS;
        }

        let radius = sum.powf(-1.0 / self.n1);
        if radius.is_finite() && radius > 0.0 {
            radius
        } else {
            FALLBACK_RADIUS
        }
    }

    /// Angle after which the curve closes: `8πq / gcd(p, 4q)` for `m = p/q`.
    pub fn phi_range(&self) -> f64 {
        let p = self.numerator as u64;
        let q = self.denominator as u64;
        8.0 * PI * q as f64 / gcd(p, 4 * q) as f64
    }
}

impl fmt::Display for SuperFormulaParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m={}/{} ({:.2}), φRange={:.1}π, n1={:.3}, n2={:.3}, n3={:.3}, a={:.3}, b={:.3}",
            self.numerator,
            self.denominator,
            self.m(),
            self.phi_range() / PI,
            self.n1,
            self.n2,
            self.n3,
            self.a,
            self.b
        )
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub phi: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

/// Real-vector individual over the seven superformula parameters
/// `[numerator, denominator, n1, n2, n3, a, b]`.
#[derive(Debug, Clone)]
pub struct SuperFormulaIndividual {
    state: IndividualState,
    genome: Vec<f64>,
    num_points: usize,
}

impl SuperFormulaIndividual {
    pub fn random(rng: &mut dyn RngCore) -> Self {
        let genome = vec![
            rng.gen_range(1u32..=20) as f64,
            random_denominator(rng),
            rng.gen::<f64>() * 10.0 + 0.1,
            rng.gen::<f64>() * 10.0 + 0.1,
            rng.gen::<f64>() * 10.0 + 0.1,
            rng.gen::<f64>() * 3.0 + 0.1,
            rng.gen::<f64>() * 3.0 + 0.1,
        ];
        Self::new(genome)
    }

    pub fn from_genome(genome: Vec<f64>) -> Result<Self> {
        if genome.len() != GENOME_LENGTH {
            return Err(EvoartError::InvalidGenome(format!(
                "superformula genome needs {} values, got {}",
                GENOME_LENGTH,
                genome.len()
            )));
        }
        if genome.iter().any(|v| !v.is_finite()) {
            return Err(EvoartError::InvalidGenome(
                "superformula genome contains a non-finite value".to_string(),
            ));
        }
        Ok(Self::new(genome))
    }

    fn new(genome: Vec<f64>) -> Self {
        Self {
            state: IndividualState::new(),
            genome,
            num_points: 1000,
        }
    }

    pub fn params(&self) -> SuperFormulaParams {
        let g = &self.genome;
        SuperFormulaParams {
            numerator: g[NUMERATOR].round().clamp(1.0, 50.0) as u32,
            denominator: g[DENOMINATOR].round().clamp(1.0, 12.0) as u32,
            n1: g[2].clamp(0.01, 20.0),
            n2: g[3].clamp(0.01, 20.0),
            n3: g[4].clamp(0.01, 20.0),
            a: g[5].clamp(0.01, 5.0),
            b: g[6].clamp(0.01, 5.0),
        }
    }

    /// `num_points` samples over `[0, phi_range)`.
    pub fn curve_points(&self) -> Vec<CurvePoint> {
        let params = self.params();
        let range = params.phi_range();
        (0..self.num_points)
            .map(|i| {
                let phi = i as f64 / self.num_points as f64 * range;
                let radius = params.radius(phi);
                CurvePoint {
                    phi,
                    radius,
                    x: radius * phi.cos(),
                    y: radius * phi.sin(),
                }
            })
            .collect()
    }
}

fn random_denominator(rng: &mut dyn RngCore) -> f64 {
    DENOMINATORS.choose(rng).copied().unwrap_or(1.0)
}

/// Inclusive clamp range of each real-valued gene.
fn bounds(index: usize) -> (f64, f64) {
    match index {
        NUMERATOR => (1.0, 50.0),
        DENOMINATOR => (1.0, 12.0),
        2..=4 => (0.01, 20.0),
        _ => (0.01, 5.0),
    }
}

impl Individual for SuperFormulaIndividual {
    type Genome = Vec<f64>;
    type Phenotype = SuperFormulaParams;

    fn state(&self) -> &IndividualState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut IndividualState {
        &mut self.state
    }

    fn genome(&self) -> &Vec<f64> {
        &self.genome
    }

    fn phenotype(&self) -> SuperFormulaParams {
        self.params()
    }

    fn mutate(&mut self, rate: f64, rng: &mut dyn RngCore) {
        for index in 0..self.genome.len() {
            if rng.gen::<f64>() >= rate {
                continue;
            }
            let gene = self.genome[index];
            let (low, high) = bounds(index);
            self.genome[index] = match index {
                NUMERATOR => (gene.round() + rng.gen_range(-3i32..=3) as f64).clamp(low, high),
                DENOMINATOR => random_denominator(rng),
                2..=4 => (gene + rng.sample::<f64, _>(StandardNormal) * 0.5).clamp(low, high),
                _ => (gene + rng.sample::<f64, _>(StandardNormal) * 0.2).clamp(low, high),
            };
        }
    }

    /// Integer genes are inherited whole; real genes are blended with a fresh
    /// weight per position.
    fn crossover(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self) {
        let mut first = Vec::with_capacity(GENOME_LENGTH);
        let mut second = Vec::with_capacity(GENOME_LENGTH);

        for (index, (&mine, &theirs)) in self.genome.iter().zip(&other.genome).enumerate() {
            let (low, high) = bounds(index);
            if index == NUMERATOR || index == DENOMINATOR {
                let (mine, theirs) = (mine.round(), theirs.round());
                let (mine, theirs) = if index == NUMERATOR {
                    (mine.clamp(low, high), theirs.clamp(low, high))
                } else {
                    (mine, theirs)
                };
                if rng.gen::<f64>() < 0.5 {
                    first.push(mine);
                    second.push(theirs);
                } else {
                    first.push(theirs);
                    second.push(mine);
                }
            } else {
                let alpha: f64 = rng.gen();
                first.push((alpha * mine + (1.0 - alpha) * theirs).clamp(low, high));
                second.push(((1.0 - alpha) * mine + alpha * theirs).clamp(low, high));
            }
        }

        (Self::new(first), Self::new(second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn circle() -> SuperFormulaIndividual {
        SuperFormulaIndividual::from_genome(vec![4.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0]).unwrap()
    }

    #[test]
    fn test_random_genome_ranges() {
        let mut rng = StdRng::seed_from_u64(51);
        for _ in 0..50 {
            let individual = SuperFormulaIndividual::random(&mut rng);
            let g = individual.genome();
            assert_eq!(g.len(), GENOME_LENGTH);
            assert!((1.0..=20.0).contains(&g[0]));
            assert!(DENOMINATORS.contains(&g[1]));
            assert!(g[2..5].iter().all(|v| (0.1..10.1).contains(v)));
            assert!(g[5..].iter().all(|v| (0.1..3.1).contains(v)));
        }
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            SuperFormulaIndividual::from_genome(vec![1.0; 3]),
            Err(EvoartError::InvalidGenome(_))
        ));
    }

    #[test]
    fn test_circle_has_unit_radius() {
        // m=4, n1=n2=n3=2, a=b=1 gives (cos² + sin²)^(-1/2) = 1
        let params = circle().params();
        for phi in [0.0, 0.3, 1.0, 2.5] {
            assert!((params.radius(phi) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_phi_range() {
        // m = 5/4: gcd(5, 16) = 1
        let params = SuperFormulaParams {
            numerator: 5,
            denominator: 4,
            ..circle().params()
        };
        assert!((params.phi_range() - 32.0 * PI).abs() < 1e-9);
        // m = 4/1: gcd(4, 4) = 4
        assert!((circle().params().phi_range() - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_params_clamp_out_of_range_genes() {
        let individual =
            SuperFormulaIndividual::from_genome(vec![80.4, 0.2, 25.0, -1.0, 3.0, 9.0, 0.0])
                .unwrap();
        let params = individual.params();
        assert_eq!(params.numerator, 50);
        assert_eq!(params.denominator, 1);
        assert_eq!(params.n1, 20.0);
        assert_eq!(params.n2, 0.01);
        assert_eq!(params.a, 5.0);
        assert_eq!(params.b, 0.01);
    }

    #[test]
    fn test_mutation_keeps_bounds() {
        let mut rng = StdRng::seed_from_u64(52);
        let mut individual = SuperFormulaIndividual::random(&mut rng);
        for _ in 0..200 {
            individual.mutate(1.0, &mut rng);
        }
        let g = individual.genome();
        assert!((1.0..=50.0).contains(&g[0]));
        assert!(DENOMINATORS.contains(&g[1]));
        assert!(g[2..5].iter().all(|v| (0.01..=20.0).contains(v)));
        assert!(g[5..].iter().all(|v| (0.01..=5.0).contains(v)));
    }

    #[test]
    fn test_crossover_blends_within_parents() {
        let a = SuperFormulaIndividual::from_genome(vec![3.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0])
            .unwrap();
        let b = SuperFormulaIndividual::from_genome(vec![7.0, 5.0, 3.0, 3.0, 3.0, 2.0, 2.0])
            .unwrap();
        let mut rng = StdRng::seed_from_u64(53);
        let (c, d) = a.crossover(&b, &mut rng);

        assert!([3.0, 7.0].contains(&c.genome()[0]));
        assert_eq!(c.genome()[0] + d.genome()[0], 10.0);
        for index in 2..GENOME_LENGTH {
            let (x, y) = (c.genome()[index], d.genome()[index]);
            assert!((x + y - a.genome()[index] - b.genome()[index]).abs() < 1e-9);
        }
        assert_ne!(c.id(), a.id());
    }

    #[test]
    fn test_curve_points() {
        let points = circle().curve_points();
        assert_eq!(points.len(), 1000);
        assert!(points.iter().all(|p| p.radius > 0.0 && p.x.is_finite()));
    }

    #[test]
    fn test_phenotype_display() {
        let text = circle().phenotype().to_string();
        assert!(text.starts_with("m=4/1 (4.00), φRange=2.0π"));
    }
}
