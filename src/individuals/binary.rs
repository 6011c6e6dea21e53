use super::field::FieldCache;
use super::traits::{Individual, Visualize};
use crate::engines::generation::operators::{flip_bits, uniform_crossover};
use crate::types::IndividualState;
use rand::RngCore;

pub const GRID_SIZE: usize = 8;
pub const GENOME_LENGTH: usize = GRID_SIZE * GRID_SIZE;

/// 8×8 on/off image encoded as 64 genes of 0 or 1.
#[derive(Debug, Clone)]
pub struct BinaryPatternIndividual {
    state: IndividualState,
    genome: Vec<u8>,
    field: FieldCache,
}

impl BinaryPatternIndividual {
    pub fn random(rng: &mut dyn RngCore) -> Self {
        let mut genome = vec![0; GENOME_LENGTH];
        flip_bits(&mut genome, 0.5, rng);
        Self::from_bits(genome)
    }

    /// Any nonzero gene counts as 1; missing genes are 0.
    pub fn from_bits(bits: Vec<u8>) -> Self {
        let mut genome: Vec<u8> = bits.into_iter().map(|b| u8::from(b != 0)).collect();
        genome.resize(GENOME_LENGTH, 0);
        Self {
            state: IndividualState::new(),
            genome,
            field: FieldCache::default(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> bool {
        self.genome
            .get(row * GRID_SIZE + col)
            .map_or(false, |bit| *bit == 1)
    }

    pub fn ones(&self) -> usize {
        self.genome.iter().filter(|bit| **bit == 1).count()
    }
}

impl Individual for BinaryPatternIndividual {
    type Genome = Vec<u8>;
    /// Grid rows, top to bottom.
    type Phenotype = Vec<Vec<bool>>;

    fn state(&self) -> &IndividualState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut IndividualState {
        &mut self.state
    }

    fn genome(&self) -> &Vec<u8> {
        &self.genome
    }

    fn phenotype(&self) -> Vec<Vec<bool>> {
        self.genome
            .chunks(GRID_SIZE)
            .map(|row| row.iter().map(|bit| *bit == 1).collect())
            .collect()
    }

    fn mutate(&mut self, rate: f64, rng: &mut dyn RngCore) {
        flip_bits(&mut self.genome, rate, rng);
        self.field.clear();
    }

    fn crossover(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self) {
        let (a, b) = uniform_crossover(&self.genome, &other.genome, 2, rng);
        (Self::from_bits(a), Self::from_bits(b))
    }

    fn as_visual(&self) -> Option<&dyn Visualize> {
        Some(self)
    }
}

impl Visualize for BinaryPatternIndividual {
    fn intensity_field(&self, width: usize, height: usize) -> Vec<f64> {
        self.field.get_or_compute(width, height, || {
            let mut field = Vec::with_capacity(width * height);
            for py in 0..height {
                let row = py * GRID_SIZE / height.max(1);
                for px in 0..width {
                    let col = px * GRID_SIZE / width.max(1);
                    field.push(if self.cell(row, col) { 1.0 } else { 0.0 });
                }
            }
            field
        })
    }

    fn genome_key(&self) -> String {
        self.genome.iter().map(|bit| bit.to_string()).collect()
    }
}
