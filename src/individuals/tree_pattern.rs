use super::field::{planar_field, FieldCache};
use super::traits::{Individual, Visualize};
use crate::config::TreeConfig;
use crate::engines::tree::{point_mutation, subtree_crossover, TerminalSet, TreeBuilder, TreeNode};
use crate::types::IndividualState;
use rand::RngCore;
use std::sync::Arc;

/// Genetic-programming individual: the genome is an expression tree over
/// `x, y, r, theta` and a private set of constants.
#[derive(Debug, Clone)]
pub struct TreePatternIndividual {
    state: IndividualState,
    genome: TreeNode,
    terminals: TerminalSet,
    config: Arc<TreeConfig>,
    field: FieldCache,
}

impl TreePatternIndividual {
    pub fn random(config: Arc<TreeConfig>, rng: &mut dyn RngCore) -> Self {
        let terminals = TerminalSet::random(&config, rng);
        let genome = TreeBuilder::new(&config, &terminals).grow(config.max_depth, rng);
        Self::from_tree(config, terminals, genome)
    }

    pub fn from_tree(config: Arc<TreeConfig>, terminals: TerminalSet, genome: TreeNode) -> Self {
        Self {
            state: IndividualState::new(),
            genome,
            terminals,
            config,
            field: FieldCache::default(),
        }
    }

    pub fn terminals(&self) -> &TerminalSet {
        &self.terminals
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.genome.evaluate(x, y)
    }

    fn child(&self, genome: TreeNode) -> Self {
        Self::from_tree(Arc::clone(&self.config), self.terminals.clone(), genome)
    }
}

impl Individual for TreePatternIndividual {
    type Genome = TreeNode;
    type Phenotype = TreeNode;

    fn state(&self) -> &IndividualState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut IndividualState {
        &mut self.state
    }

    fn genome(&self) -> &TreeNode {
        &self.genome
    }

    fn phenotype(&self) -> TreeNode {
        self.genome.clone()
    }

    fn mutate(&mut self, rate: f64, rng: &mut dyn RngCore) {
        let builder = TreeBuilder::new(&self.config, &self.terminals);
        if point_mutation(
            &mut self.genome,
            &builder,
            rate,
            self.config.mutation_max_depth,
            rng,
        ) {
            self.field.clear();
        }
    }

    /// Children keep their parent's terminal set; the swapped subtrees may
    /// carry constants from the other parent.
    fn crossover(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self) {
        let mut left = self.genome.clone();
        let mut right = other.genome.clone();
        if !subtree_crossover(&mut left, &mut right, rng) {
            log::trace!("Subtree crossover skipped, a parent is a lone root");
        }
        (self.child(left), other.child(right))
    }

    fn as_visual(&self) -> Option<&dyn Visualize> {
        Some(self)
    }
}

impl Visualize for TreePatternIndividual {
    fn intensity_field(&self, width: usize, height: usize) -> Vec<f64> {
        self.field.get_or_compute(width, height, || {
            planar_field(width, height, |x, y| self.evaluate(x, y))
        })
    }

    fn genome_key(&self) -> String {
        self.genome.to_string()
    }
}
