use super::field::{planar_field, FieldCache};
use super::grammatical::{ExpressionSpec, Grammatical};
use super::traits::{Individual, Visualize};
use crate::engines::generation::ByteGenome;
use crate::types::IndividualState;
use rand::RngCore;
use std::sync::Arc;

/// Grammatical-evolution individual whose phenotype is a planar `f(x, y)`.
#[derive(Debug, Clone)]
pub struct PatternIndividual {
    core: Grammatical,
    field: FieldCache,
}

impl PatternIndividual {
    pub fn random(spec: Arc<ExpressionSpec>, rng: &mut dyn RngCore) -> Self {
        Self::wrap(Grammatical::random(spec, rng))
    }

    pub fn from_genome(spec: Arc<ExpressionSpec>, genome: ByteGenome) -> Self {
        Self::wrap(Grammatical::from_genome(spec, genome))
    }

    fn wrap(core: Grammatical) -> Self {
        Self {
            core,
            field: FieldCache::default(),
        }
    }

    pub fn expression(&self) -> &str {
        self.core.expression()
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.core.compiled().eval_xy(x, y)
    }

    pub fn has_cached_field(&self) -> bool {
        !self.field.is_empty()
    }
}

impl Individual for PatternIndividual {
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
        self.field.clear();
    }

    fn crossover(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self) {
        let (a, b) = self.core.offspring(&other.core, rng);
        (Self::wrap(a), Self::wrap(b))
    }

    fn as_visual(&self) -> Option<&dyn Visualize> {
        Some(self)
    }
}

impl Visualize for PatternIndividual {
    fn intensity_field(&self, width: usize, height: usize) -> Vec<f64> {
        self.field.get_or_compute(width, height, || {
            planar_field(width, height, |x, y| self.evaluate(x, y))
        })
    }

    fn genome_key(&self) -> String {
        self.core.genome_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrammarConfig;
    use crate::types::PresentationSettings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec() -> Arc<ExpressionSpec> {
        Arc::new(ExpressionSpec::pattern(GrammarConfig::pattern()))
    }

    #[test]
    fn test_phenotype_is_pure() {
        let mut rng = StdRng::seed_from_u64(11);
        let individual = PatternIndividual::random(spec(), &mut rng);
        assert_eq!(individual.phenotype(), individual.phenotype());

        let twin = PatternIndividual::from_genome(spec(), individual.genome().clone());
        assert_eq!(twin.phenotype(), individual.phenotype());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = StdRng::seed_from_u64(12);
        let original = PatternIndividual::random(spec(), &mut rng);
        let before = original.genome().clone();

        let mut copy = original.clone();
        assert_eq!(copy.id(), original.id());
        copy.mutate(1.0, &mut rng);
        copy.state_mut().fitness = 4;

        assert_eq!(original.genome(), &before);
        assert_eq!(original.fitness(), 0);
    }

    #[test]
    fn test_mutation_clears_field_cache() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut individual = PatternIndividual::random(spec(), &mut rng);
        let field = individual.intensity_field(8, 8);
        assert_eq!(field.len(), 64);
        assert!(individual.has_cached_field());

        individual.mutate(0.5, &mut rng);
        assert!(!individual.has_cached_field());
    }

    #[test]
    fn test_field_stays_in_unit_range() {
        let individual = PatternIndividual::from_genome(spec(), vec![1, 3, 2, 0, 4, 1, 0, 0]);
        let field = individual.intensity_field(16, 16);
        assert!(field.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_evaluates_derived_expression() {
        // <pattern> -> <expr> -> <var> -> x
        let individual = PatternIndividual::from_genome(spec(), vec![0, 3, 0]);
        assert_eq!(individual.expression(), "x");
        assert_eq!(individual.evaluate(0.3, 0.7), 0.3);
    }

    #[test]
    fn test_render_key_includes_palette() {
        let individual = PatternIndividual::from_genome(spec(), vec![7, 8, 9]);
        let settings = PresentationSettings {
            palette: "magma".to_string(),
        };
        assert_eq!(individual.render_key(4, 2, &settings), "7,8,9_4x2_magma");
    }

    #[test]
    fn test_crossover_resets_fitness() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut a = PatternIndividual::random(spec(), &mut rng);
        let b = PatternIndividual::random(spec(), &mut rng);
        a.state_mut().fitness = 3;
        let (c, d) = a.crossover(&b, &mut rng);
        assert_eq!(c.fitness(), 0);
        assert_eq!(d.fitness(), 0);
        assert!(c.as_visual().is_some());
    }
}
