use crate::config::{CrossoverKind, GrammarConfig};
use crate::engines::expression::{CompiledExpression, ExpressionCompiler};
use crate::engines::generation::ByteGenome;
use crate::engines::generation::operators::{
    mutate, random_genome, single_point_crossover, uniform_crossover,
};
use crate::engines::grammar::{DerivationLimits, Grammar};
use crate::types::IndividualState;
use rand::RngCore;
use std::cell::OnceCell;
use std::sync::Arc;

/// Everything needed to turn a byte genome into a callable expression:
/// grammar, start symbol, derivation caps and compiler signature.
#[derive(Debug, Clone)]
pub struct ExpressionSpec {
    pub grammar: Grammar,
    pub start_symbol: String,
    pub config: GrammarConfig,
    pub compiler: ExpressionCompiler,
}

impl ExpressionSpec {
    /// Planar `f(x, y)` patterns, falling back to 0.0.
    pub fn pattern(config: GrammarConfig) -> Self {
        Self {
            grammar: Grammar::image_pattern(),
            start_symbol: "<pattern>".to_string(),
            config,
            compiler: ExpressionCompiler::planar(),
        }
    }

    /// Polar `r(t)` curves, falling back to 1.0.
    pub fn radius(config: GrammarConfig) -> Self {
        Self {
            grammar: Grammar::polar_drawing(),
            start_symbol: "<polar>".to_string(),
            config,
            compiler: ExpressionCompiler::radial(),
        }
    }

    pub fn limits(&self) -> DerivationLimits {
        DerivationLimits {
            max_derivations: self.config.max_derivations,
            max_depth: self.config.max_depth,
        }
    }

    /// Derive the expression text for `genome`.
    ///
    /// Results longer than `max_expression_len` are replaced by the configured
    /// fallback expression.
    pub fn express(&self, genome: &[u8]) -> String {
        let expression = self
            .grammar
            .derive(&self.start_symbol, genome, self.limits())
            .to_expression();

        if expression.len() > self.config.max_expression_len {
            log::warn!(
                "Derived expression is {} chars (limit {}), using fallback",
                expression.len(),
                self.config.max_expression_len
            );
            return self.config.fallback_expression.clone();
        }
        expression
    }
}

/// Byte-genome core shared by the grammatical variants.
///
/// Expression text and compiled program are derived lazily and dropped on
/// every genome change. Clones re-derive them on demand.
#[derive(Debug)]
pub struct Grammatical {
    pub(crate) state: IndividualState,
    genome: ByteGenome,
    spec: Arc<ExpressionSpec>,
    expression: OnceCell<String>,
    compiled: OnceCell<CompiledExpression>,
}

impl Clone for Grammatical {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            genome: self.genome.clone(),
            spec: Arc::clone(&self.spec),
            expression: OnceCell::new(),
            compiled: OnceCell::new(),
        }
    }
}

impl Grammatical {
    pub fn random(spec: Arc<ExpressionSpec>, rng: &mut dyn RngCore) -> Self {
        let genome = random_genome(spec.config.genome_length, spec.config.gene_max, rng);
        Self::from_genome(spec, genome)
    }

    pub fn from_genome(spec: Arc<ExpressionSpec>, genome: ByteGenome) -> Self {
        Self {
            state: IndividualState::new(),
            genome,
            spec,
            expression: OnceCell::new(),
            compiled: OnceCell::new(),
        }
    }

    pub fn genome(&self) -> &ByteGenome {
        &self.genome
    }

    pub fn spec(&self) -> &Arc<ExpressionSpec> {
        &self.spec
    }

    pub fn expression(&self) -> &str {
        self.expression.get_or_init(|| self.spec.express(&self.genome))
    }

    pub fn compiled(&self) -> &CompiledExpression {
        self.compiled
            .get_or_init(|| self.spec.compiler.compile(self.expression()))
    }

    pub fn is_expressed(&self) -> bool {
        self.expression.get().is_some()
    }

    pub fn set_genome(&mut self, genome: ByteGenome) {
        self.genome = genome;
        self.invalidate();
    }

    pub fn mutate(&mut self, rate: f64, rng: &mut dyn RngCore) {
        mutate(&mut self.genome, rate, self.spec.config.gene_max, rng);
        self.invalidate();
    }

    pub fn offspring(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self) {
        let (a, b) = match self.spec.config.crossover {
            CrossoverKind::Uniform => {
                uniform_crossover(&self.genome, &other.genome, self.spec.config.gene_max, rng)
            }
            CrossoverKind::SinglePoint => single_point_crossover(&self.genome, &other.genome, rng),
        };
        (
            Self::from_genome(Arc::clone(&self.spec), a),
            Self::from_genome(Arc::clone(&self.spec), b),
        )
    }

    pub fn genome_key(&self) -> String {
        self.genome
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn invalidate(&mut self) {
        self.expression.take();
        self.compiled.take();
    }
}
