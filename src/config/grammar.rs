use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvoartError;
use serde::{Deserialize, Serialize};

/// How two byte genomes are recombined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverKind {
    /// Each gene comes from either parent with probability 0.5.
    Uniform,
    /// Tails after a random cut point are swapped.
    SinglePoint,
}

/// Settings for grammatical-evolution individuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    pub genome_length: usize,
    /// Exclusive upper bound of a gene value.
    pub gene_max: u32,
    pub max_derivations: usize,
    pub max_depth: usize,
    pub max_expression_len: usize,
    pub fallback_expression: String,
    pub crossover: CrossoverKind,
}

impl GrammarConfig {
    /// Planar pattern defaults (x, y inputs).
    pub fn pattern() -> Self {
        Self {
            genome_length: 100,
            gene_max: 256,
            max_derivations: 1000,
            max_depth: 15,
            max_expression_len: 200,
            fallback_expression: "1.0 + 0.5 * sin(t)".to_string(),
            crossover: CrossoverKind::Uniform,
        }
    }

    /// Polar radius defaults (t input); fewer derivation steps.
    pub fn radius() -> Self {
        Self {
            max_derivations: 100,
            ..Self::pattern()
        }
    }
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self::pattern()
    }
}

impl ConfigSection for GrammarConfig {
    fn section_name() -> &'static str {
        "grammar"
    }

    fn validate(&self) -> Result<(), EvoartError> {
        if self.genome_length == 0 {
            return Err(EvoartError::Configuration(
                "Genome length must be positive".to_string(),
            ));
        }
        if self.gene_max < 2 || self.gene_max > 256 {
            return Err(EvoartError::Configuration(
                "Gene range must be within 2..=256".to_string(),
            ));
        }
        if self.max_derivations == 0 || self.max_depth == 0 {
            return Err(EvoartError::Configuration(
                "Derivation limits must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Grammar".to_string(),
            fields: vec![
                FieldManifest::new(
                    "genome_length",
                    "integer",
                    serde_json::json!(self.genome_length),
                    Some((1.0, 4096.0)),
                    "Codons per genome",
                ),
                FieldManifest::new(
                    "max_derivations",
                    "integer",
                    serde_json::json!(self.max_derivations),
                    Some((1.0, 10000.0)),
                    "Expansion steps before default substitution",
                ),
                FieldManifest::new(
                    "max_depth",
                    "integer",
                    serde_json::json!(self.max_depth),
                    Some((1.0, 64.0)),
                    "Parenthesis nesting limit",
                ),
                FieldManifest::new(
                    "max_expression_len",
                    "integer",
                    serde_json::json!(self.max_expression_len),
                    None,
                    "Longer expressions are replaced by the fallback",
                ),
            ],
        }
    }
}
