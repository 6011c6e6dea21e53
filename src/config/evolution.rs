use super::traits::{check_unit_interval, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvoartError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub elite_count: usize,
    pub min_selected: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 16,
            mutation_rate: 0.1,
            tournament_size: 3,
            elite_count: 2,
            min_selected: 2,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvoartError> {
        if self.population_size < 2 {
            return Err(EvoartError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        check_unit_interval("Mutation rate", self.mutation_rate)?;
        if self.tournament_size == 0 {
            return Err(EvoartError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.elite_count > self.population_size {
            return Err(EvoartError::Configuration(format!(
                "Elite count {} exceeds population size {}",
                self.elite_count, self.population_size
            )));
        }
        if self.min_selected == 0 {
            return Err(EvoartError::Configuration(
                "At least one selected individual must be required".to_string(),
            ));
        }
        if self.min_selected > self.population_size {
            return Err(EvoartError::Configuration(format!(
                "Required selection {} exceeds population size {}",
                self.min_selected, self.population_size
            )));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    serde_json::json!(16),
                    Some((2.0, 256.0)),
                    "Number of individuals shown per generation",
                ),
                FieldManifest::new(
                    "mutation_rate",
                    "float",
                    serde_json::json!(0.1),
                    Some((0.0, 1.0)),
                    "Mutation rate applied to each child",
                ),
                FieldManifest::new(
                    "tournament_size",
                    "integer",
                    serde_json::json!(3),
                    Some((1.0, 16.0)),
                    "Candidates drawn per tournament",
                ),
                FieldManifest::new(
                    "elite_count",
                    "integer",
                    serde_json::json!(2),
                    Some((0.0, 16.0)),
                    "Selected individuals copied unchanged",
                ),
            ],
        }
    }
}
