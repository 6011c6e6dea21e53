use super::traits::{check_unit_interval, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvoartError;
use serde::{Deserialize, Serialize};

/// Settings for GP tree individuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub max_depth: usize,
    /// Chance of stopping early with a terminal while growing.
    pub terminal_probability: f64,
    pub constant_count: usize,
    /// Random constants are drawn from `[-constant_range, constant_range)`.
    pub constant_range: f64,
    /// Replacement subtrees during mutation have depth `1..=mutation_max_depth`.
    pub mutation_max_depth: usize,
    pub binary_weight: f64,
    pub unary_weight: f64,
    pub ternary_weight: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            terminal_probability: 0.3,
            constant_count: 10,
            constant_range: 2.0,
            mutation_max_depth: 3,
            binary_weight: 0.6,
            unary_weight: 0.3,
            ternary_weight: 0.1,
        }
    }
}

impl ConfigSection for TreeConfig {
    fn section_name() -> &'static str {
        "tree"
    }

    fn validate(&self) -> Result<(), EvoartError> {
        if self.max_depth == 0 || self.mutation_max_depth == 0 {
            return Err(EvoartError::Configuration(
                "Tree depths must be at least 1".to_string(),
            ));
        }
        check_unit_interval("Terminal probability", self.terminal_probability)?;
        let weights = [self.binary_weight, self.unary_weight, self.ternary_weight];
        if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
            return Err(EvoartError::Configuration(
                "Operator weights must be non-negative with a positive sum".to_string(),
            ));
        }
        if self.constant_range < 0.0 {
            return Err(EvoartError::Configuration(
                "Constant range must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Tree".to_string(),
            fields: vec![
                FieldManifest::new(
                    "max_depth",
                    "integer",
                    serde_json::json!(6),
                    Some((1.0, 16.0)),
                    "Depth budget for initial trees",
                ),
                FieldManifest::new(
                    "terminal_probability",
                    "float",
                    serde_json::json!(0.3),
                    Some((0.0, 1.0)),
                    "Early termination chance in grow mode",
                ),
            ],
        }
    }
}
