use super::{
    evolution::EvolutionConfig, grammar::GrammarConfig, traits::ConfigSection, tree::TreeConfig,
};
use crate::error::EvoartError;
use crate::types::PresentationSettings;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Which individual representation a session evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Pattern,
    Radius,
    Tree,
    Binary,
    SuperFormula,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub variant: VariantKind,
    pub evolution: EvolutionConfig,
    pub pattern: GrammarConfig,
    #[serde(default = "GrammarConfig::radius")]
    pub radius: GrammarConfig,
    pub tree: TreeConfig,
    pub presentation: PresentationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            variant: VariantKind::Pattern,
            evolution: EvolutionConfig::default(),
            pattern: GrammarConfig::pattern(),
            radius: GrammarConfig::radius(),
            tree: TreeConfig::default(),
            presentation: PresentationSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvoartError> {
        self.evolution.validate()?;
        self.pattern.validate()?;
        self.radius.validate()?;
        self.tree.validate()?;
        Ok(())
    }

    /// Parse a TOML document, apply `EVOART_*` environment overrides and validate.
    pub fn from_toml_str(contents: &str) -> Result<Self, EvoartError> {
        let settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .add_source(env_overrides())
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// `EVOART_EVOLUTION__POPULATION_SIZE=24` overrides `evolution.population_size`.
fn env_overrides() -> Environment {
    Environment::with_prefix("EVOART")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoartError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .add_source(env_overrides())
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        log::info!("Loaded configuration from {}", path.as_ref().display());
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoartError> {
        let toml_str = {
            let config = self.config.read().unwrap_or_else(|e| e.into_inner());
            toml::to_string_pretty(&*config)?
        };
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Apply `f` to a copy and commit it only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), EvoartError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
