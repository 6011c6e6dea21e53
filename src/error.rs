use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoartError {
    #[error("At least {required} individuals must be selected to evolve, got {actual}")]
    InsufficientSelection { required: usize, actual: usize },

    #[error("Generation {index} not in history ({available} recorded)")]
    GenerationOutOfRange { index: usize, available: usize },

    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config loader error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, EvoartError>;
