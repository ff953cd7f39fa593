use thiserror::Error;

#[derive(Debug, Error)]
pub enum TherascoreError {
    /// Missing cutoff, invalid parameter, or an empty cutoff table.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input tables that violate the scoring preconditions.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TherascoreError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, TherascoreError::Configuration(_))
    }

    pub fn is_data_integrity(&self) -> bool {
        matches!(self, TherascoreError::DataIntegrity(_))
    }
}

pub type Result<T> = std::result::Result<T, TherascoreError>;
