use std::path::PathBuf;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON snapshot with participants, activities and tracks.
    pub data_path: PathBuf,
    /// Whose programme to show.
    pub username: String,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_path = lookup("PROGRAMMA_DATA").unwrap_or_else(|| "./programma.json".into());
        let username = lookup("PROGRAMMA_USER")
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::Missing("PROGRAMMA_USER"))?;
        let metrics_port = lookup("PROGRAMMA_METRICS_PORT").and_then(|s| s.parse().ok());
        Ok(Self {
            data_path: PathBuf::from(data_path),
            username,
            metrics_port,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {}
