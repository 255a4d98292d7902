use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::ProjectConfig;

/// Errors that can occur when loading a project config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl ProjectConfig {
    /// Loads and validates a project config from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::ParseError { source, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        tracing::info!(path = %path.display(), "Loaded project config");
        Ok(config)
    }

    /// Parses and validates a config document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ProjectConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: PathBuf::new(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Every extension starts with `.`
    /// - Header and source extension sets are disjoint
    /// - No flag entry has an empty flag
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sets = self.extension_sets();

        if let Some(bad) = sets
            .header
            .iter()
            .chain(sets.source.iter())
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(ConfigError::ValidationError {
                message: format!("Extension '{}' must start with '.'", bad),
            });
        }

        let headers: HashSet<&str> = sets.header.iter().map(String::as_str).collect();
        if let Some(shared) = sets.source.iter().find(|ext| headers.contains(ext.as_str())) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Extension '{}' is listed as both header and source",
                    shared
                ),
            });
        }

        if self.has_empty_flag_entry() {
            return Err(ConfigError::ValidationError {
                message: "Flag entries must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
