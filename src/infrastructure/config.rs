//! Configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("corpus_dir cannot be empty")]
    EmptyCorpusDir,

    #[error("index dir cannot be empty")]
    EmptyIndexDir,

    #[error("Invalid chunking config: {0}")]
    InvalidChunking(String),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid embedding_dimension: {0}. Must be at least 1")]
    InvalidEmbeddingDimension(usize),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. contract-intel.yaml (project config)
    /// 3. Environment variables (CONTRACT_INTEL_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("contract-intel.yaml"))
            .merge(Env::prefixed("CONTRACT_INTEL_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.corpus_dir.is_empty() {
            return Err(ConfigError::EmptyCorpusDir);
        }

        if config.index.dir.is_empty() {
            return Err(ConfigError::EmptyIndexDir);
        }

        config
            .chunking
            .validate()
            .map_err(ConfigError::InvalidChunking)?;

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        if config.provider.embedding_dimension == 0 {
            return Err(ConfigError::InvalidEmbeddingDimension(
                config.provider.embedding_dimension,
            ));
        }

        if !(0.0..=2.0).contains(&config.provider.temperature) {
            return Err(ConfigError::InvalidTemperature(config.provider.temperature));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.retry.max_retries > 0
            && config.retry.initial_backoff_ms >= config.retry.max_backoff_ms
        {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        Ok(())
    }
}

/// Build the tracing filter for the subscriber: `RUST_LOG` takes
/// precedence, otherwise the configured `logging.level` applies.
pub fn log_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::LoggingConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_invalid_chunking_rejected() {
        let mut config = Config::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidChunking(_))
        ));
    }

    #[test]
    fn test_invalid_top_k_rejected() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_invalid_backoff_rejected() {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 60_000;
        config.retry.max_backoff_ms = 30_000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(60_000, 30_000))
        ));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "corpus_dir: contracts\nretrieval:\n  top_k: 8\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.corpus_dir, "contracts");
        assert_eq!(config.retrieval.top_k, 8);
        // Untouched sections keep defaults
        assert_eq!(config.chunking.chunk_size, 500);
    }

    #[test]
    fn test_log_filter_falls_back_to_configured_level() {
        std::env::remove_var("RUST_LOG");
        let config = Config {
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
            ..Config::default()
        };

        assert_eq!(log_filter(&config).to_string(), "debug");
    }
}
