//! Configuration for the feedback portal
//!
//! Sources are layered, later ones winning:
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `<config dir>/feedback-portal/config.toml`)
//! 3. `FEEDBACK_PORTAL_*` environment variables, with `__` between section
//!    and key (e.g. `FEEDBACK_PORTAL_STORAGE__DATA_DIR`)
//!
//! The generation API key additionally falls back to `ANTHROPIC_API_KEY`.

use crate::error::{PortalError, Result};
use crate::services::llm::{LlmConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::sentiment::NEUTRAL_EPSILON;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "feedback-portal";
const ENV_PREFIX: &str = "FEEDBACK_PORTAL";

/// Top-level portal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub storage: StorageConfig,
    pub sentiment: SentimentConfig,
    pub llm: LlmSettings,
}

/// Where the collections live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub feedback_file: String,
    pub suggestions_file: String,
}

/// Classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Half-width of the neutral band
    pub neutral_epsilon: f64,

    /// VADER-format lexicon file; the built-in lexicon when unset
    pub lexicon_path: Option<PathBuf>,
}

/// Generation backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,

    /// Prefer `ANTHROPIC_API_KEY` over writing keys to disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Get the default data directory using the platform data-local dir
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            feedback_file: "feedback.csv".to_string(),
            suggestions_file: "suggestions.csv".to_string(),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            neutral_epsilon: NEUTRAL_EPSILON,
            lexicon_path: None,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 256,
            api_key: None,
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            sentiment: SentimentConfig::default(),
            llm: LlmSettings::default(),
        }
    }
}

fn invalid(message: String) -> PortalError {
    PortalError::Config(config::ConfigError::Message(message))
}

impl PortalConfig {
    /// Load defaults, then the config file, then the environment
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };
        debug!("Loading configuration (file: {})", file_path.display());

        let built = Config::builder()
            .add_source(Config::try_from(&PortalConfig::default())?)
            .add_source(
                File::from(file_path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: PortalConfig = built.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string on top of the defaults
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: PortalConfig = toml::from_str(toml_str)
            .map_err(|e| invalid(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.sentiment.neutral_epsilon) {
            return Err(invalid(format!(
                "sentiment.neutral_epsilon must be in [0, 1), got {}",
                self.sentiment.neutral_epsilon
            )));
        }

        for (key, name) in [
            ("storage.feedback_file", &self.storage.feedback_file),
            ("storage.suggestions_file", &self.storage.suggestions_file),
        ] {
            if name.trim().is_empty() {
                return Err(invalid(format!("{} must not be empty", key)));
            }
        }
        if self.storage.feedback_file == self.storage.suggestions_file {
            return Err(invalid(
                "feedback and suggestions must use different files".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(invalid("llm.max_tokens must be positive".to_string()));
        }

        Ok(())
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.feedback_file)
    }

    pub fn suggestions_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.suggestions_file)
    }

    /// Generation client settings, falling back to `ANTHROPIC_API_KEY`
    pub fn llm_config(&self) -> LlmConfig {
        let api_key = self
            .llm
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env::var("ANTHROPIC_API_KEY").ok())
            .unwrap_or_default();

        LlmConfig {
            api_key,
            endpoint: self.llm.endpoint.clone(),
            model: self.llm.model.clone(),
            temperature: self.llm.temperature,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| invalid(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        crate::storage::csv_store::write_atomic(path, self.to_toml()?.as_bytes())?;
        info!("Wrote configuration to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = PortalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sentiment.neutral_epsilon, NEUTRAL_EPSILON);
        assert!(config.feedback_path().ends_with("feedback.csv"));
    }

    #[test]
    fn test_validate_epsilon_out_of_range() {
        let mut config = PortalConfig::default();
        config.sentiment.neutral_epsilon = 1.0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("neutral_epsilon must be in [0, 1)"));
    }

    #[test]
    fn test_validate_same_file_for_both_collections() {
        let mut config = PortalConfig::default();
        config.storage.suggestions_file = config.storage.feedback_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PortalConfig::from_toml(
            r#"
            [storage]
            data_dir = "/srv/portal"

            [llm]
            max_tokens = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/portal"));
        assert_eq!(config.storage.feedback_file, "feedback.csv");
        assert_eq!(config.llm.max_tokens, 64);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
    }

    #[test]
    #[serial]
    fn test_load_file_then_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\ndata_dir = \"/from/file\"\n\n[sentiment]\nneutral_epsilon = 0.1\n",
        )
        .unwrap();

        env::set_var("FEEDBACK_PORTAL_STORAGE__DATA_DIR", "/from/env");
        let config = PortalConfig::load(Some(&path));
        env::remove_var("FEEDBACK_PORTAL_STORAGE__DATA_DIR");

        let config = config.unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/from/env"));
        assert_eq!(config.sentiment.neutral_epsilon, 0.1);
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_is_error() {
        let result = PortalConfig::load(Some(Path::new("/nonexistent/portal.toml")));
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("config.toml");

        let mut config = PortalConfig::default();
        config.storage.data_dir = temp_dir.path().to_path_buf();
        config.to_file(&path).unwrap();

        let loaded = PortalConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    #[serial]
    fn test_llm_key_falls_back_to_env() {
        env::set_var("ANTHROPIC_API_KEY", "env-key");
        let from_env = PortalConfig::default().llm_config();

        let mut config = PortalConfig::default();
        config.llm.api_key = Some("file-key".to_string());
        let from_file = config.llm_config();
        env::remove_var("ANTHROPIC_API_KEY");

        assert_eq!(from_env.api_key, "env-key");
        assert_eq!(from_file.api_key, "file-key");
    }
}
