//! Configuration management for the cover letter generator

use crate::error::{CoverLetterError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    pub endpoint: String,
    pub default_temperature: f32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub directory: PathBuf,
    pub color_output: bool,
    pub save_artifact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                model: "gemini-2.5-pro".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                default_temperature: 0.7,
                api_key_env: "GOOGLE_API_KEY".to_string(),
                api_key: None,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                directory: PathBuf::from("."),
                color_output: true,
                save_artifact: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| CoverLetterError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CoverLetterError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cover-letter")
            .join("config.toml")
    }

    /// Resolve the API key: environment (after `.env`) first, then the config file.
    pub fn api_key(&self) -> Result<String> {
        dotenvy::dotenv().ok();
        self.api_key_with(|name| std::env::var(name).ok())
    }

    fn api_key_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &String| !key.trim().is_empty();
        lookup(&self.generation.api_key_env)
            .filter(present)
            .or_else(|| self.generation.api_key.clone().filter(present))
            .ok_or_else(|| CoverLetterError::MissingCredential(self.generation.api_key_env.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.generation.api_key_env, "GOOGLE_API_KEY");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.generation.model, config.generation.model);
        assert_eq!(reloaded.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "generation = 42").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoverLetterError::Configuration(_)));
    }

    #[test]
    fn test_api_key_prefers_environment() {
        let mut config = Config::default();
        config.generation.api_key = Some("from-file".to_string());

        let key = config.api_key_with(|_| Some("from-env".to_string())).unwrap();
        assert_eq!(key, "from-env");

        let key = config.api_key_with(|_| None).unwrap();
        assert_eq!(key, "from-file");
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::default();
        let err = config.api_key_with(|_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, CoverLetterError::MissingCredential(ref var) if var == "GOOGLE_API_KEY"));
    }
}
