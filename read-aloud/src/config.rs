//! read-aloud configuration: voice selection and chunking limits.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{Result, SpeechError};
use crate::text::DEFAULT_MAX_CHUNK_BYTES;

const DEFAULT_LANGUAGE: &str = "zh-CN";
const DEFAULT_VOICE: &str = "standard-female";
const DEFAULT_CONCURRENCY: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Synthesis service endpoint. None means not configured.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// BCP 47 language tag sent with every synthesis request.
    #[serde(default = "default_language")]
    pub language: String,

    /// Voice identifier understood by the synthesis service.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Maximum chunk size in UTF-8 bytes.
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: usize,

    /// Maximum number of in-flight synthesis requests.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_max_chunk_bytes() -> usize {
    DEFAULT_MAX_CHUNK_BYTES
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            language: default_language(),
            voice: default_voice(),
            max_chunk_bytes: default_max_chunk_bytes(),
            concurrency: default_concurrency(),
        }
    }
}

impl SpeechConfig {
    /// Get the config file path: ~/.config/read-aloud/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| SpeechError::Config("HOME is not set".to_string()))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("read-aloud")
            .join("config.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: SpeechConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpeechConfig::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.voice, "standard-female");
        assert_eq!(config.max_chunk_bytes, 800);
        assert_eq!(config.concurrency, 3);
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
endpoint = "https://tts.example.com/synthesize"
language = "en-US"
voice = "narrator"
max_chunk_bytes = 600
concurrency = 2
"#;
        let config: SpeechConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.endpoint,
            Some("https://tts.example.com/synthesize".to_string())
        );
        assert_eq!(config.language, "en-US");
        assert_eq!(config.voice, "narrator");
        assert_eq!(config.max_chunk_bytes, 600);
        assert_eq!(config.concurrency, 2);
    }

    #[test]
    fn test_parse_empty_config() {
        let toml_str = "";
        let config: SpeechConfig = toml::from_str(toml_str).unwrap();
        assert!(config.endpoint.is_none());
        assert_eq!(config.max_chunk_bytes, 800);
        assert_eq!(config.concurrency, 3);
    }
}
