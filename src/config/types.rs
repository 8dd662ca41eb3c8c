//! Configuration Types
//!
//! All configuration structures with defaults. Secrets are never serialized
//! and are redacted in debug output.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{endpoints, network, paths, pipeline};
use crate::types::{Result, TermError};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM endpoint settings
    pub llm: LlmConfig,

    /// Registrar intelligence (WHOIS) credentials
    pub registrar: RegistrarConfig,

    /// Input/output files and word length bounds
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Check required settings and value ranges.
    ///
    /// Every missing required setting is reported at once, named by the
    /// environment variable that provides it.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if is_blank(self.llm.model.as_deref()) {
            missing.push("LLM_MODEL");
        }
        if is_blank(self.registrar.api_token.as_deref()) {
            missing.push("CLOUDFLARE_API_TOKEN");
        }
        if is_blank(self.registrar.account_id.as_deref()) {
            missing.push("CLOUDFLARE_ACCOUNT_ID");
        }
        if !missing.is_empty() {
            return Err(TermError::Config(format!(
                "Missing required settings: {}. Set them in .env or the environment.",
                missing.join(", ")
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(TermError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        self.pipeline.validate_lengths()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier (required)
    pub model: Option<String>,

    /// OpenAI-compatible API base URL
    pub base_url: String,

    /// Bearer key for the endpoint. Never serialized; providers wrap it in
    /// `SecretString` before use.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: None,
            base_url: endpoints::DEFAULT_LLM_BASE_URL.to_string(),
            api_key: endpoints::DEFAULT_LLM_API_KEY.to_string(),
            timeout_secs: network::LLM_TIMEOUT_SECS,
            temperature: 0.0,
        }
    }
}

// =============================================================================
// Registrar Configuration
// =============================================================================

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Cloudflare API token (required). Never serialized.
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    /// Cloudflare account identifier (required)
    pub account_id: Option<String>,
}

impl std::fmt::Debug for RegistrarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("account_id", &self.account_id)
            .finish()
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Line-delimited list of base words
    pub base_words_file: PathBuf,

    /// Persisted cache
    pub db_file: PathBuf,

    /// Shortest word sent to the domain check
    pub min_length: usize,

    /// Longest word sent to the domain check
    pub max_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_words_file: PathBuf::from(paths::BASE_WORDS_FILE),
            db_file: PathBuf::from(paths::DB_FILE),
            min_length: pipeline::DEFAULT_MIN_LENGTH,
            max_length: pipeline::DEFAULT_MAX_LENGTH,
        }
    }
}

impl PipelineConfig {
    pub fn validate_lengths(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(TermError::Config(
                "min_length must be at least 1".to_string(),
            ));
        }
        if self.min_length > self.max_length {
            return Err(TermError::Config(format!(
                "min_length ({}) must not exceed max_length ({})",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> Config {
        let mut config = Config::default();
        config.llm.model = Some("qwen2.5-7b-instruct".to_string());
        config.registrar.api_token = Some("token".to_string());
        config.registrar.account_id = Some("account".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.base_url, "http://127.0.0.1:1234/v1");
        assert_eq!(config.llm.api_key, "lm-studio");
        assert_eq!(config.pipeline.min_length, 3);
        assert_eq!(config.pipeline.max_length, 10);
        assert_eq!(config.pipeline.db_file, PathBuf::from("db.json"));
    }

    #[test]
    fn test_validate_reports_all_missing() {
        let err = Config::default().validate().unwrap_err().to_string();
        assert!(err.contains("LLM_MODEL"));
        assert!(err.contains("CLOUDFLARE_API_TOKEN"));
        assert!(err.contains("CLOUDFLARE_ACCOUNT_ID"));
    }

    #[test]
    fn test_validate_blank_counts_as_missing() {
        let mut config = complete_config();
        config.registrar.account_id = Some("  ".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("CLOUDFLARE_ACCOUNT_ID"));
        assert!(!err.contains("LLM_MODEL"));
    }

    #[test]
    fn test_validate_lengths() {
        let mut config = complete_config();
        assert!(config.validate().is_ok());

        config.pipeline.min_length = 8;
        config.pipeline.max_length = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = complete_config();
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("token\""));
        assert!(!debug.contains("lm-studio"));
    }
}
