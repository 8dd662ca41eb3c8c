//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (`domainterm.toml` or `--config <path>`)
//! 3. Prefixed environment variables (`DOMAINTERM_PIPELINE__DB_FILE` -> pipeline.db_file)
//! 4. Plain environment variables (`LLM_MODEL`, `CLOUDFLARE_API_TOKEN`, ...)
//!
//! A `.env` file in the working directory is loaded into the environment first.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::types::Config;
use crate::constants::paths;
use crate::types::{Result, TermError};

/// Plain environment variable names and the config keys they set
const PLAIN_ENV_KEYS: &[(&str, &str)] = &[
    ("LLM_MODEL", "llm.model"),
    ("LLM_BASE_URL", "llm.base_url"),
    ("LLM_API_KEY", "llm.api_key"),
    ("CLOUDFLARE_API_TOKEN", "registrar.api_token"),
    ("CLOUDFLARE_ACCOUNT_ID", "registrar.account_id"),
];

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `.env`, resolve every source and validate.
    ///
    /// Fails when a required setting is missing; callers treat that as fatal.
    pub fn load(config_path: Option<&Path>) -> Result<Config> {
        Self::load_dotenv();

        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(TermError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: Config = Self::figment(config_path)
            .extract()
            .map_err(|e| TermError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Build the layered figment without touching the process environment
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);
        if path.exists() {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }

        figment
            .merge(Env::prefixed("DOMAINTERM_").split("__"))
            .merge(Self::plain_env())
    }

    /// Default config file in the working directory
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(paths::CONFIG_FILE)
    }

    fn plain_env() -> Env {
        let names: Vec<&str> = PLAIN_ENV_KEYS.iter().map(|(name, _)| *name).collect();
        Env::raw().only(&names).map(|key| {
            PLAIN_ENV_KEYS
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| *path)
                .unwrap_or_default()
                .into()
        })
    }

    fn load_dotenv() {
        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }
    }
}
