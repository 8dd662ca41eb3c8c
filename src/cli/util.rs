//! CLI Common Utilities
//!
//! Shared initialization for command handlers: configuration, the live
//! collaborator stack and the persisted cache.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::ai::{OpenAiCompatibleProvider, SharedProvider};
use crate::collab::{HttpCollaborators, SharedCollaborators};
use crate::config::{Config, ConfigLoader};
use crate::pipeline::CacheStore;
use crate::types::Result;

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
}

impl CommandContext {
    /// Load configuration. Missing required settings are fatal here.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = ConfigLoader::load(config_path)?;
        debug!(config = ?config, "Configuration loaded");
        Ok(Self { config })
    }

    fn llm_provider(&self) -> Result<SharedProvider> {
        let provider = OpenAiCompatibleProvider::new(&self.config.llm)?;
        Ok(Arc::new(provider))
    }

    /// Build the HTTP-backed collaborators around the configured LLM.
    /// An unreachable LLM endpoint is logged, not fatal.
    pub async fn collaborators(&self) -> Result<SharedCollaborators> {
        let provider = self.llm_provider()?;
        info!("Using {} model {}", provider.name(), provider.model());

        match provider.health_check().await {
            Ok(true) => debug!("LLM endpoint {} reachable", self.config.llm.base_url),
            Ok(false) | Err(_) => warn!(
                "LLM endpoint {} not reachable; LLM stages will record empty results",
                self.config.llm.base_url
            ),
        }

        Ok(Arc::new(HttpCollaborators::new(&self.config, provider)?))
    }

    /// Collaborators for commands that never call the LLM. No network
    /// traffic happens here.
    pub fn collaborators_without_llm(&self) -> Result<SharedCollaborators> {
        Ok(Arc::new(HttpCollaborators::new(
            &self.config,
            self.llm_provider()?,
        )?))
    }

    /// Load the persisted cache (empty when absent)
    pub async fn open_cache(&self) -> CacheStore {
        CacheStore::load(&self.config.pipeline.db_file).await
    }
}
