//! DomainTerm - Domain Name Discovery Pipeline
//!
//! Expands a list of base words into candidate brand names (translations
//! into 113 languages, LLM synonyms and vowel-dropped "web" variants), checks
//! `<name>.com` availability, and enriches every available name with an LLM
//! rating, a search-result judgement, npm and social handle availability.
//!
//! ## Core Features
//!
//! - **Multi-Stage Pipeline**: eight deduplicating stage queues drained by
//!   independent workers at fixed intervals
//! - **Persistent Cache**: every result stored once in one JSON document,
//!   rewritten atomically, so restarts never repeat work
//! - **Negative Caching**: failed lookups are stored as negative results
//! - **OpenAI-Compatible LLM**: structured JSON responses with tolerant parsing
//!
//! ## Quick Start
//!
//! ```ignore
//! use domainterm::{CacheStore, ConfigLoader, Pipeline, PipelineSettings};
//! use domainterm::cli::CommandContext;
//!
//! let ctx = CommandContext::load(None)?;
//! let collab = ctx.collaborators().await?;
//! let cache = Arc::new(ctx.open_cache().await);
//! let settings = PipelineSettings::from_config(&ctx.config.pipeline);
//! Pipeline::new(cache, collab, settings)
//!     .run(tokio::signal::ctrl_c().map(|_| ()))
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM provider abstraction, timeouts, JSON repair
//! - [`collab`]: external collaborators (translation, DNS, WHOIS, npm, social, search)
//! - [`config`]: layered configuration
//! - [`pipeline`]: queues, stages, workers, cache and reporting

pub mod ai;
pub mod cli;
pub mod collab;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, Result, TermError};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{CacheStore, Pipeline, PipelineSettings, ResultsReport, StageKind};

// =============================================================================
// Collaborator Re-exports
// =============================================================================

pub use collab::{Collaborators, HttpCollaborators, SharedCollaborators};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{LlmProvider, LlmResponse, OpenAiCompatibleProvider, TimeoutConfig, with_timeout};
