//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Config file (domainterm.toml)
//! 3. Environment variables (DOMAINTERM_* and the plain LLM_* / CLOUDFLARE_* names)
//! 4. CLI arguments (highest priority, applied by the command)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
