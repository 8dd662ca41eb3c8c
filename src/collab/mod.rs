//! External Collaborator Facade
//!
//! Everything the pipeline needs from the outside world, behind one trait.
//! Every method applies its own timeout and returns a sentinel value instead
//! of an error, so a stage worker never has to handle a failure.

mod dns;
mod http;
mod registrar;

pub use http::HttpCollaborators;
pub use registrar::CloudflareRegistrar;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::ai::ResponseSchema;
use crate::types::{Availability, SocialPlatform};

/// External services used by the stage workers
#[async_trait]
pub trait Collaborators: Send + Sync {
    /// Translate an English word into the language with the given code.
    /// `None` on any failure.
    async fn translate(&self, word: &str, language_code: &str) -> Option<String>;

    /// Structured LLM completion. `None` on transport or parse failure.
    async fn llm_complete(&self, prompt: &str, schema: &ResponseSchema) -> Option<Value>;

    /// Whether the domain resolves in DNS. Lookup failures count as "does not resolve".
    async fn dns_resolves(&self, domain: &str) -> bool;

    /// Authoritative registrar lookup
    async fn whois_lookup(&self, domain: &str) -> Availability;

    async fn npm_package_availability(&self, name: &str) -> Availability;

    async fn social_handle_availability(
        &self,
        platform: SocialPlatform,
        handle: &str,
    ) -> Availability;

    /// Raw search engine result page for the query
    async fn fetch_search_results_html(&self, query: &str) -> Option<String>;
}

/// Shared collaborator handle passed to every stage
pub type SharedCollaborators = Arc<dyn Collaborators>;
