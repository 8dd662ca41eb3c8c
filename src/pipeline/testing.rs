//! Scripted collaborators for pipeline tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::ai::ResponseSchema;
use crate::collab::{Collaborators, SharedCollaborators};
use crate::types::{Availability, SearchEvaluation, SocialPlatform};

/// Answers from fixed tables and records every call
#[derive(Default)]
pub struct MockCollaborators {
    translations: HashMap<(String, String), String>,
    llm_lists: HashMap<(&'static str, String), Vec<String>>,
    ratings: HashMap<String, f64>,
    search: HashMap<String, SearchEvaluation>,
    resolving: HashSet<String>,
    whois: HashMap<String, Availability>,
    calls: Mutex<Vec<String>>,
    call_count: AtomicU32,
}

impl MockCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, word: &str, code: &str, text: &str) -> Self {
        self.translations
            .insert((word.to_string(), code.to_string()), text.to_string());
        self
    }

    pub fn with_webified(mut self, word: &str, variants: &[&str]) -> Self {
        self.llm_lists.insert(
            ("webified", word.to_string()),
            variants.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_synonyms(mut self, word: &str, synonyms: &[&str]) -> Self {
        self.llm_lists.insert(
            ("synonyms", word.to_string()),
            synonyms.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_rating(mut self, word: &str, rating: f64) -> Self {
        self.ratings.insert(word.to_string(), rating);
        self
    }

    pub fn with_search(mut self, word: &str, evaluation: SearchEvaluation) -> Self {
        self.search.insert(word.to_string(), evaluation);
        self
    }

    pub fn resolving(mut self, domain: &str) -> Self {
        self.resolving.insert(domain.to_string());
        self
    }

    pub fn with_whois(mut self, domain: &str, availability: Availability) -> Self {
        self.whois.insert(domain.to_string(), availability);
        self
    }

    pub fn shared(self) -> (Arc<Self>, SharedCollaborators) {
        let mock = Arc::new(self);
        let shared: SharedCollaborators = mock.clone();
        (mock, shared)
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Recorded calls starting with `prefix`, e.g. `"whois:"`
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(call);
    }
}

/// The word a stage prompt is about (`word: <w>` line)
fn prompt_word(prompt: &str) -> String {
    prompt
        .split("word: ")
        .nth(1)
        .unwrap_or_default()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect()
}

#[async_trait]
impl Collaborators for MockCollaborators {
    async fn translate(&self, word: &str, language_code: &str) -> Option<String> {
        self.record(format!("translate:{}:{}", word, language_code));
        self.translations
            .get(&(word.to_string(), language_code.to_string()))
            .cloned()
    }

    async fn llm_complete(&self, prompt: &str, schema: &ResponseSchema) -> Option<Value> {
        let word = prompt_word(prompt);
        self.record(format!("llm:{}:{}", schema.name, word));
        match schema.name {
            "rating" => self.ratings.get(&word).map(|r| json!({ "rating": r })),
            "search_evaluation" => self
                .search
                .get(&word)
                .map(|e| json!({ "isAvailable": e.is_available, "confidence": e.confidence })),
            name => self.llm_lists.get(&(name, word)).map(|list| json!(list)),
        }
    }

    async fn dns_resolves(&self, domain: &str) -> bool {
        self.record(format!("dns:{}", domain));
        self.resolving.contains(domain)
    }

    async fn whois_lookup(&self, domain: &str) -> Availability {
        self.record(format!("whois:{}", domain));
        self.whois
            .get(domain)
            .copied()
            .unwrap_or(Availability::Unknown)
    }

    async fn npm_package_availability(&self, name: &str) -> Availability {
        self.record(format!("npm:{}", name));
        Availability::Available
    }

    async fn social_handle_availability(
        &self,
        platform: SocialPlatform,
        handle: &str,
    ) -> Availability {
        self.record(format!("social:{}:{}", platform, handle));
        match platform {
            SocialPlatform::Twitter => Availability::Unavailable,
            _ => Availability::Available,
        }
    }

    async fn fetch_search_results_html(&self, query: &str) -> Option<String> {
        self.record(format!("search_html:{}", query));
        Some(format!("<html><body>No results for {}</body></html>", query))
    }
}
