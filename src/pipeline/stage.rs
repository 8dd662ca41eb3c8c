//! Stage Abstraction
//!
//! A stage is one enrichment step: it owns a queue, a cache mapping and a
//! polling interval. [`Stage`] captures what differs between stages (key
//! derivation, the external fetch and fan-out); the shared cache-or-fetch
//! loop lives in [`super::worker::StageWorker`].

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;

use super::cache::CacheSlot;
use super::queue::{Queues, StageQueue};
use crate::constants::intervals;
use crate::types::Word;

/// The eight pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Translation,
    Synonyms,
    Webification,
    Whois,
    Search,
    Rating,
    Npm,
    Social,
}

impl StageKind {
    pub const ALL: [StageKind; 8] = [
        StageKind::Translation,
        StageKind::Synonyms,
        StageKind::Webification,
        StageKind::Whois,
        StageKind::Search,
        StageKind::Rating,
        StageKind::Npm,
        StageKind::Social,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Synonyms => "synonyms",
            Self::Webification => "webification",
            Self::Whois => "whois",
            Self::Search => "search",
            Self::Rating => "rating",
            Self::Npm => "npm",
            Self::Social => "social",
        }
    }

    /// Delay between two items taken by this stage
    pub fn interval(self) -> Duration {
        let ms = match self {
            Self::Translation => intervals::TRANSLATION_MS,
            Self::Synonyms => intervals::SYNONYMS_MS,
            Self::Webification => intervals::WEBIFICATION_MS,
            Self::Whois => intervals::WHOIS_MS,
            Self::Search => intervals::SEARCH_MS,
            Self::Rating => intervals::RATING_MS,
            Self::Npm => intervals::NPM_MS,
            Self::Social => intervals::SOCIAL_MS,
        };
        Duration::from_millis(ms)
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cached value type of a stage
pub type StageValue<S> = <<S as Stage>::Slot as CacheSlot>::Value;

/// One enrichment step
#[async_trait]
pub trait Stage: Send + Sync + 'static {
    /// What sits in this stage's queue
    type Item: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Cache mapping the results are stored in
    type Slot: CacheSlot;

    fn kind(&self) -> StageKind;

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Self::Item>;

    /// Cache key for an item. `None` drops the item without caching or routing.
    fn cache_key(&self, item: &Self::Item) -> Option<Word>;

    /// Produce the value for a cache miss. Never fails; failures come back
    /// as the stage's negative value.
    async fn fetch(&self, item: &Self::Item, key: &Word) -> StageValue<Self>;

    /// Enqueue follow-up work. Returns how many items were newly queued.
    fn route(
        &self,
        item: &Self::Item,
        key: &Word,
        value: &StageValue<Self>,
        queues: &Queues,
    ) -> usize;
}
