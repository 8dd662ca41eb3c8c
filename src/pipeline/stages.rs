//! The eight concrete stages
//!
//! | Stage        | Fan-out                                                  |
//! |--------------|----------------------------------------------------------|
//! | translation  | webification (each record), whois (each cleaned text)    |
//! | synonyms     | whois (each synonym), webification (English record)      |
//! | webification | whois (the word and each variant)                        |
//! | whois        | search, rating, npm, social when Available               |
//! | others       | none                                                     |

use async_trait::async_trait;
use futures::{StreamExt, stream};
use tracing::debug;

use super::cache::{
    NpmSlot, RatingSlot, SearchSlot, SocialSlot, SynonymsSlot, TranslationSlot, WebifiedSlot,
    WhoisSlot,
};
use super::prompts;
use super::queue::{Queues, StageQueue};
use super::stage::{Stage, StageKind};
use crate::collab::SharedCollaborators;
use crate::constants::pipeline::{SEARCH_HTML_LIMIT, TRANSLATION_CONCURRENCY};
use crate::types::{
    Availability, RATING_FAILED, Rating, SearchEvaluation, SocialAvailability, SocialPlatform,
    Translation, WebifiedEntry, Word, language,
};

/// Queue the word for every check that only makes sense on a free domain
fn route_available(key: &Word, queues: &Queues) -> usize {
    [&queues.search, &queues.rating, &queues.npm, &queues.social]
        .into_iter()
        .filter(|queue| queue.add(key.clone()))
        .count()
}

// =============================================================================
// Translation
// =============================================================================

/// Base word -> one record per catalog language
pub struct TranslationStage {
    collab: SharedCollaborators,
}

impl TranslationStage {
    pub fn new(collab: SharedCollaborators) -> Self {
        Self { collab }
    }
}

#[async_trait]
impl Stage for TranslationStage {
    type Item = Word;
    type Slot = TranslationSlot;

    fn kind(&self) -> StageKind {
        StageKind::Translation
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Word> {
        &queues.translation
    }

    fn cache_key(&self, item: &Word) -> Option<Word> {
        Some(item.clone())
    }

    async fn fetch(&self, _item: &Word, key: &Word) -> Vec<Translation> {
        let collab = &self.collab;
        let results: Vec<Option<Translation>> = stream::iter(language::catalog())
            .map(|lang| async move {
                let raw = collab.translate(key.as_str(), &lang.code).await?;
                let translation = Translation::new(key, lang, raw);
                (!translation.translation.cleaned.is_empty()).then_some(translation)
            })
            .buffered(TRANSLATION_CONCURRENCY)
            .collect()
            .await;

        let translations: Vec<Translation> = results.into_iter().flatten().collect();
        debug!(
            "Translated {} into {}/{} languages",
            key,
            translations.len(),
            language::catalog_len()
        );
        translations
    }

    fn route(&self, _item: &Word, _key: &Word, value: &Vec<Translation>, queues: &Queues) -> usize {
        let mut routed = 0;
        for translation in value {
            if queues.webification.add(translation.clone()) {
                routed += 1;
            }
            if let Some(word) = translation.cleaned_word()
                && queues.whois.add(word)
            {
                routed += 1;
            }
        }
        routed
    }
}

// =============================================================================
// Synonyms
// =============================================================================

/// Base word -> LLM synonyms
pub struct SynonymsStage {
    collab: SharedCollaborators,
}

impl SynonymsStage {
    pub fn new(collab: SharedCollaborators) -> Self {
        Self { collab }
    }
}

#[async_trait]
impl Stage for SynonymsStage {
    type Item = Word;
    type Slot = SynonymsSlot;

    fn kind(&self) -> StageKind {
        StageKind::Synonyms
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Word> {
        &queues.synonyms
    }

    fn cache_key(&self, item: &Word) -> Option<Word> {
        Some(item.clone())
    }

    async fn fetch(&self, _item: &Word, key: &Word) -> Vec<String> {
        let schema = prompts::string_list_schema("synonyms");
        match self
            .collab
            .llm_complete(&prompts::synonyms_prompt(key.as_str()), &schema)
            .await
        {
            Some(value) => prompts::parse_word_list(&value),
            None => Vec::new(),
        }
    }

    fn route(&self, _item: &Word, _key: &Word, value: &Vec<String>, queues: &Queues) -> usize {
        let mut routed = 0;
        for synonym in value.iter().filter_map(|s| Word::clean(s)) {
            if queues.webification.add(Translation::english(&synonym)) {
                routed += 1;
            }
            if queues.whois.add(synonym) {
                routed += 1;
            }
        }
        routed
    }
}

// =============================================================================
// Webification
// =============================================================================

/// Translated word -> vowel-dropped variants
pub struct WebificationStage {
    collab: SharedCollaborators,
}

impl WebificationStage {
    pub fn new(collab: SharedCollaborators) -> Self {
        Self { collab }
    }
}

#[async_trait]
impl Stage for WebificationStage {
    type Item = Translation;
    type Slot = WebifiedSlot;

    fn kind(&self) -> StageKind {
        StageKind::Webification
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Translation> {
        &queues.webification
    }

    fn cache_key(&self, item: &Translation) -> Option<Word> {
        item.cleaned_word()
    }

    async fn fetch(&self, item: &Translation, key: &Word) -> WebifiedEntry {
        let schema = prompts::string_list_schema("webified");
        let webified_words = match self
            .collab
            .llm_complete(&prompts::webify_prompt(key.as_str()), &schema)
            .await
        {
            Some(value) => prompts::parse_word_list(&value),
            None => Vec::new(),
        };

        WebifiedEntry {
            translation: item.clone(),
            webified_words,
        }
    }

    fn route(
        &self,
        _item: &Translation,
        key: &Word,
        value: &WebifiedEntry,
        queues: &Queues,
    ) -> usize {
        let mut routed = usize::from(queues.whois.add(key.clone()));
        for variant in value.webified_words.iter().filter_map(|w| Word::clean(w)) {
            if queues.whois.add(variant) {
                routed += 1;
            }
        }
        routed
    }
}

// =============================================================================
// WHOIS
// =============================================================================

/// `<word>.com` availability: DNS first, registrar lookup when it does not resolve
pub struct WhoisStage {
    collab: SharedCollaborators,
    min_length: usize,
    max_length: usize,
}

impl WhoisStage {
    pub fn new(collab: SharedCollaborators, min_length: usize, max_length: usize) -> Self {
        Self {
            collab,
            min_length,
            max_length,
        }
    }
}

#[async_trait]
impl Stage for WhoisStage {
    type Item = Word;
    type Slot = WhoisSlot;

    fn kind(&self) -> StageKind {
        StageKind::Whois
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Word> {
        &queues.whois
    }

    fn cache_key(&self, item: &Word) -> Option<Word> {
        (self.min_length..=self.max_length)
            .contains(&item.len())
            .then(|| item.clone())
    }

    async fn fetch(&self, _item: &Word, key: &Word) -> Availability {
        let domain = key.domain();
        if self.collab.dns_resolves(&domain).await {
            debug!("{} resolves, skipping registrar lookup", domain);
            return Availability::Unavailable;
        }
        self.collab.whois_lookup(&domain).await
    }

    fn route(&self, _item: &Word, key: &Word, value: &Availability, queues: &Queues) -> usize {
        if value.is_available() {
            route_available(key, queues)
        } else {
            0
        }
    }
}

// =============================================================================
// Terminal stages
// =============================================================================

/// Search engine results judged by the LLM
pub struct SearchStage {
    collab: SharedCollaborators,
}

impl SearchStage {
    pub fn new(collab: SharedCollaborators) -> Self {
        Self { collab }
    }
}

#[async_trait]
impl Stage for SearchStage {
    type Item = Word;
    type Slot = SearchSlot;

    fn kind(&self) -> StageKind {
        StageKind::Search
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Word> {
        &queues.search
    }

    fn cache_key(&self, item: &Word) -> Option<Word> {
        Some(item.clone())
    }

    async fn fetch(&self, _item: &Word, key: &Word) -> SearchEvaluation {
        let Some(html) = self.collab.fetch_search_results_html(key.as_str()).await else {
            return SearchEvaluation::failed();
        };
        let prompt = prompts::search_prompt(key.as_str(), &html, SEARCH_HTML_LIMIT);
        match self.collab.llm_complete(&prompt, &prompts::search_schema()).await {
            Some(value) => prompts::parse_search_evaluation(&value),
            None => SearchEvaluation::failed(),
        }
    }

    fn route(&self, _: &Word, _: &Word, _: &SearchEvaluation, _: &Queues) -> usize {
        0
    }
}

/// LLM pronounceability/spellability score
pub struct RatingStage {
    collab: SharedCollaborators,
}

impl RatingStage {
    pub fn new(collab: SharedCollaborators) -> Self {
        Self { collab }
    }
}

#[async_trait]
impl Stage for RatingStage {
    type Item = Word;
    type Slot = RatingSlot;

    fn kind(&self) -> StageKind {
        StageKind::Rating
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Word> {
        &queues.rating
    }

    fn cache_key(&self, item: &Word) -> Option<Word> {
        Some(item.clone())
    }

    async fn fetch(&self, _item: &Word, key: &Word) -> Rating {
        let prompt = prompts::rating_prompt(key.as_str());
        match self.collab.llm_complete(&prompt, &prompts::rating_schema()).await {
            Some(value) => prompts::parse_rating(&value),
            None => RATING_FAILED,
        }
    }

    fn route(&self, _: &Word, _: &Word, _: &Rating, _: &Queues) -> usize {
        0
    }
}

/// npm package name availability
pub struct NpmStage {
    collab: SharedCollaborators,
}

impl NpmStage {
    pub fn new(collab: SharedCollaborators) -> Self {
        Self { collab }
    }
}

#[async_trait]
impl Stage for NpmStage {
    type Item = Word;
    type Slot = NpmSlot;

    fn kind(&self) -> StageKind {
        StageKind::Npm
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Word> {
        &queues.npm
    }

    fn cache_key(&self, item: &Word) -> Option<Word> {
        Some(item.clone())
    }

    async fn fetch(&self, _item: &Word, key: &Word) -> Availability {
        self.collab.npm_package_availability(key.as_str()).await
    }

    fn route(&self, _: &Word, _: &Word, _: &Availability, _: &Queues) -> usize {
        0
    }
}

/// Handle availability on every supported platform
pub struct SocialStage {
    collab: SharedCollaborators,
}

impl SocialStage {
    pub fn new(collab: SharedCollaborators) -> Self {
        Self { collab }
    }
}

/// Probe every platform for `handle`, one at a time
pub async fn check_social_handles(
    collab: &SharedCollaborators,
    handle: &str,
) -> SocialAvailability {
    let mut results = SocialAvailability::new();
    for platform in SocialPlatform::ALL {
        let availability = collab.social_handle_availability(platform, handle).await;
        results.insert(platform.name().to_string(), availability);
    }
    results
}

#[async_trait]
impl Stage for SocialStage {
    type Item = Word;
    type Slot = SocialSlot;

    fn kind(&self) -> StageKind {
        StageKind::Social
    }

    fn queue<'q>(&self, queues: &'q Queues) -> &'q StageQueue<Word> {
        &queues.social
    }

    fn cache_key(&self, item: &Word) -> Option<Word> {
        Some(item.clone())
    }

    async fn fetch(&self, _item: &Word, key: &Word) -> SocialAvailability {
        check_social_handles(&self.collab, key.as_str()).await
    }

    fn route(&self, _: &Word, _: &Word, _: &SocialAvailability, _: &Queues) -> usize {
        0
    }
}
