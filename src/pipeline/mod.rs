//! Discovery Pipeline
//!
//! Base words flow through eight stages that share one persistent cache:
//!
//! ```text
//! word list ─┬─> translation ──┬─> webification ──┐
//!            ├─> synonyms ─────┘                  │
//!            └────────────────────────────────────┴─> whois ─> search
//!                                                        ├──> rating
//!                                                        ├──> npm
//!                                                        └──> social
//! ```
//!
//! Every stage is a [`Stage`] driven by the same [`StageWorker`] loop. The
//! [`Pipeline`] supervisor owns the tasks and the shutdown sequence.

mod cache;
mod ingest;
mod prompts;
mod queue;
mod report;
mod stage;
mod stages;
mod status;
mod supervisor;
#[cfg(test)]
mod testing;
mod worker;

pub use cache::{
    CacheData, CacheKind, CacheSlot, CacheStore, NpmSlot, RatingSlot, SearchSlot, SocialSlot,
    SynonymsSlot, TranslationSlot, WebifiedSlot, WhoisSlot,
};
pub use ingest::WordIngestor;
pub use queue::{QueueDepths, Queues, StageQueue};
pub use report::{RankedName, ResultsReport};
pub use stage::{Stage, StageKind};
pub use stages::{
    NpmStage, RatingStage, SearchStage, SocialStage, SynonymsStage, TranslationStage,
    WebificationStage, WhoisStage, check_social_handles,
};
pub use status::{StatusReporter, StatusSnapshot};
pub use supervisor::{Pipeline, PipelineSettings};
pub use worker::{Processed, StageWorker};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::MockCollaborators;
    use super::*;
    use crate::collab::SharedCollaborators;
    use crate::types::{Availability, RATING_FAILED, Word};
    use tempfile::TempDir;

    fn word(s: &str) -> Word {
        Word::clean(s).unwrap()
    }

    fn seed(queues: &Queues, w: &str) {
        queues.translation.add(word(w));
        queues.whois.add(word(w));
        queues.synonyms.add(word(w));
    }

    /// Step every stage in turn until all queues are empty
    async fn drain(collab: &SharedCollaborators, cache: &Arc<CacheStore>, queues: &Queues) {
        let c = || collab.clone();
        let translation =
            StageWorker::new(TranslationStage::new(c()), cache.clone(), queues.clone());
        let synonyms = StageWorker::new(SynonymsStage::new(c()), cache.clone(), queues.clone());
        let webify = StageWorker::new(WebificationStage::new(c()), cache.clone(), queues.clone());
        let whois = StageWorker::new(WhoisStage::new(c(), 3, 10), cache.clone(), queues.clone());
        let search = StageWorker::new(SearchStage::new(c()), cache.clone(), queues.clone());
        let rating = StageWorker::new(RatingStage::new(c()), cache.clone(), queues.clone());
        let npm = StageWorker::new(NpmStage::new(c()), cache.clone(), queues.clone());
        let social = StageWorker::new(SocialStage::new(c()), cache.clone(), queues.clone());

        while queues.depths().total() > 0 {
            translation.process_next().await;
            synonyms.process_next().await;
            webify.process_next().await;
            whois.process_next().await;
            search.process_next().await;
            rating.process_next().await;
            npm.process_next().await;
            social.process_next().await;
        }
    }

    #[tokio::test]
    async fn test_available_domain_fans_out_to_four_checks() {
        let dir = TempDir::new().unwrap();
        let (_, collab) = MockCollaborators::new()
            .with_whois("zynk.com", Availability::Available)
            .shared();
        let cache = Arc::new(CacheStore::new(dir.path().join("db.json")));
        let queues = Queues::new();
        let worker = StageWorker::new(WhoisStage::new(collab, 3, 10), cache, queues.clone());

        queues.whois.add(word("zynk"));
        let processed = worker.process_next().await.unwrap();
        assert_eq!(
            processed,
            Processed::Resolved {
                key: word("zynk"),
                cache_hit: false,
                routed: 4
            }
        );

        let depths = queues.depths();
        assert_eq!(
            (depths.search, depths.rating, depths.npm, depths.social),
            (1, 1, 1, 1)
        );
        assert_eq!(depths.total(), 4);
    }

    #[tokio::test]
    async fn test_translation_chain_to_webified_variant() {
        let dir = TempDir::new().unwrap();
        let (mock, collab) = MockCollaborators::new()
            .with_translation("cloud", "de", "Wolke")
            .with_webified("wolke", &["wlk"])
            .resolving("wolke.com")
            .with_whois("wlk.com", Availability::Available)
            .with_rating("wlk", 61.0)
            .shared();
        let cache = Arc::new(CacheStore::new(dir.path().join("db.json")));
        let queues = Queues::new();

        seed(&queues, "cloud");
        drain(&collab, &cache, &queues).await;

        let translations = cache.get::<TranslationSlot>("cloud").unwrap();
        assert_eq!(translations.len(), 1);
        assert_eq!(translations[0].translation.cleaned, "wolke");

        assert_eq!(
            cache.get::<WebifiedSlot>("wolke").unwrap().webified_words,
            vec!["wlk".to_string()]
        );

        // Resolving domains never reach the registrar
        assert_eq!(cache.get::<WhoisSlot>("wolke"), Some(Availability::Unavailable));
        assert!(mock.calls_matching("whois:wolke.com").is_empty());
        assert!(!cache.contains::<RatingSlot>("wolke"));

        assert_eq!(cache.get::<WhoisSlot>("cloud"), Some(Availability::Unknown));
        assert!(!cache.contains::<NpmSlot>("cloud"));

        assert_eq!(cache.get::<WhoisSlot>("wlk"), Some(Availability::Available));
        assert_eq!(cache.get::<RatingSlot>("wlk"), Some(61.0));
        assert_eq!(cache.get::<NpmSlot>("wlk"), Some(Availability::Available));
        assert!(cache.contains::<SearchSlot>("wlk"));
        let social = cache.get::<SocialSlot>("wlk").unwrap();
        assert_eq!(social.len(), 4);
        assert_eq!(social["twitter"], Availability::Unavailable);

        let report = cache.read(ResultsReport::from_cache);
        assert_eq!(report.total(), 1);
        assert_eq!(report.ranked[0].word, "wlk");
        assert_eq!(report.ranked[0].social_available, 3);
    }

    #[tokio::test]
    async fn test_restart_answers_from_persisted_cache() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("db.json");

        let first = CacheStore::new(&db);
        first.put::<WhoisSlot>("zynk", Availability::Available);
        first.flush().await.unwrap();

        let (mock, collab) = MockCollaborators::new().shared();
        let cache = Arc::new(CacheStore::load(&db).await);
        let queues = Queues::new();
        let worker = StageWorker::new(WhoisStage::new(collab, 3, 10), cache, queues.clone());

        queues.whois.add(word("zynk"));
        assert_eq!(
            worker.process_next().await,
            Some(Processed::Resolved {
                key: word("zynk"),
                cache_hit: true,
                routed: 4
            })
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_reseeding_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (mock, collab) = MockCollaborators::new()
            .with_whois("zynk.com", Availability::Available)
            .with_rating("zynk", 90.0)
            .shared();
        let cache = Arc::new(CacheStore::new(dir.path().join("db.json")));
        let queues = Queues::new();

        seed(&queues, "zynk");
        seed(&queues, "zynk");
        assert_eq!(queues.depths().total(), 3);

        drain(&collab, &cache, &queues).await;
        let calls = mock.call_count();
        assert_eq!(mock.calls_matching("whois:zynk.com").len(), 1);
        assert_eq!(mock.calls_matching("npm:zynk").len(), 1);

        seed(&queues, "zynk");
        drain(&collab, &cache, &queues).await;
        assert_eq!(mock.call_count(), calls);
        assert_eq!(cache.get::<RatingSlot>("zynk"), Some(90.0));
    }

    #[tokio::test]
    async fn test_failed_rating_excluded_from_report() {
        let dir = TempDir::new().unwrap();
        let (_, collab) = MockCollaborators::new()
            .with_whois("qxv.com", Availability::Available)
            .shared();
        let cache = Arc::new(CacheStore::new(dir.path().join("db.json")));
        let queues = Queues::new();

        queues.whois.add(word("qxv"));
        drain(&collab, &cache, &queues).await;

        assert_eq!(cache.get::<RatingSlot>("qxv"), Some(RATING_FAILED));
        assert_eq!(cache.read(ResultsReport::from_cache).total(), 0);
    }
}
