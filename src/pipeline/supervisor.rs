//! Pipeline Supervisor
//!
//! Owns task lifetimes: seeds from the word list, spawns the ingestor, the
//! eight stage workers and the status reporter, then waits for the shutdown
//! signal. Shutdown clears the shared running flag, gives tasks a grace
//! period to finish their current item, aborts stragglers and flushes the
//! cache one last time.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::cache::CacheStore;
use super::ingest::WordIngestor;
use super::queue::Queues;
use super::stage::Stage;
use super::stages::{
    NpmStage, RatingStage, SearchStage, SocialStage, SynonymsStage, TranslationStage,
    WebificationStage, WhoisStage,
};
use super::status::StatusReporter;
use super::worker::StageWorker;
use crate::collab::SharedCollaborators;
use crate::config::PipelineConfig;
use crate::constants::{intervals, pipeline};
use crate::types::Result;

/// Runtime settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub base_words_file: PathBuf,
    pub min_length: usize,
    pub max_length: usize,
    pub ingest_interval: Duration,
    pub status_interval: Duration,
    pub shutdown_grace: Duration,
    /// Replaces every stage's own interval when set
    pub stage_interval: Option<Duration>,
}

impl PipelineSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            base_words_file: config.base_words_file.clone(),
            min_length: config.min_length,
            max_length: config.max_length,
            ingest_interval: Duration::from_millis(intervals::INGEST_MS),
            status_interval: Duration::from_millis(intervals::STATUS_MS),
            shutdown_grace: Duration::from_secs(pipeline::SHUTDOWN_GRACE_SECS),
            stage_interval: None,
        }
    }
}

pub struct Pipeline {
    cache: Arc<CacheStore>,
    queues: Queues,
    collab: SharedCollaborators,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        cache: Arc<CacheStore>,
        collab: SharedCollaborators,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            cache,
            queues: Queues::new(),
            collab,
            settings,
        }
    }

    pub fn queues(&self) -> &Queues {
        &self.queues
    }

    fn spawn_worker<S: Stage>(
        &self,
        tasks: &mut JoinSet<()>,
        stage: S,
        running: &Arc<AtomicBool>,
    ) {
        let mut worker = StageWorker::new(stage, Arc::clone(&self.cache), self.queues.clone());
        if let Some(interval) = self.settings.stage_interval {
            worker = worker.with_interval(interval);
        }
        tasks.spawn(worker.run(Arc::clone(running)));
    }

    /// Run until `shutdown` resolves.
    ///
    /// Fails only when the word list is missing at startup.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let settings = &self.settings;
        let mut ingestor =
            WordIngestor::new(settings.base_words_file.clone(), self.queues.clone());
        ingestor.poll().await?;

        let running = Arc::new(AtomicBool::new(true));
        let mut tasks = JoinSet::new();

        tasks.spawn(ingestor.run(Arc::clone(&running), settings.ingest_interval));

        let collab = &self.collab;
        self.spawn_worker(&mut tasks, TranslationStage::new(collab.clone()), &running);
        self.spawn_worker(&mut tasks, SynonymsStage::new(collab.clone()), &running);
        self.spawn_worker(&mut tasks, WebificationStage::new(collab.clone()), &running);
        self.spawn_worker(
            &mut tasks,
            WhoisStage::new(collab.clone(), settings.min_length, settings.max_length),
            &running,
        );
        self.spawn_worker(&mut tasks, SearchStage::new(collab.clone()), &running);
        self.spawn_worker(&mut tasks, RatingStage::new(collab.clone()), &running);
        self.spawn_worker(&mut tasks, NpmStage::new(collab.clone()), &running);
        self.spawn_worker(&mut tasks, SocialStage::new(collab.clone()), &running);

        let reporter = StatusReporter::new(Arc::clone(&self.cache), self.queues.clone());
        tasks.spawn(reporter.run(Arc::clone(&running), settings.status_interval));

        info!(
            "Pipeline started ({} tasks, domain length {}-{})",
            tasks.len(),
            settings.min_length,
            settings.max_length
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(result) = tasks.join_next() => {
                    if let Err(e) = result {
                        error!("Pipeline task ended abnormally: {}", e);
                    }
                }
            }
        }

        info!("Stopping pipeline...");
        running.store(false, Ordering::SeqCst);

        let drain = async {
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    error!("Pipeline task ended abnormally: {}", e);
                }
            }
        };
        if tokio::time::timeout(settings.shutdown_grace, drain)
            .await
            .is_err()
        {
            warn!(
                "{} tasks still busy after {:?}, aborting",
                tasks.len(),
                settings.shutdown_grace
            );
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
        }

        match self.cache.flush().await {
            Ok(()) => info!("Cache saved to {}", self.cache.path().display()),
            Err(e) => error!("Final cache flush failed: {}", e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::cache::{RatingSlot, SocialSlot, WhoisSlot};
    use crate::pipeline::testing::MockCollaborators;
    use crate::types::{Availability, TermError};
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> PipelineSettings {
        PipelineSettings {
            base_words_file: dir.path().join("base-words.txt"),
            min_length: 3,
            max_length: 10,
            ingest_interval: Duration::from_millis(10),
            status_interval: Duration::from_millis(10),
            shutdown_grace: Duration::from_secs(2),
            stage_interval: Some(Duration::from_millis(1)),
        }
    }

    #[tokio::test]
    async fn test_missing_word_list_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (mock, collab) = MockCollaborators::new().shared();
        let cache = Arc::new(CacheStore::new(dir.path().join("db.json")));

        let result = Pipeline::new(cache, collab, settings(&dir))
            .run(std::future::pending())
            .await;
        assert!(matches!(result, Err(TermError::WordListMissing { .. })));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_until_shutdown() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("base-words.txt"), "zynk\n").unwrap();
        let (mock, collab) = MockCollaborators::new()
            .with_whois("zynk.com", Availability::Available)
            .with_rating("zynk", 77.0)
            .shared();
        let db = dir.path().join("db.json");
        let cache = Arc::new(CacheStore::new(&db));

        let watched = Arc::clone(&cache);
        let shutdown = async move {
            loop {
                if watched.contains::<RatingSlot>("zynk")
                    && watched.contains::<SocialSlot>("zynk")
                {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };

        tokio::time::timeout(
            Duration::from_secs(10),
            Pipeline::new(Arc::clone(&cache), collab, settings(&dir)).run(shutdown),
        )
        .await
        .unwrap()
        .unwrap();

        let reloaded = CacheStore::load(&db).await;
        assert_eq!(reloaded.get::<WhoisSlot>("zynk"), Some(Availability::Available));
        assert_eq!(reloaded.get::<RatingSlot>("zynk"), Some(77.0));
        assert_eq!(mock.calls_matching("whois:zynk.com").len(), 1);
    }
}
