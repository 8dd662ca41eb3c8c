//! Stage Worker
//!
//! Drives one [`Stage`]: take a single item, answer it from the cache or
//! fetch it exactly once, persist, fan out, sleep. Every stage runs the same
//! loop; only the interval and the stage hooks differ.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, error, info};

use super::cache::CacheStore;
use super::queue::Queues;
use super::stage::Stage;
use crate::types::Word;

/// Outcome of one loop iteration that took an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// The item has no cache key (e.g. outside the domain length bounds)
    Skipped,
    Resolved {
        key: Word,
        cache_hit: bool,
        /// Items newly enqueued downstream
        routed: usize,
    },
}

pub struct StageWorker<S: Stage> {
    stage: S,
    cache: Arc<CacheStore>,
    queues: Queues,
    interval: Duration,
}

impl<S: Stage> StageWorker<S> {
    pub fn new(stage: S, cache: Arc<CacheStore>, queues: Queues) -> Self {
        let interval = stage.kind().interval();
        Self {
            stage,
            cache,
            queues,
            interval,
        }
    }

    /// Override the polling interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Handle at most one queued item. `None` when the queue is empty.
    pub async fn process_next(&self) -> Option<Processed> {
        let stage = self.stage.kind();
        let item = self.stage.queue(&self.queues).take_one()?;

        let Some(key) = self.stage.cache_key(&item) else {
            debug!("[{}] skipping {:?}", stage, item);
            return Some(Processed::Skipped);
        };

        let (value, cache_hit) = match self.cache.get::<S::Slot>(key.as_str()) {
            Some(value) => {
                debug!("[{}] cache hit for {}", stage, key);
                (value, true)
            }
            None => {
                let value = self.stage.fetch(&item, &key).await;
                self.cache.put::<S::Slot>(key.as_str(), value.clone());
                if let Err(e) = self.cache.flush().await {
                    error!("[{}] failed to persist cache after {}: {}", stage, key, e);
                }
                (value, false)
            }
        };

        let routed = self.stage.route(&item, &key, &value, &self.queues);
        if !cache_hit {
            info!("[{}] processed {} (queued {} downstream)", stage, key, routed);
        }

        Some(Processed::Resolved {
            key,
            cache_hit,
            routed,
        })
    }

    /// Loop until `running` is cleared. Sleeps one interval after every
    /// iteration, whether or not an item was taken.
    pub async fn run(self, running: Arc<AtomicBool>) {
        let stage = self.stage.kind();
        debug!("[{}] worker started (interval {:?})", stage, self.interval);

        while running.load(Ordering::SeqCst) {
            self.process_next().await;
            tokio::time::sleep(self.interval).await;
        }

        debug!("[{}] worker stopped", stage);
    }
}
