//! Periodic progress reporting (read-only)

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use super::cache::{CacheKind, CacheStore};
use super::queue::{QueueDepths, Queues};

/// Point-in-time view of queues and cache
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub queues: QueueDepths,
    pub cache_sizes: BTreeMap<CacheKind, usize>,
    /// WHOIS entries that are Available
    pub available_domains: usize,
    /// Available domains that already have a rating
    pub rated_domains: usize,
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.queues.total();
        if pending > 0 {
            write!(
                f,
                "Processing... {} items in queues | {} domains available | {} rated",
                pending, self.available_domains, self.rated_domains
            )
        } else {
            write!(
                f,
                "Monitoring... {} domains found, {} rated",
                self.available_domains, self.rated_domains
            )
        }
    }
}

pub struct StatusReporter {
    cache: Arc<CacheStore>,
    queues: Queues,
}

impl StatusReporter {
    pub fn new(cache: Arc<CacheStore>, queues: Queues) -> Self {
        Self { cache, queues }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let (available_domains, rated_domains) = self.cache.read(|data| {
            data.available_domains().fold((0, 0), |(available, rated), word| {
                let has_rating = data.ratings_cache.contains_key(word);
                (available + 1, rated + usize::from(has_rating))
            })
        });

        StatusSnapshot {
            queues: self.queues.depths(),
            cache_sizes: self.cache.sizes(),
            available_domains,
            rated_domains,
        }
    }

    /// Log a snapshot every `interval` until `running` is cleared
    pub async fn run(self, running: Arc<AtomicBool>, interval: Duration) {
        loop {
            tokio::time::sleep(interval).await;
            if !running.load(Ordering::SeqCst) {
                break;
            }
            let snapshot = self.snapshot();
            debug!(
                queues = ?snapshot.queues,
                cache = ?snapshot.cache_sizes,
                "Pipeline status detail"
            );
            info!("{}", snapshot);
        }
    }
}
