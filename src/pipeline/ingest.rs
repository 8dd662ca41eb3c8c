//! Word List Ingestion
//!
//! The base word file is re-read on a fixed cadence so words appended while
//! the pipeline runs are picked up. Each distinct line is seeded once per
//! process lifetime.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::queue::Queues;
use crate::types::{Result, TermError, Word};

pub struct WordIngestor {
    path: PathBuf,
    seen: HashSet<String>,
    queues: Queues,
}

impl WordIngestor {
    pub fn new(path: impl Into<PathBuf>, queues: Queues) -> Self {
        Self {
            path: path.into(),
            seen: HashSet::new(),
            queues,
        }
    }

    /// Read the word list once and seed translation, WHOIS and synonym
    /// queues with every line not seen before. Returns the number of words
    /// seeded.
    pub async fn poll(&mut self) -> Result<usize> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TermError::WordListMissing {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut seeded = 0;
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if !self.seen.insert(line.to_string()) {
                continue;
            }
            let Some(word) = Word::clean(line) else {
                warn!("Ignoring {:?}: no letters left after cleaning", line);
                continue;
            };

            self.queues.translation.add(word.clone());
            self.queues.whois.add(word.clone());
            self.queues.synonyms.add(word);
            seeded += 1;
        }

        if seeded > 0 {
            info!("Queued {} new base words from {}", seeded, self.path.display());
        }
        Ok(seeded)
    }

    /// Re-read the list every `interval` until `running` is cleared
    pub async fn run(mut self, running: Arc<AtomicBool>, interval: Duration) {
        loop {
            tokio::time::sleep(interval).await;
            if !running.load(Ordering::SeqCst) {
                break;
            }
            if let Err(e) = self.poll().await {
                warn!("Failed to re-read word list: {}", e);
            }
        }
        debug!("Word ingestor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn word(s: &str) -> Word {
        Word::clean(s).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = WordIngestor::new(dir.path().join("base-words.txt"), Queues::new());
        assert!(matches!(
            ingestor.poll().await,
            Err(TermError::WordListMissing { .. })
        ));
    }

    #[tokio::test]
    async fn test_seeds_three_queues() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("base-words.txt");
        std::fs::write(&path, "Cloud\n\n  Café \n").unwrap();

        let queues = Queues::new();
        let mut ingestor = WordIngestor::new(&path, queues.clone());
        assert_eq!(ingestor.poll().await.unwrap(), 2);

        for queue in [&queues.translation, &queues.whois, &queues.synonyms] {
            assert!(queue.contains(&word("cloud")));
            assert!(queue.contains(&word("cafe")));
        }
        assert_eq!(queues.depths().total(), 6);
    }

    #[tokio::test]
    async fn test_only_new_lines_seeded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("base-words.txt");
        std::fs::write(&path, "cloud\n").unwrap();

        let queues = Queues::new();
        let mut ingestor = WordIngestor::new(&path, queues.clone());
        assert_eq!(ingestor.poll().await.unwrap(), 1);
        queues.translation.take_one();

        std::fs::write(&path, "cloud\nstorm\n").unwrap();
        assert_eq!(ingestor.poll().await.unwrap(), 1);
        assert_eq!(queues.translation.take_one(), Some(word("storm")));
        assert!(queues.translation.is_empty());

        assert_eq!(ingestor.poll().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unusable_lines_marked_seen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("base-words.txt");
        std::fs::write(&path, "1234\n日本\n").unwrap();

        let queues = Queues::new();
        let mut ingestor = WordIngestor::new(&path, queues.clone());
        assert_eq!(ingestor.poll().await.unwrap(), 0);
        assert_eq!(queues.depths().total(), 0);
        assert_eq!(ingestor.seen.len(), 2);
    }
}
