//! Deduplicating Stage Queues
//!
//! Each stage has one pending set. Adding an item already pending is a
//! no-op; `take_one` hands out the oldest pending item (FIFO). Once taken,
//! an item may be added again; repeat work is absorbed by the cache.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{Translation, Word};

#[derive(Debug)]
struct QueueState<T> {
    order: VecDeque<T>,
    members: HashSet<T>,
}

/// Cloneable handle to one stage's pending set
#[derive(Debug)]
pub struct StageQueue<T> {
    state: Arc<Mutex<QueueState<T>>>,
}

impl<T> Clone for StageQueue<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Eq + Hash> Default for StageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> StageQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                order: VecDeque::new(),
                members: HashSet::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enqueue unless already pending. Returns whether the item was added.
    pub fn add(&self, item: T) -> bool {
        let mut state = self.lock();
        if !state.members.insert(item.clone()) {
            return false;
        }
        state.order.push_back(item);
        true
    }

    /// Remove and return the oldest pending item
    pub fn take_one(&self) -> Option<T> {
        let mut state = self.lock();
        let item = state.order.pop_front()?;
        state.members.remove(&item);
        Some(item)
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.lock().members.contains(item)
    }
}

/// Pending item counts per stage, in pipeline order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueDepths {
    pub translation: usize,
    pub synonyms: usize,
    pub webification: usize,
    pub whois: usize,
    pub search: usize,
    pub rating: usize,
    pub npm: usize,
    pub social: usize,
}

impl QueueDepths {
    pub fn total(&self) -> usize {
        self.translation
            + self.synonyms
            + self.webification
            + self.whois
            + self.search
            + self.rating
            + self.npm
            + self.social
    }
}

/// The eight inter-stage channels. Cloning shares the underlying queues.
#[derive(Debug, Clone, Default)]
pub struct Queues {
    pub translation: StageQueue<Word>,
    pub synonyms: StageQueue<Word>,
    pub webification: StageQueue<Translation>,
    pub whois: StageQueue<Word>,
    pub search: StageQueue<Word>,
    pub rating: StageQueue<Word>,
    pub npm: StageQueue<Word>,
    pub social: StageQueue<Word>,
}

impl Queues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depths(&self) -> QueueDepths {
        QueueDepths {
            translation: self.translation.len(),
            synonyms: self.synonyms.len(),
            webification: self.webification.len(),
            whois: self.whois.len(),
            search: self.search.len(),
            rating: self.rating.len(),
            npm: self.npm.len(),
            social: self.social.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Word {
        Word::clean(s).unwrap()
    }

    #[test]
    fn test_add_deduplicates_pending() {
        let queue = StageQueue::new();
        assert!(queue.add(word("cloud")));
        assert!(!queue.add(word("cloud")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_take_one_is_fifo() {
        let queue = StageQueue::new();
        for w in ["nimbus", "cloud", "vapor"] {
            queue.add(word(w));
        }
        assert_eq!(queue.take_one(), Some(word("nimbus")));
        assert_eq!(queue.take_one(), Some(word("cloud")));
        assert_eq!(queue.take_one(), Some(word("vapor")));
        assert_eq!(queue.take_one(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_taken_item_can_be_added_again() {
        let queue = StageQueue::new();
        queue.add(word("zynk"));
        assert_eq!(queue.take_one(), Some(word("zynk")));
        assert!(!queue.contains(&word("zynk")));
        assert!(queue.add(word("zynk")));
    }

    #[test]
    fn test_clones_share_state() {
        let queues = Queues::new();
        let handle = queues.clone();
        handle.rating.add(word("zynk"));
        handle.npm.add(word("zynk"));

        let depths = queues.depths();
        assert_eq!(depths.rating, 1);
        assert_eq!(depths.npm, 1);
        assert_eq!(depths.total(), 2);
    }

    #[test]
    fn test_concurrent_adds_keep_one_copy() {
        let queue = StageQueue::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let queue = queue.clone();
                std::thread::spawn(move || queue.add(Word::clean("zynk").unwrap()))
            })
            .collect();
        let added = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|&added| added)
            .count();
        assert_eq!(added, 1);
        assert_eq!(queue.len(), 1);
    }
}
