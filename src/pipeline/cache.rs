//! Persistent Result Cache
//!
//! One JSON document holding a mapping per stage, keyed by cleaned word.
//! Entries are write-once. The whole document is rewritten on every flush:
//! serialized under the read lock, written to `<file>.tmp`, then renamed over
//! the target, so a crash mid-write never leaves a truncated cache behind.
//!
//! ## Access
//!
//! Each mapping is addressed through a marker type implementing
//! [`CacheSlot`], so `store.get::<WhoisSlot>("zynk")` yields an
//! `Option<Availability>` with no casting at the call site.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::types::{
    Availability, Rating, Result, SearchEvaluation, SocialAvailability, TermError, Translation,
    WebifiedEntry,
};

// =============================================================================
// Cache Document
// =============================================================================

/// The persisted document. Field names are the on-disk keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheData {
    pub translation_cache: BTreeMap<String, Vec<Translation>>,
    pub webified_cache: BTreeMap<String, WebifiedEntry>,
    pub whois_cache: BTreeMap<String, Availability>,
    pub search_evaluation_cache: BTreeMap<String, SearchEvaluation>,
    pub ratings_cache: BTreeMap<String, Rating>,
    pub synonyms_cache: BTreeMap<String, Vec<String>>,
    pub npm_cache: BTreeMap<String, Availability>,
    /// Not written by any stage; preserved across flushes
    pub trademark_cache: BTreeMap<String, Value>,
    pub social_cache: BTreeMap<String, SocialAvailability>,
}

impl CacheData {
    /// Number of entries in one mapping
    pub fn len_of(&self, kind: CacheKind) -> usize {
        match kind {
            CacheKind::Translation => self.translation_cache.len(),
            CacheKind::Webified => self.webified_cache.len(),
            CacheKind::Whois => self.whois_cache.len(),
            CacheKind::SearchEvaluation => self.search_evaluation_cache.len(),
            CacheKind::Rating => self.ratings_cache.len(),
            CacheKind::Synonyms => self.synonyms_cache.len(),
            CacheKind::Npm => self.npm_cache.len(),
            CacheKind::Trademark => self.trademark_cache.len(),
            CacheKind::Social => self.social_cache.len(),
        }
    }

    /// Convert a parsed document one entry at a time. Returns the data and
    /// the number of entries dropped because they did not fit.
    fn from_document(mut document: Map<String, Value>) -> (Self, usize) {
        let mut dropped = 0;
        let mut take = |kind: CacheKind| match document.remove(kind.field_name()) {
            Some(Value::Object(entries)) => entries,
            None | Some(Value::Null) => Map::new(),
            Some(other) => {
                warn!("Ignoring {}: expected an object, found {}", kind, other);
                dropped += 1;
                Map::new()
            }
        };

        let translation = take(CacheKind::Translation);
        let webified = take(CacheKind::Webified);
        let whois = take(CacheKind::Whois);
        let search = take(CacheKind::SearchEvaluation);
        let ratings = take(CacheKind::Rating);
        let synonyms = take(CacheKind::Synonyms);
        let npm = take(CacheKind::Npm);
        let trademark = take(CacheKind::Trademark);
        let social = take(CacheKind::Social);

        let data = Self {
            translation_cache: typed_entries(CacheKind::Translation, translation, &mut dropped),
            webified_cache: typed_entries(CacheKind::Webified, webified, &mut dropped),
            whois_cache: typed_entries(CacheKind::Whois, whois, &mut dropped),
            search_evaluation_cache: typed_entries(
                CacheKind::SearchEvaluation,
                search,
                &mut dropped,
            ),
            ratings_cache: typed_entries(CacheKind::Rating, ratings, &mut dropped),
            synonyms_cache: typed_entries(CacheKind::Synonyms, synonyms, &mut dropped),
            npm_cache: typed_entries(CacheKind::Npm, npm, &mut dropped),
            trademark_cache: typed_entries(CacheKind::Trademark, trademark, &mut dropped),
            social_cache: typed_entries(CacheKind::Social, social, &mut dropped),
        };
        (data, dropped)
    }

    /// Words whose domain check came back Available
    pub fn available_domains(&self) -> impl Iterator<Item = &str> {
        self.whois_cache
            .iter()
            .filter(|(_, availability)| availability.is_available())
            .map(|(word, _)| word.as_str())
    }
}

fn typed_entries<T: DeserializeOwned>(
    kind: CacheKind,
    entries: Map<String, Value>,
    dropped: &mut usize,
) -> BTreeMap<String, T> {
    entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(typed) => Some((key, typed)),
            Err(e) => {
                warn!("Dropping {} entry {:?}: {}", kind, key, e);
                *dropped += 1;
                None
            }
        })
        .collect()
}

/// Identifies one mapping of the cache document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKind {
    Translation,
    Webified,
    Whois,
    SearchEvaluation,
    Rating,
    Synonyms,
    Npm,
    Trademark,
    Social,
}

impl CacheKind {
    pub const ALL: [CacheKind; 9] = [
        CacheKind::Translation,
        CacheKind::Webified,
        CacheKind::Whois,
        CacheKind::SearchEvaluation,
        CacheKind::Rating,
        CacheKind::Synonyms,
        CacheKind::Npm,
        CacheKind::Trademark,
        CacheKind::Social,
    ];

    /// Key of this mapping in the persisted document
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Translation => "translation_cache",
            Self::Webified => "webified_cache",
            Self::Whois => "whois_cache",
            Self::SearchEvaluation => "search_evaluation_cache",
            Self::Rating => "ratings_cache",
            Self::Synonyms => "synonyms_cache",
            Self::Npm => "npm_cache",
            Self::Trademark => "trademark_cache",
            Self::Social => "social_cache",
        }
    }
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

// =============================================================================
// Typed Slots
// =============================================================================

/// Typed accessor for one mapping of [`CacheData`]
pub trait CacheSlot: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    const KIND: CacheKind;

    fn slot(data: &CacheData) -> &BTreeMap<String, Self::Value>;
    fn slot_mut(data: &mut CacheData) -> &mut BTreeMap<String, Self::Value>;
}

macro_rules! cache_slot {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $field:ident, $value:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl CacheSlot for $name {
            type Value = $value;

            const KIND: CacheKind = CacheKind::$kind;

            fn slot(data: &CacheData) -> &BTreeMap<String, Self::Value> {
                &data.$field
            }

            fn slot_mut(data: &mut CacheData) -> &mut BTreeMap<String, Self::Value> {
                &mut data.$field
            }
        }
    };
}

cache_slot!(
    /// Source word -> translations into every catalog language
    TranslationSlot, Translation, translation_cache, Vec<Translation>
);
cache_slot!(
    /// Translated word -> translation plus webified variants
    WebifiedSlot, Webified, webified_cache, WebifiedEntry
);
cache_slot!(WhoisSlot, Whois, whois_cache, Availability);
cache_slot!(SearchSlot, SearchEvaluation, search_evaluation_cache, SearchEvaluation);
cache_slot!(RatingSlot, Rating, ratings_cache, Rating);
cache_slot!(SynonymsSlot, Synonyms, synonyms_cache, Vec<String>);
cache_slot!(NpmSlot, Npm, npm_cache, Availability);
cache_slot!(SocialSlot, Social, social_cache, SocialAvailability);

// =============================================================================
// Cache Store
// =============================================================================

/// Shared cache with write-through persistence
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    data: RwLock<CacheData>,
    flush_lock: tokio::sync::Mutex<()>,
}

impl CacheStore {
    /// Empty store that will persist to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_data(path, CacheData::default())
    }

    pub fn with_data(path: impl Into<PathBuf>, data: CacheData) -> Self {
        Self {
            path: path.into(),
            data: RwLock::new(data),
            flush_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load the cache file.
    ///
    /// A missing file starts empty. A file that is not a JSON object is moved
    /// aside to `<file>.corrupt` and the store starts empty. Single entries
    /// that do not fit their mapping are dropped; the rest are kept.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No cache at {}, starting empty", path.display());
                return Self::new(path);
            }
            Err(e) => {
                error!("Failed to read cache {}: {}", path.display(), e);
                return Self::new(path);
            }
        };

        let document = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(document)) => document,
            Ok(_) => {
                error!("Cache {} is not a JSON object", path.display());
                return Self::quarantine(path).await;
            }
            Err(e) => {
                error!("Cache {} is not valid JSON: {}", path.display(), e);
                return Self::quarantine(path).await;
            }
        };

        let (data, dropped) = CacheData::from_document(document);
        if dropped > 0 {
            warn!(
                "Dropped {} unreadable entries from {}; they will be fetched again",
                dropped,
                path.display()
            );
        }
        let store = Self::with_data(path, data);
        debug!("Loaded cache {}: {:?}", store.path.display(), store.sizes());
        store
    }

    /// Move an unusable cache file to `<file>.corrupt` and start empty
    async fn quarantine(path: PathBuf) -> Self {
        let aside = sibling_path(&path, ".corrupt");
        match tokio::fs::rename(&path, &aside).await {
            Ok(()) => warn!("Moved unreadable cache to {}", aside.display()),
            Err(e) => warn!("Could not move unreadable cache aside: {}", e),
        }
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_data(&self) -> RwLockReadGuard<'_, CacheData> {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_data(&self) -> RwLockWriteGuard<'_, CacheData> {
        self.data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get<S: CacheSlot>(&self, key: &str) -> Option<S::Value> {
        S::slot(&self.read_data()).get(key).cloned()
    }

    pub fn contains<S: CacheSlot>(&self, key: &str) -> bool {
        S::slot(&self.read_data()).contains_key(key)
    }

    /// Insert a result. Returns `false` and keeps the existing value when the
    /// key is already present.
    pub fn put<S: CacheSlot>(&self, key: impl Into<String>, value: S::Value) -> bool {
        let mut data = self.write_data();
        let slot = S::slot_mut(&mut data);
        let key = key.into();
        if slot.contains_key(&key) {
            debug!("{} already holds {}, keeping first value", S::KIND, key);
            return false;
        }
        slot.insert(key, value);
        true
    }

    /// Run a read-only closure against the whole document
    pub fn read<R>(&self, f: impl FnOnce(&CacheData) -> R) -> R {
        f(&self.read_data())
    }

    /// Entry count per mapping
    pub fn sizes(&self) -> BTreeMap<CacheKind, usize> {
        let data = self.read_data();
        CacheKind::ALL
            .iter()
            .map(|&kind| (kind, data.len_of(kind)))
            .collect()
    }

    /// Persist the full document atomically.
    ///
    /// Flushes are serialized; each one snapshots the state at the moment it
    /// acquires the flush lock.
    pub async fn flush(&self) -> Result<()> {
        let _guard = self.flush_lock.lock().await;

        let bytes = {
            let data = self.read_data();
            serde_json::to_vec_pretty(&*data)?
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = sibling_path(&self.path, ".tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            TermError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            TermError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        debug!("Flushed cache ({} bytes)", bytes.len());
        Ok(())
    }
}

/// `db.json` -> `db.json<suffix>` in the same directory
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("cache"));
    name.push(suffix);
    path.with_file_name(name)
}
