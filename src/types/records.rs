//! Pipeline result records
//!
//! These are the values stored in the cache file. Field names match the
//! persisted JSON so an existing `db.json` keeps loading.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::language::Language;
use super::word::{Word, clean_text};

// =============================================================================
// Translation
// =============================================================================

/// Raw and cleaned forms of a translated word
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslatedText {
    pub raw: String,
    pub cleaned: String,
}

/// One source word rendered in one language
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Translation {
    /// Cleaned source word
    pub word: String,
    pub language: Language,
    pub translation: TranslatedText,
}

impl Translation {
    pub fn new(source: &Word, language: Language, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let cleaned = clean_text(&raw);
        Self {
            word: source.as_str().to_string(),
            language,
            translation: TranslatedText { raw, cleaned },
        }
    }

    /// Wrap an English word (e.g. a synonym) so it can be webified
    pub fn english(word: &Word) -> Self {
        Self {
            word: word.as_str().to_string(),
            language: Language::english(),
            translation: TranslatedText {
                raw: word.as_str().to_string(),
                cleaned: word.as_str().to_string(),
            },
        }
    }

    /// Cleaned translated word, if anything survived cleaning
    pub fn cleaned_word(&self) -> Option<Word> {
        Word::clean(&self.translation.cleaned)
    }
}

/// A translation and the short forms derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebifiedEntry {
    #[serde(flatten)]
    pub translation: Translation,
    #[serde(rename = "webifiedWords", default)]
    pub webified_words: Vec<String>,
}

// =============================================================================
// Availability
// =============================================================================

/// Outcome of a domain, package or handle availability check.
///
/// Persisted as `true` / `false` / `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    Unavailable,
    /// The check itself failed
    Unknown,
}

impl Availability {
    /// Only a confirmed `Available` counts
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    /// 404 means nobody claimed the name, 2xx means somebody did
    pub fn from_http_status(status: u16) -> Self {
        match status {
            404 => Self::Available,
            200..=299 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::Available => Some(true),
            Self::Unavailable => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<Option<bool>> for Availability {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Available,
            Some(false) => Self::Unavailable,
            None => Self::Unknown,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Self::from)
    }
}

// =============================================================================
// Search / Rating
// =============================================================================

/// LLM judgement of whether search results show the name is already in use
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchEvaluation {
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
    pub confidence: f64,
}

impl SearchEvaluation {
    /// Shape cached when fetching or evaluating failed
    pub fn failed() -> Self {
        Self {
            is_available: false,
            confidence: 0.0,
        }
    }
}

/// Name quality rating in `[0, 100]`; negative means the rating failed
pub type Rating = f64;

/// Sentinel stored when the LLM gave no usable rating
pub const RATING_FAILED: Rating = -1.0;

// =============================================================================
// Social
// =============================================================================

/// Platforms probed for a free handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SocialPlatform {
    Github,
    Gitlab,
    Twitter,
    Linkedin,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 4] = [
        SocialPlatform::Github,
        SocialPlatform::Gitlab,
        SocialPlatform::Twitter,
        SocialPlatform::Linkedin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
        }
    }

    pub fn profile_url(self, handle: &str) -> String {
        match self {
            Self::Github => format!("https://github.com/{}", handle),
            Self::Gitlab => format!("https://gitlab.com/{}", handle),
            Self::Twitter => format!("https://twitter.com/{}", handle),
            Self::Linkedin => format!("https://linkedin.com/in/{}", handle),
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Platform name -> handle availability
pub type SocialAvailability = BTreeMap<String, Availability>;

/// Number of platforms where the handle is free
pub fn social_available_count(social: &SocialAvailability) -> usize {
    social.values().filter(|a| a.is_available()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_availability_persisted_shape() {
        assert_eq!(serde_json::to_value(Availability::Available).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(Availability::Unavailable).unwrap(), json!(false));
        assert_eq!(serde_json::to_value(Availability::Unknown).unwrap(), json!(null));

        let parsed: Vec<Availability> = serde_json::from_value(json!([true, false, null])).unwrap();
        assert_eq!(
            parsed,
            vec![
                Availability::Available,
                Availability::Unavailable,
                Availability::Unknown
            ]
        );
    }

    #[test]
    fn test_availability_from_status() {
        assert_eq!(Availability::from_http_status(404), Availability::Available);
        assert_eq!(Availability::from_http_status(200), Availability::Unavailable);
        assert_eq!(Availability::from_http_status(429), Availability::Unknown);
        assert!(!Availability::Unknown.is_available());
    }

    #[test]
    fn test_translation_cleans_raw_text() {
        let source = Word::clean("cloud").unwrap();
        let t = Translation::new(&source, Language::new("German", "de"), "Wölke");
        assert_eq!(t.translation.raw, "Wölke");
        assert_eq!(t.translation.cleaned, "wolke");
        assert_eq!(t.cleaned_word().unwrap().as_str(), "wolke");

        let t = Translation::new(&source, Language::new("Japanese", "ja"), "雲");
        assert!(t.cleaned_word().is_none());
    }

    #[test]
    fn test_webified_entry_flattens_translation() {
        let word = Word::clean("wolke").unwrap();
        let entry = WebifiedEntry {
            translation: Translation::english(&word),
            webified_words: vec!["wlke".to_string()],
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["word"], "wolke");
        assert_eq!(value["language"]["code"], "en");
        assert_eq!(value["translation"]["cleaned"], "wolke");
        assert_eq!(value["webifiedWords"][0], "wlke");
    }

    #[test]
    fn test_search_evaluation_field_names() {
        let eval: SearchEvaluation =
            serde_json::from_value(json!({"isAvailable": true, "confidence": 42})).unwrap();
        assert!(eval.is_available);
        assert_eq!(eval.confidence, 42.0);
    }

    #[test]
    fn test_social_available_count() {
        let mut social = SocialAvailability::new();
        social.insert("github".to_string(), Availability::Available);
        social.insert("gitlab".to_string(), Availability::Unknown);
        social.insert("twitter".to_string(), Availability::Available);
        assert_eq!(social_available_count(&social), 2);
    }
}
