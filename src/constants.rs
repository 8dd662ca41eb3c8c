//! Global Constants
//!
//! Centralized constants for pipeline cadence and collaborator tuning.

/// Stage polling intervals (milliseconds). Each worker processes at most one
/// item per interval, which is the only rate limit on external calls.
pub mod intervals {
    pub const TRANSLATION_MS: u64 = 3_000;
    pub const SYNONYMS_MS: u64 = 1_000;
    pub const WEBIFICATION_MS: u64 = 1_000;
    pub const WHOIS_MS: u64 = 500;
    pub const SEARCH_MS: u64 = 30_000;
    pub const RATING_MS: u64 = 300;
    pub const NPM_MS: u64 = 1_000;
    pub const SOCIAL_MS: u64 = 2_000;

    /// Word list re-read cadence
    pub const INGEST_MS: u64 = 3_000;

    /// Status summary cadence
    pub const STATUS_MS: u64 = 10_000;
}

/// Pipeline constants
pub mod pipeline {
    /// Default minimum word length considered for domain checks
    pub const DEFAULT_MIN_LENGTH: usize = 3;

    /// Default maximum word length considered for domain checks
    pub const DEFAULT_MAX_LENGTH: usize = 10;

    /// Concurrent translation requests per base word
    pub const TRANSLATION_CONCURRENCY: usize = 4;

    /// Search result HTML passed to the LLM is cut to this many characters
    pub const SEARCH_HTML_LIMIT: usize = 5_000;

    /// How long the supervisor waits for workers after stop is requested (seconds)
    pub const SHUTDOWN_GRACE_SECS: u64 = 5;

    /// Rows shown by the results report
    pub const DEFAULT_RESULTS_LIMIT: usize = 50;
}

/// Default file locations
pub mod paths {
    pub const BASE_WORDS_FILE: &str = "base-words.txt";
    pub const DB_FILE: &str = "db.json";
    pub const CONFIG_FILE: &str = "domainterm.toml";
}

/// HTTP/Network constants
pub mod network {
    /// LLM request timeout (seconds)
    pub const LLM_TIMEOUT_SECS: u64 = 30;

    /// Translation request timeout (seconds)
    pub const TRANSLATE_TIMEOUT_SECS: u64 = 10;

    /// Registry and social profile probe timeout (seconds)
    pub const PROBE_TIMEOUT_SECS: u64 = 10;

    /// Search page fetch timeout (seconds)
    pub const SEARCH_TIMEOUT_SECS: u64 = 15;

    /// Registrar WHOIS API timeout (seconds)
    pub const WHOIS_TIMEOUT_SECS: u64 = 30;

    /// DNS resolution timeout (seconds)
    pub const DNS_TIMEOUT_SECS: u64 = 5;

    pub const USER_AGENT: &str = concat!("domainterm/", env!("CARGO_PKG_VERSION"));
}

/// External endpoints
pub mod endpoints {
    pub const DEFAULT_LLM_BASE_URL: &str = "http://127.0.0.1:1234/v1";
    pub const DEFAULT_LLM_API_KEY: &str = "lm-studio";
    pub const TRANSLATE_URL: &str = "https://translate.google.com/translate_a/single";
    pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";
    pub const SEARCH_URL: &str = "https://search.brave.com/search";
    pub const CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";
}
