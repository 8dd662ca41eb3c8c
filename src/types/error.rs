//! Unified Error Type System
//!
//! One error enum for the whole crate. Collaborator failures never surface as
//! errors to the pipeline (they are absorbed into negative results at the
//! facade boundary), so `TermError` mostly travels through startup, the
//! persistence layer and the HTTP adapters before being logged.
//!
//! ## Error Categories
//!
//! - **Network**: connectivity issues, DNS, connection resets
//! - **Timeout**: a call exceeded its own deadline
//! - **RateLimit**: remote side answered 429
//! - **Auth**: credentials rejected
//! - **ParseError**: malformed JSON or unexpected response shape
//! - **Config**: missing or invalid settings (fatal at startup)
//! - **Storage**: cache file could not be read or written

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::constants::paths;

// =============================================================================
// Error Categories
// =============================================================================

/// Coarse classification used for log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    RateLimit,
    Auth,
    ParseError,
    Config,
    Storage,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Config => write!(f, "CONFIG"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Classify an HTTP status code returned by a collaborator endpoint
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            401 | 403 => Self::Auth,
            500..=599 => Self::Network,
            _ => Self::Unknown,
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum TermError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Word list not found: {path}")]
    WordListMissing { path: PathBuf },

    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Registrar error: {0}")]
    Registrar(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, TermError>;

impl TermError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Category for log context
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) | Self::Storage(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::ParseError,
            Self::Http(e) if e.is_timeout() => ErrorCategory::Timeout,
            Self::Http(e) => e
                .status()
                .map(|s| ErrorCategory::from_http_status(s.as_u16()))
                .unwrap_or(ErrorCategory::Network),
            Self::Config(_) | Self::WordListMissing { .. } => ErrorCategory::Config,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::LlmApi(msg) | Self::Registrar(msg) => classify_message(msg),
        }
    }

    /// What the user should do about a fatal error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::WordListMissing { path } => Some(format!(
                "Create {} with a line-separated list of words.",
                path.display()
            )),
            Self::Config(_) => Some(format!(
                "Check .env, {} or the DOMAINTERM_* environment variables.",
                paths::CONFIG_FILE
            )),
            _ => None,
        }
    }
}

fn classify_message(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();

    if lower.contains("429") || lower.contains("rate limit") {
        ErrorCategory::RateLimit
    } else if lower.contains("401") || lower.contains("403") || lower.contains("unauthorized") {
        ErrorCategory::Auth
    } else if lower.contains("parse") || lower.contains("json") {
        ErrorCategory::ParseError
    } else if lower.contains("timed out") || lower.contains("timeout") {
        ErrorCategory::Timeout
    } else if lower.contains("connection") || lower.contains("dns") {
        ErrorCategory::Network
    } else {
        ErrorCategory::Unknown
    }
}
