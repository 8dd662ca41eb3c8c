//! Per-collaborator Timeouts
//!
//! Every external call carries its own deadline so a hung endpoint only
//! stalls the one stage waiting on it.

use std::future::Future;
use std::time::Duration;

use crate::constants::network as net_constants;
use crate::types::{Result, TermError};

/// Timeout configuration for each kind of external call
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub llm_request: Duration,
    pub translate: Duration,
    /// npm registry and social profile probes
    pub probe: Duration,
    pub search: Duration,
    pub whois: Duration,
    pub dns: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_request: Duration::from_secs(net_constants::LLM_TIMEOUT_SECS),
            translate: Duration::from_secs(net_constants::TRANSLATE_TIMEOUT_SECS),
            probe: Duration::from_secs(net_constants::PROBE_TIMEOUT_SECS),
            search: Duration::from_secs(net_constants::SEARCH_TIMEOUT_SECS),
            whois: Duration::from_secs(net_constants::WHOIS_TIMEOUT_SECS),
            dns: Duration::from_secs(net_constants::DNS_TIMEOUT_SECS),
        }
    }
}

impl TimeoutConfig {
    /// Use the configured LLM timeout, keep the rest at defaults
    pub fn with_llm_secs(secs: u64) -> Self {
        Self {
            llm_request: Duration::from_secs(secs),
            ..Self::default()
        }
    }
}

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(TermError::timeout(operation_name, timeout)),
    }
}

/// Execute an async operation with a timeout, wrapping a non-Result output
pub async fn with_timeout_map<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(TermError::timeout(operation_name, timeout)),
    }
}
