use std::time::Duration;

use tracing::debug;

use crate::ai::with_timeout_map;

/// Resolve `domain` once; any failure (NXDOMAIN, timeout) counts as not resolving
pub(super) async fn resolves(domain: &str, timeout: Duration) -> bool {
    match with_timeout_map(timeout, tokio::net::lookup_host((domain, 80)), "dns lookup").await {
        Ok(Ok(mut addrs)) => {
            let resolved = addrs.next().is_some();
            debug!("DNS {}: resolves={}", domain, resolved);
            resolved
        }
        Ok(Err(e)) => {
            debug!("DNS {}: no resolution ({})", domain, e);
            false
        }
        Err(e) => {
            debug!("DNS {}: {}", domain, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_localhost_resolves() {
        assert!(resolves("localhost", Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_invalid_name_does_not_resolve() {
        assert!(!resolves("no-such-host.invalid", Duration::from_secs(5)).await);
    }
}
