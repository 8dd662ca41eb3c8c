//! Cloudflare registrar intelligence (WHOIS) client

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::RegistrarConfig;
use crate::constants::endpoints;
use crate::types::{Availability, Result, TermError};

/// WHOIS lookups through the Cloudflare account intel API
pub struct CloudflareRegistrar {
    client: reqwest::Client,
    api_url: String,
    account_id: String,
    /// API token stored securely - never exposed in logs or debug output
    api_token: SecretString,
}

impl std::fmt::Debug for CloudflareRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareRegistrar")
            .field("api_url", &self.api_url)
            .field("account_id", &self.account_id)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

impl CloudflareRegistrar {
    pub fn new(client: reqwest::Client, config: &RegistrarConfig) -> Result<Self> {
        let api_token = config
            .api_token
            .clone()
            .ok_or_else(|| TermError::Config("CLOUDFLARE_API_TOKEN is not set".to_string()))?;
        let account_id = config
            .account_id
            .clone()
            .ok_or_else(|| TermError::Config("CLOUDFLARE_ACCOUNT_ID is not set".to_string()))?;

        Ok(Self {
            client,
            api_url: endpoints::CLOUDFLARE_API_URL.to_string(),
            account_id,
            api_token: SecretString::from(api_token),
        })
    }

    fn whois_url(&self, domain: &str) -> Result<Url> {
        let base = format!("{}/accounts/{}/intel/whois", self.api_url, self.account_id);
        Url::parse_with_params(&base, &[("domain", domain)])
            .map_err(|e| TermError::Registrar(format!("Invalid WHOIS URL: {}", e)))
    }

    /// Look up `domain`. Transport and decode failures are errors; an API
    /// answer with `success: false` is `Unknown`.
    pub async fn lookup(&self, domain: &str) -> Result<Availability> {
        let url = self.whois_url(domain)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let body: WhoisResponse = response.json().await.map_err(|e| {
            TermError::Registrar(format!("Failed to parse WHOIS response ({}): {}", status, e))
        })?;

        if !body.success {
            debug!("WHOIS {} rejected by API: {:?}", domain, body.errors);
        }
        Ok(availability_from_response(&body))
    }
}

#[derive(Debug, Deserialize)]
struct WhoisResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<Value>,
    #[serde(default)]
    result: Option<WhoisResult>,
}

#[derive(Debug, Deserialize)]
struct WhoisResult {
    #[serde(default = "registered_unless_stated")]
    found: bool,
}

fn registered_unless_stated() -> bool {
    true
}

/// A domain is available only when the API succeeded and says it was not found
fn availability_from_response(body: &WhoisResponse) -> Availability {
    if !body.success {
        return Availability::Unknown;
    }
    let found = body.result.as_ref().is_none_or(|r| r.found);
    if found {
        Availability::Unavailable
    } else {
        Availability::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Availability {
        let response: WhoisResponse = serde_json::from_str(body).unwrap();
        availability_from_response(&response)
    }

    #[test]
    fn test_not_found_is_available() {
        assert_eq!(
            parse(r#"{"success": true, "result": {"domain": "zynk.com", "found": false}}"#),
            Availability::Available
        );
    }

    #[test]
    fn test_found_is_unavailable() {
        assert_eq!(
            parse(r#"{"success": true, "result": {"found": true}}"#),
            Availability::Unavailable
        );
    }

    #[test]
    fn test_missing_found_counts_as_registered() {
        assert_eq!(parse(r#"{"success": true, "result": {}}"#), Availability::Unavailable);
        assert_eq!(parse(r#"{"success": true}"#), Availability::Unavailable);
    }

    #[test]
    fn test_api_failure_is_unknown() {
        assert_eq!(
            parse(r#"{"success": false, "errors": [{"code": 10000, "message": "Authentication error"}]}"#),
            Availability::Unknown
        );
    }

    #[test]
    fn test_whois_url_and_redaction() {
        let config = RegistrarConfig {
            api_token: Some("cf-token".to_string()),
            account_id: Some("acct123".to_string()),
        };
        let registrar = CloudflareRegistrar::new(reqwest::Client::new(), &config).unwrap();
        let url = registrar.whois_url("zynk.com").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acct123/intel/whois?domain=zynk.com"
        );
        assert!(!format!("{:?}", registrar).contains("cf-token"));
    }
}
