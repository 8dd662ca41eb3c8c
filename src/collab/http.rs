//! Collaborators over HTTP, DNS and the LLM provider

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{Collaborators, dns, registrar::CloudflareRegistrar};
use crate::ai::{ResponseSchema, SharedProvider, TimeoutConfig, with_timeout};
use crate::config::Config;
use crate::constants::{endpoints, network};
use crate::types::{Availability, Result, SocialPlatform, TermError};

/// Production collaborators
pub struct HttpCollaborators {
    client: reqwest::Client,
    llm: SharedProvider,
    registrar: CloudflareRegistrar,
    timeouts: TimeoutConfig,
}

impl HttpCollaborators {
    pub fn new(config: &Config, llm: SharedProvider) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(network::USER_AGENT)
            .build()
            .map_err(|e| TermError::Config(format!("Failed to create HTTP client: {}", e)))?;
        let registrar = CloudflareRegistrar::new(client.clone(), &config.registrar)?;

        Ok(Self {
            client,
            llm,
            registrar,
            timeouts: TimeoutConfig::with_llm_secs(config.llm.timeout_secs),
        })
    }

    /// GET `url` and return the status code
    async fn probe_status(&self, url: &str, timeout: Duration) -> Result<u16> {
        let request = self.client.get(url).send();
        let response =
            with_timeout(timeout, async { Ok::<_, TermError>(request.await?) }, url).await?;
        Ok(response.status().as_u16())
    }

    async fn probe_availability(&self, url: &str, what: &str) -> Availability {
        match self.probe_status(url, self.timeouts.probe).await {
            Ok(status) => {
                let availability = Availability::from_http_status(status);
                debug!("{} probe {} -> {} ({})", what, url, availability, status);
                availability
            }
            Err(e) => {
                warn!("{} probe failed [{}]: {}", what, e.category(), e);
                Availability::Unknown
            }
        }
    }

    async fn get_text(&self, url: Url, timeout: Duration, operation: &str) -> Result<String> {
        let request = self.client.get(url).send();
        with_timeout(
            timeout,
            async {
                let response = request.await?.error_for_status()?;
                Ok::<_, TermError>(response.text().await?)
            },
            operation,
        )
        .await
    }
}

#[async_trait]
impl Collaborators for HttpCollaborators {
    async fn translate(&self, word: &str, language_code: &str) -> Option<String> {
        let url = translate_url(word, language_code).ok()?;
        let result = self
            .get_text(url, self.timeouts.translate, "translate")
            .await
            .and_then(|body| Ok(serde_json::from_str::<Value>(&body)?));

        match result {
            Ok(body) => {
                let translated = parse_translate_response(&body);
                if translated.is_none() {
                    debug!("Translate {} -> {}: unexpected response shape", word, language_code);
                }
                translated
            }
            Err(e) => {
                warn!(
                    "Translate {} -> {} failed [{}]: {}",
                    word,
                    language_code,
                    e.category(),
                    e
                );
                None
            }
        }
    }

    async fn llm_complete(&self, prompt: &str, schema: &ResponseSchema) -> Option<Value> {
        match with_timeout(
            self.timeouts.llm_request,
            self.llm.generate(prompt, schema),
            "llm request",
        )
        .await
        {
            Ok(response) => {
                debug!(
                    "LLM {} answered in {}ms ({} tokens)",
                    schema.name,
                    response.elapsed_ms,
                    response.usage.total()
                );
                Some(response.content)
            }
            Err(e) => {
                warn!("LLM {} request failed [{}]: {}", schema.name, e.category(), e);
                None
            }
        }
    }

    async fn dns_resolves(&self, domain: &str) -> bool {
        dns::resolves(domain, self.timeouts.dns).await
    }

    async fn whois_lookup(&self, domain: &str) -> Availability {
        match with_timeout(self.timeouts.whois, self.registrar.lookup(domain), "whois").await {
            Ok(availability) => availability,
            Err(e) => {
                warn!("WHOIS {} failed [{}]: {}", domain, e.category(), e);
                Availability::Unknown
            }
        }
    }

    async fn npm_package_availability(&self, name: &str) -> Availability {
        let url = format!("{}/{}", endpoints::NPM_REGISTRY_URL, name);
        self.probe_availability(&url, "npm").await
    }

    async fn social_handle_availability(
        &self,
        platform: SocialPlatform,
        handle: &str,
    ) -> Availability {
        self.probe_availability(&platform.profile_url(handle), platform.name())
            .await
    }

    async fn fetch_search_results_html(&self, query: &str) -> Option<String> {
        let url = Url::parse_with_params(endpoints::SEARCH_URL, &[("q", query)]).ok()?;
        match self.get_text(url, self.timeouts.search, "search").await {
            Ok(html) => {
                debug!("Search page for {}: {} bytes", query, html.len());
                Some(html)
            }
            Err(e) => {
                warn!("Search fetch for {} failed [{}]: {}", query, e.category(), e);
                None
            }
        }
    }
}

fn translate_url(word: &str, language_code: &str) -> Result<Url> {
    Url::parse_with_params(
        endpoints::TRANSLATE_URL,
        &[
            ("client", "gtx"),
            ("sl", "en"),
            ("tl", language_code),
            ("dt", "t"),
            ("q", word),
        ],
    )
    .map_err(|e| TermError::Config(format!("Invalid translate URL: {}", e)))
}

/// The translate endpoint answers with nested arrays; the first segment's
/// text is at `[0][0][0]`.
fn parse_translate_response(body: &Value) -> Option<String> {
    body.get(0)?
        .get(0)?
        .get(0)?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_translate_response() {
        let body = json!([[["Wolke", "cloud", null, null, 10]], null, "en"]);
        assert_eq!(parse_translate_response(&body).as_deref(), Some("Wolke"));
    }

    #[test]
    fn test_parse_translate_unexpected_shape() {
        assert_eq!(parse_translate_response(&json!({"error": "x"})), None);
        assert_eq!(parse_translate_response(&json!([[]])), None);
        assert_eq!(parse_translate_response(&json!([[[42]]])), None);
    }

    #[test]
    fn test_translate_url() {
        let url = translate_url("cloud", "de").unwrap();
        assert_eq!(url.host_str(), Some("translate.google.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("tl".to_string(), "de".to_string())));
        assert!(pairs.contains(&("q".to_string(), "cloud".to_string())));
        assert!(pairs.contains(&("sl".to_string(), "en".to_string())));
    }
}
