use super::types::{WebSearchParams, WebSearchResponse};
use crate::config::Config;
use crate::error::{Result, SearchError};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::warn;

const CONNECT_TIMEOUT: u64 = 10;
const RETRY_BASE: Duration = Duration::from_secs(1);
const RETRY_MAX_WAIT: Duration = Duration::from_secs(10);
const SUBSCRIPTION_TOKEN: &str = "x-subscription-token";

#[derive(Debug, Clone)]
pub struct BraveClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
    max_retries: u32,
    retry_base: Duration,
    default_country: String,
    default_search_lang: String,
    default_ui_lang: String,
}

impl BraveClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut token = HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| SearchError::ConfigInvalid("API key contains invalid header characters".into()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(SUBSCRIPTION_TOKEN, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("brave-search-mcp/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            retry_base: RETRY_BASE,
            default_country: config.default_country.clone(),
            default_search_lang: config.default_search_lang.clone(),
            default_ui_lang: config.default_ui_lang.clone(),
        })
    }

    #[cfg(test)]
    fn with_retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    pub async fn web_search(&self, query: &str, params: &WebSearchParams) -> Result<WebSearchResponse> {
        let url = format!("{}/web/search", self.base_url);
        let pairs = self.query_pairs(query, params);

        let mut attempt = 0;
        loop {
            match self.try_request(&url, &pairs).await {
                Ok(resp) => return Ok(resp),
                Err(e) if !is_retryable(&e) => return Err(e),
                Err(e) if attempt >= self.max_retries => {
                    if self.max_retries == 0 {
                        return Err(e);
                    }
                    return Err(SearchError::MaxRetries { attempts: attempt + 1, last_error: e.to_string() });
                }
                Err(e) => {
                    let delay = self.backoff(attempt);
                    warn!(
                        error = %e,
                        "Brave API error, retrying in {:?} (attempt {}/{})",
                        delay,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn query_pairs(&self, query: &str, params: &WebSearchParams) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", query.to_string()),
            ("count", params.count.to_string()),
            ("offset", params.offset.to_string()),
            ("safesearch", params.safe_search.as_param().to_string()),
            ("spellcheck", params.spellcheck.to_string()),
        ];
        if let Some(freshness) = params.freshness {
            pairs.push(("freshness", freshness.as_param().to_string()));
        }

        let country = params.country.as_deref().unwrap_or(&self.default_country);
        let search_lang = params.search_lang.as_deref().unwrap_or(&self.default_search_lang);
        let ui_lang = params.ui_lang.as_deref().unwrap_or(&self.default_ui_lang);
        for (key, value) in [("country", country), ("search_lang", search_lang), ("ui_lang", ui_lang)] {
            if !value.is_empty() {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }

    async fn try_request(&self, url: &str, pairs: &[(&'static str, String)]) -> Result<WebSearchResponse> {
        let resp = self.client.get(url).query(pairs).send().await.map_err(|e| self.map_err(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(SearchError::Api { status, message });
        }

        let body = resp.bytes().await.map_err(|e| self.map_err(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn map_err(&self, e: reqwest::Error) -> SearchError {
        if e.is_timeout() { SearchError::Timeout(self.timeout_secs) } else { SearchError::Http(e) }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.retry_base.as_secs_f64() * 2f64.powi(attempt as i32);
        let capped = base.min(RETRY_MAX_WAIT.as_secs_f64());
        let jitter = rand::thread_rng().gen_range(0.9..=1.1);
        Duration::from_secs_f64(capped * jitter)
    }
}

fn is_retryable(e: &SearchError) -> bool {
    match e {
        SearchError::Timeout(_) => true,
        SearchError::Http(e) => e.is_timeout() || e.is_connect(),
        SearchError::Api { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
        _ => false,
    }
}
