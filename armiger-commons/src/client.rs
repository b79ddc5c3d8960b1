use crate::error::{HarvestError, Result};
use crate::pace::{self, DEFAULT_NAP_MS};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Production endpoint for the Wikimedia Commons MediaWiki API.
pub const COMMONS_API: &str = "https://commons.wikimedia.org/w/api.php";

/// Fallback contact baked into the User-Agent when the caller provides none.
/// Wikimedia asks every API consumer to identify itself with a way to reach
/// the operator.
pub const DEFAULT_CONTACT: &str = "https://github.com/halbard/armiger";

const API_ATTEMPTS: u32 = 5;
const DOWNLOAD_ATTEMPTS: u32 = 4;
const RETRYABLE: [u16; 5] = [429, 500, 502, 503, 504];

fn is_retryable(status: u16) -> bool {
    RETRYABLE.contains(&status)
}

/// HTTP client for the Commons API and its upload servers.
///
/// Wraps a pooled `reqwest::Client` with the retry, pacing and User-Agent
/// conventions Wikimedia expects from batch consumers. All knobs have
/// production defaults; tests shrink the pacing and backoff to keep runs fast.
pub struct CommonsClient {
    client: Client,
    api_url: String,
    politeness_ms: RangeInclusive<u64>,
    backoff_base: Duration,
}

impl CommonsClient {
    pub fn new() -> Self {
        Self::with_contact(DEFAULT_CONTACT)
    }

    pub fn with_contact(contact: &str) -> Self {
        let client = Client::builder()
            .user_agent(format!(
                "Armiger/{} ({}) reqwest",
                env!("CARGO_PKG_VERSION"),
                contact
            ))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(15))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: COMMONS_API.to_string(),
            politeness_ms: DEFAULT_NAP_MS,
            backoff_base: Duration::from_secs(1),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_politeness_ms(mut self, range: RangeInclusive<u64>) -> Self {
        self.politeness_ms = range;
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Random delay between remote calls so batch runs stay friendly to the
    /// shared API servers.
    pub async fn nap(&self) {
        pace::jitter_sleep(&self.politeness_ms).await;
    }

    async fn backoff(&self, attempt: u32) {
        tokio::time::sleep(self.backoff_base * attempt).await;
    }

    /// GET the API endpoint with `params` and decode the JSON body.
    ///
    /// Retries up to five times with a linearly growing wait on throttle and
    /// server errors (429/5xx), on responses that are not JSON (block pages
    /// and maintenance interstitials come back as HTML with status 200), on
    /// decode failures and on network errors.
    pub async fn get_json<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        for attempt in 1..=API_ATTEMPTS {
            match self.client.get(&self.api_url).query(params).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if is_retryable(status) {
                        warn!(
                            "API returned HTTP {}, waiting before retry ({}/{})",
                            status, attempt, API_ATTEMPTS
                        );
                        self.backoff(attempt).await;
                        continue;
                    }

                    let content_type = response
                        .headers()
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    if !content_type.contains("application/json") {
                        let body = response.text().await.unwrap_or_default();
                        let snippet: String = body
                            .chars()
                            .take(200)
                            .collect::<String>()
                            .replace(['\n', '\r'], " ");
                        warn!(
                            "non-JSON API response (content-type {:?}): {} ({}/{})",
                            content_type, snippet, attempt, API_ATTEMPTS
                        );
                        self.backoff(attempt).await;
                        continue;
                    }

                    match response.json::<T>().await {
                        Ok(parsed) => return Ok(parsed),
                        Err(e) => {
                            warn!("JSON decode failed: {} ({}/{})", e, attempt, API_ATTEMPTS);
                            self.backoff(attempt).await;
                        }
                    }
                }
                Err(e) => {
                    warn!("API request failed: {} ({}/{})", e, attempt, API_ATTEMPTS);
                    self.backoff(attempt).await;
                }
            }
        }

        Err(HarvestError::RetriesExhausted {
            what: "Commons API query".to_string(),
            attempts: API_ATTEMPTS,
        })
    }

    /// GET an asset URL and return the response body.
    ///
    /// Up to four attempts. Throttle/server errors and network failures are
    /// retried with a linearly growing wait; a 403 is fatal immediately (it
    /// means the User-Agent is unacceptable, retrying cannot fix it), as is
    /// any other unexpected status.
    pub async fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let target = Url::parse(url).map_err(|_| HarvestError::InvalidUrl(url.to_string()))?;

        for attempt in 1..=DOWNLOAD_ATTEMPTS {
            let request = self
                .client
                .get(target.clone())
                .timeout(Duration::from_secs(60));
            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 200 {
                        match response.bytes().await {
                            Ok(bytes) => {
                                debug!("downloaded {} bytes from {}", bytes.len(), url);
                                return Ok(bytes.to_vec());
                            }
                            Err(e) => {
                                warn!(
                                    "download body read failed: {} ({}/{})",
                                    e, attempt, DOWNLOAD_ATTEMPTS
                                );
                                self.backoff(attempt).await;
                                continue;
                            }
                        }
                    }
                    if is_retryable(status) {
                        warn!(
                            "download hit HTTP {}, waiting before retry ({}/{})",
                            status, attempt, DOWNLOAD_ATTEMPTS
                        );
                        self.backoff(attempt).await;
                        continue;
                    }
                    if status == 403 {
                        return Err(HarvestError::Forbidden {
                            url: url.to_string(),
                        });
                    }
                    return Err(HarvestError::BadStatus {
                        status,
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        "download network error: {} ({}/{})",
                        e, attempt, DOWNLOAD_ATTEMPTS
                    );
                    self.backoff(attempt).await;
                }
            }
        }

        Err(HarvestError::RetriesExhausted {
            what: format!("download of {}", url),
            attempts: DOWNLOAD_ATTEMPTS,
        })
    }
}

impl Default for CommonsClient {
    fn default() -> Self {
        Self::new()
    }
}
