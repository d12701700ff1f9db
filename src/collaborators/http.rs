//! HTTP fetcher shared by the network collaborators
//!
//! Features:
//! - Rate limiting with governor
//! - A single fixed-delay retry on HTTP 429
//! - `404 Not Found` reported as `Ok(None)` so callers can map it to "no record"

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::time::Duration;
use url::Url;

use crate::config::HttpConfig;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_rate_limit_retry, RateLimitRetry};
use crate::utils::truncate_text;

/// Rate-limited HTTP client
pub struct HttpFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Retry policy for rate-limited responses
    retry: RateLimitRetry,
}

impl HttpFetcher {
    /// Create a new fetcher
    ///
    /// # Arguments
    ///
    /// * `requests_per_second` - Maximum number of requests per second
    /// * `timeout` - Request timeout duration
    /// * `user_agent` - User-Agent header value
    /// * `retry` - Rate-limit retry policy
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(
        requests_per_second: u32,
        timeout: Duration,
        user_agent: &str,
        retry: RateLimitRetry,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            retry,
        })
    }

    /// Create a fetcher from the `[http]` configuration section
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn from_config(config: &HttpConfig) -> Result<Self, FetchError> {
        Self::new(
            config.requests_per_second,
            Duration::from_secs(config.request_timeout_secs),
            &config.user_agent,
            RateLimitRetry::from_secs(config.rate_limit_retry_delay_secs),
        )
    }

    /// Fetch a URL as text; `Ok(None)` on 404
    ///
    /// # Errors
    ///
    /// Returns `FetchError::RateLimit` if still rate limited after the retry,
    /// `FetchError::ServerError` for other non-success statuses
    pub async fn get_text(&self, url: &Url) -> Result<Option<String>, FetchError> {
        with_rate_limit_retry(&self.retry, || self.attempt(url, "text/html,*/*;q=0.8")).await
    }

    /// Fetch a URL and decode its JSON body; `Ok(None)` on 404
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_text`], plus `FetchError::Decode` for invalid JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>, FetchError> {
        let body =
            with_rate_limit_retry(&self.retry, || self.attempt(url, "application/json")).await?;

        body.map(|text| {
            serde_json::from_str(&text)
                .map_err(|e| FetchError::Decode(format!("{e} in {:?}", truncate_text(&text, 80))))
        })
        .transpose()
    }

    /// A single rate-limited request
    async fn attempt(&self, url: &Url, accept: &'static str) -> Result<Option<String>, FetchError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %redact(url), "Sending request");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.text().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimit),
            status => Err(FetchError::ServerError(status.as_u16())),
        }
    }
}

/// URL with credential-looking query parameters masked, for logging
pub fn redact(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let lowered = k.to_lowercase();
            if lowered.contains("key") || lowered.contains("token") {
                (k.into_owned(), String::from("***"))
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();

    if !pairs.is_empty() {
        masked.query_pairs_mut().clear().extend_pairs(pairs);
    }

    masked.to_string()
}

/// Join a base URL and a path, tolerating a trailing slash on the base
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` if the result does not parse
pub fn endpoint(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
    let raw = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    let url = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, params)
    };

    url.map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
}
