//! News headline sentiment via NewsAPI
//!
//! Headlines come from `GET {base}/v2/everything?q={company}&apiKey={key}`
//! and are scored locally by [`HeadlineScorer`].

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use super::http::{endpoint, HttpFetcher};
use super::SentimentSource;
use crate::analytics::HeadlineScorer;
use crate::metrics;
use crate::utils::error::FetchError;

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
}

/// NewsAPI client producing per-headline sentiment scores
pub struct NewsApiClient {
    fetcher: Arc<HttpFetcher>,
    base_url: String,
    api_key: Option<String>,
    scorer: HeadlineScorer,
}

impl NewsApiClient {
    pub fn new(fetcher: Arc<HttpFetcher>, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_key,
            scorer: HeadlineScorer::default(),
        }
    }

    /// Headlines mentioning `query`, in the order the API returns them
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotConfigured` without an API key, otherwise any
    /// fetch or decode failure
    pub async fn fetch_headlines(&self, query: &str) -> Result<Vec<String>, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| FetchError::NotConfigured(String::from("news API key")))?;

        let url = endpoint(
            &self.base_url,
            "v2/everything",
            &[("q", query), ("apiKey", api_key)],
        )?;

        let response: Option<EverythingResponse> = self.fetcher.get_json(&url).await?;

        let headlines: Vec<String> = response
            .map(|r| r.articles)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.title)
            .filter(|t| !t.trim().is_empty())
            .collect();

        tracing::debug!(query, count = headlines.len(), "Fetched headlines");
        Ok(headlines)
    }
}

#[async_trait]
impl SentimentSource for NewsApiClient {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch_sentiment(&self, query: &str) -> Result<Vec<f64>, FetchError> {
        let start = Instant::now();
        let result = self.fetch_headlines(query).await;
        metrics::observe_collaborator(self.name(), start.elapsed());

        let headlines = result?;
        Ok(self.scorer.score_all(headlines.iter().map(String::as_str)))
    }
}
