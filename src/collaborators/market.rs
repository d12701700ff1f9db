//! Ticker resolution and static market data

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use super::http::{endpoint, HttpFetcher};
use super::{MarketDataSource, TickerResolver};
use crate::metrics;
use crate::models::{CompanyIdentity, CompetitorRecord, MarketRecord};
use crate::utils::error::FetchError;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Debug, Deserialize)]
struct SearchQuote {
    symbol: Option<String>,
    #[serde(default)]
    sector: Option<String>,
}

/// Resolves company names through the Yahoo Finance search endpoint
///
/// The first quote with a symbol wins.
pub struct YahooSearchResolver {
    fetcher: Arc<HttpFetcher>,
    base_url: String,
}

impl YahooSearchResolver {
    pub fn new(fetcher: Arc<HttpFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    async fn search(&self, company_name: &str) -> Result<Option<CompanyIdentity>, FetchError> {
        let url = endpoint(&self.base_url, "v1/finance/search", &[("q", company_name)])?;
        let response: Option<SearchResponse> = self.fetcher.get_json(&url).await?;

        let identity = response
            .map(|r| r.quotes)
            .unwrap_or_default()
            .into_iter()
            .find_map(|quote| {
                let ticker = quote.symbol.filter(|s| !s.trim().is_empty())?;
                Some(CompanyIdentity {
                    ticker,
                    sector: quote.sector,
                })
            });

        Ok(identity)
    }
}

#[async_trait]
impl TickerResolver for YahooSearchResolver {
    fn name(&self) -> &'static str {
        "yahoo_search"
    }

    async fn resolve(&self, company_name: &str) -> Result<Option<CompanyIdentity>, FetchError> {
        let start = Instant::now();
        let result = self.search(company_name).await;
        metrics::observe_collaborator(self.name(), start.elapsed());

        if let Ok(Some(identity)) = &result {
            tracing::debug!(company = company_name, ticker = %identity.ticker, "Resolved ticker");
        }
        result
    }
}

/// Resolver that always answers with a ticker chosen up front
#[derive(Debug, Clone)]
pub struct FixedResolver {
    identity: CompanyIdentity,
}

impl FixedResolver {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            identity: CompanyIdentity {
                ticker: ticker.into(),
                sector: None,
            },
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.identity.sector = Some(sector.into());
        self
    }
}

#[async_trait]
impl TickerResolver for FixedResolver {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn resolve(&self, _company_name: &str) -> Result<Option<CompanyIdentity>, FetchError> {
        Ok(Some(self.identity.clone()))
    }
}

/// Market source backed by a configured competitor table
///
/// Returns the same competitors for every identifier and no quote.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    competitors: Vec<CompetitorRecord>,
}

impl StaticMarketData {
    pub fn new(competitors: Vec<CompetitorRecord>) -> Self {
        Self { competitors }
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketData {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_market_data(
        &self,
        identifier: &str,
    ) -> Result<Option<MarketRecord>, FetchError> {
        Ok(Some(MarketRecord {
            identifier: identifier.to_string(),
            competitors: self.competitors.clone(),
            ..Default::default()
        }))
    }
}
