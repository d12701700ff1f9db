//! External collaborators consumed by the pipeline
//!
//! Each capability the pipeline needs from the outside world sits behind a
//! trait so that real network clients and test fakes are interchangeable:
//!
//! - [`TextExtractor`]: prospectus document to plain text
//! - [`SentimentSource`]: headline polarity scores for a company
//! - [`TickerResolver`]: company name to ticker and sector
//! - [`MarketDataSource`]: quote and competitor data for an identifier
//!
//! Credentials and endpoints are injected by the caller; nothing here reads
//! the environment.

pub mod extract;
pub mod http;
pub mod market;
pub mod news;
pub mod screener;

use async_trait::async_trait;
use std::path::Path;

use crate::models::{CompanyIdentity, MarketRecord};
use crate::utils::error::{ExtractionError, FetchError};

pub use extract::FileTextExtractor;
pub use http::HttpFetcher;
pub use market::{FixedResolver, StaticMarketData, YahooSearchResolver};
pub use news::NewsApiClient;
pub use screener::ScreenerClient;

/// Turns a document into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of the document at `path`
    async fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Produces polarity scores in [-1.0, 1.0] for recent headlines about a company
#[async_trait]
pub trait SentimentSource: Send + Sync {
    /// Collaborator name used in logs and metrics
    fn name(&self) -> &'static str;

    /// One score per headline; an empty list means no headlines were found
    async fn fetch_sentiment(&self, query: &str) -> Result<Vec<f64>, FetchError>;
}

/// Looks up the ticker for a company name
#[async_trait]
pub trait TickerResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the lookup succeeded but found nothing
    async fn resolve(&self, company_name: &str) -> Result<Option<CompanyIdentity>, FetchError>;
}

/// Fetches quote and competitor data for a ticker or company identifier
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the source has no record for the identifier
    async fn fetch_market_data(&self, identifier: &str)
        -> Result<Option<MarketRecord>, FetchError>;
}
