//! Common test utilities
//!
//! In-memory collaborators for driving the pipeline without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use ipolens::analytics::{compare, ImpactScorer};
use ipolens::collaborators::{MarketDataSource, SentimentSource, TextExtractor, TickerResolver};
use ipolens::error::{ExtractionError, FetchError};
use ipolens::models::{
    AnalysisResult, CompanyIdentity, CompetitorRecord, KeywordCount, MarketQuote, MarketRecord,
    PerformanceTrend, PipelineState, SentimentScore,
};

/// Extractor returning fixed text, or `NotFound` when built with `missing()`
pub struct FakeExtractor {
    text: Option<String>,
}

impl FakeExtractor {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn missing() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        self.text
            .clone()
            .ok_or_else(|| ExtractionError::NotFound(path.to_path_buf()))
    }
}

/// Sentiment source with canned polarities, optional delay and a call counter
pub struct FakeSentiment {
    polarities: Option<Vec<f64>>,
    delay: Duration,
    pub calls: AtomicU32,
}

impl FakeSentiment {
    pub fn scores(polarities: Vec<f64>) -> Self {
        Self {
            polarities: Some(polarities),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    /// Always fails with a 503
    pub fn failing() -> Self {
        Self {
            polarities: None,
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SentimentSource for FakeSentiment {
    fn name(&self) -> &'static str {
        "fake_news"
    }

    async fn fetch_sentiment(&self, _query: &str) -> Result<Vec<f64>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.polarities.clone().ok_or(FetchError::ServerError(503))
    }
}

/// Resolver outcomes
pub enum FakeResolver {
    Found(CompanyIdentity),
    NotFound,
    Failing,
}

impl FakeResolver {
    pub fn ticker(ticker: &str) -> Self {
        Self::Found(CompanyIdentity {
            ticker: ticker.to_string(),
            sector: Some(String::from("Consumer Cyclical")),
        })
    }
}

#[async_trait]
impl TickerResolver for FakeResolver {
    fn name(&self) -> &'static str {
        "fake_search"
    }

    async fn resolve(&self, _company_name: &str) -> Result<Option<CompanyIdentity>, FetchError> {
        match self {
            Self::Found(identity) => Ok(Some(identity.clone())),
            Self::NotFound => Ok(None),
            Self::Failing => Err(FetchError::RateLimit),
        }
    }
}

/// Market source remembering the identifier it was asked for
pub struct FakeMarket {
    outcome: MarketOutcome,
    delay: Duration,
    pub requested: Mutex<Vec<String>>,
}

enum MarketOutcome {
    Record(Vec<CompetitorRecord>, MarketQuote),
    NoRecord,
    Failing,
}

impl FakeMarket {
    pub fn competitors(records: Vec<CompetitorRecord>) -> Self {
        Self::build(MarketOutcome::Record(records, MarketQuote::default()))
    }

    pub fn with_quote(records: Vec<CompetitorRecord>, quote: MarketQuote) -> Self {
        Self::build(MarketOutcome::Record(records, quote))
    }

    pub fn no_record() -> Self {
        Self::build(MarketOutcome::NoRecord)
    }

    pub fn failing() -> Self {
        Self::build(MarketOutcome::Failing)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn build(outcome: MarketOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MarketDataSource for FakeMarket {
    fn name(&self) -> &'static str {
        "fake_market"
    }

    async fn fetch_market_data(
        &self,
        identifier: &str,
    ) -> Result<Option<MarketRecord>, FetchError> {
        self.requested.lock().unwrap().push(identifier.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.outcome {
            MarketOutcome::Record(competitors, quote) => Ok(Some(MarketRecord {
                identifier: identifier.to_string(),
                quote: quote.clone(),
                competitors: competitors.clone(),
            })),
            MarketOutcome::NoRecord => Ok(None),
            MarketOutcome::Failing => Err(FetchError::Timeout),
        }
    }
}

/// The five-competitor table used as the default static configuration
pub fn mock_competitors() -> Vec<CompetitorRecord> {
    vec![
        CompetitorRecord::new("Competitor A", 30.0, PerformanceTrend::Growing),
        CompetitorRecord::new("Competitor B", 25.0, PerformanceTrend::Stable),
        CompetitorRecord::new("Competitor C", 20.0, PerformanceTrend::Declining),
        CompetitorRecord::new("Competitor D", 15.0, PerformanceTrend::Growing),
        CompetitorRecord::new("Competitor E", 10.0, PerformanceTrend::Stable),
    ]
}

/// A completed analysis result for report tests
pub fn create_test_result(company_name: &str) -> AnalysisResult {
    let counts = KeywordCount::from_pairs([
        ("revenue", 20),
        ("growth", 15),
        ("debt", 2),
        ("profit", 18),
        ("competitive", 10),
    ])
    .unwrap();
    let sentiment = SentimentScore::new(0.5);
    let scored = ImpactScorer::new().score(&counts, sentiment);

    AnalysisResult {
        run_id: Uuid::new_v4(),
        company_name: company_name.to_string(),
        identity: Some(CompanyIdentity {
            ticker: String::from("ACME.NS"),
            sector: None,
        }),
        quote: None,
        impact_table: scored.table,
        sentiment,
        mean_impact: scored.mean_impact,
        conclusion: scored.conclusion,
        competitors: compare(mock_competitors()),
        degradations: Vec::new(),
        transitions: vec![
            PipelineState::Extracting,
            PipelineState::Counting,
            PipelineState::Sentiment,
            PipelineState::Scoring,
            PipelineState::CompetitorComparison,
            PipelineState::Done,
        ],
        generated_at: Utc::now(),
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
