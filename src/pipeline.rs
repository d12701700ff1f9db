//! Profitability pipeline
//!
//! Drives one analysis from prospectus document to [`AnalysisResult`]:
//!
//! ```text
//! Extracting → Counting → [Resolving] → Sentiment → Scoring → [CompetitorComparison] → Done
//!                 any fatal failure ─────────────────────────────────────────────→ Aborted
//! ```
//!
//! `Resolving` runs only when a ticker resolver is configured and
//! `CompetitorComparison` only when a market-data source is configured.
//! Sentiment and market data are fetched concurrently during `Sentiment`;
//! scoring starts once both have completed.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use crate::analytics::{aggregate, compare, ImpactScorer, KeywordCounter};
use crate::collaborators::{MarketDataSource, SentimentSource, TextExtractor, TickerResolver};
use crate::error::{Error, Result};
use crate::metrics;
use crate::models::{
    AnalysisResult, CompanyIdentity, CompetitorSnapshot, KeywordVocabulary, MarketRecord,
    PipelineState, SentimentScore,
};

pub use crate::error::{EnrichmentSource, EnrichmentUnavailable};

/// Terminal outcome of a pipeline run
#[derive(Debug)]
pub enum PipelineOutcome {
    /// All required stages completed; enrichments may have degraded
    Done(Box<AnalysisResult>),

    /// A required stage failed; no result was produced
    Aborted {
        run_id: Uuid,
        /// Stage that failed
        stage: PipelineState,
        error: Error,
        transitions: Vec<PipelineState>,
    },
}

impl PipelineOutcome {
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// The result, if the run completed
    #[must_use]
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Done(result) => Some(result.as_ref()),
            Self::Aborted { .. } => None,
        }
    }

    /// States visited, ending in `Done` or `Aborted`
    #[must_use]
    pub fn transitions(&self) -> &[PipelineState] {
        match self {
            Self::Done(result) => &result.transitions,
            Self::Aborted { transitions, .. } => transitions,
        }
    }

    /// Convert into a `Result`, turning an abort into its error
    pub fn into_result(self) -> Result<AnalysisResult> {
        match self {
            Self::Done(result) => Ok(*result),
            Self::Aborted { error, .. } => Err(error),
        }
    }
}

/// Tracks the current stage and the ordered list of states visited
struct StateTracker {
    current: PipelineState,
    visited: Vec<PipelineState>,
}

impl StateTracker {
    fn new() -> Self {
        info!(state = %PipelineState::Extracting, "Pipeline state");
        Self {
            current: PipelineState::Extracting,
            visited: vec![PipelineState::Extracting],
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.current.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.current
        );
        info!(from = %self.current, to = %next, "Pipeline state");
        self.current = next;
        self.visited.push(next);
    }
}

/// Builder for [`ProfitabilityPipeline`]
pub struct PipelineBuilder {
    vocabulary: KeywordVocabulary,
    extractor: Arc<dyn TextExtractor>,
    resolver: Option<Arc<dyn TickerResolver>>,
    sentiment: Option<Arc<dyn SentimentSource>>,
    market: Option<Arc<dyn MarketDataSource>>,
}

impl PipelineBuilder {
    pub fn vocabulary(mut self, vocabulary: KeywordVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Resolve a ticker before enrichment; a failed lookup aborts the run
    pub fn resolver(mut self, resolver: Arc<dyn TickerResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn sentiment_source(mut self, source: Arc<dyn SentimentSource>) -> Self {
        self.sentiment = Some(source);
        self
    }

    pub fn market_source(mut self, source: Arc<dyn MarketDataSource>) -> Self {
        self.market = Some(source);
        self
    }

    /// # Errors
    ///
    /// Returns `Error::Config` if a vocabulary term cannot be compiled
    pub fn build(self) -> Result<ProfitabilityPipeline> {
        Ok(ProfitabilityPipeline {
            counter: KeywordCounter::new(self.vocabulary)?,
            scorer: ImpactScorer::new(),
            extractor: self.extractor,
            resolver: self.resolver,
            sentiment: self.sentiment,
            market: self.market,
        })
    }
}

/// Single parameterized pipeline with injected collaborators
pub struct ProfitabilityPipeline {
    counter: KeywordCounter,
    scorer: ImpactScorer,
    extractor: Arc<dyn TextExtractor>,
    resolver: Option<Arc<dyn TickerResolver>>,
    sentiment: Option<Arc<dyn SentimentSource>>,
    market: Option<Arc<dyn MarketDataSource>>,
}

impl ProfitabilityPipeline {
    /// Start building a pipeline around a text extractor
    pub fn builder(extractor: Arc<dyn TextExtractor>) -> PipelineBuilder {
        PipelineBuilder {
            vocabulary: KeywordVocabulary::default(),
            extractor,
            resolver: None,
            sentiment: None,
            market: None,
        }
    }

    pub fn vocabulary(&self) -> &KeywordVocabulary {
        self.counter.vocabulary()
    }

    /// Analyze one prospectus for the named IPO
    pub async fn run(&self, document: &Path, company_name: &str) -> PipelineOutcome {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", %run_id, company = company_name);

        let outcome = self
            .run_inner(run_id, document, company_name)
            .instrument(span)
            .await;

        match &outcome {
            PipelineOutcome::Done(result) => {
                metrics::record_run(if result.is_degraded() { "degraded" } else { "done" });
                metrics::record_mean_impact(result.mean_impact);
            }
            PipelineOutcome::Aborted { .. } => metrics::record_run("aborted"),
        }

        outcome
    }

    async fn run_inner(&self, run_id: Uuid, document: &Path, company_name: &str) -> PipelineOutcome {
        let mut state = StateTracker::new();

        let abort = |mut state: StateTracker, error: Error| {
            let stage = state.current;
            error!(stage = %stage, error = %error, "Pipeline aborted");
            state.advance(PipelineState::Aborted);
            PipelineOutcome::Aborted {
                run_id,
                stage,
                error,
                transitions: state.visited,
            }
        };

        // Extracting
        let start = Instant::now();
        let text = match self.extractor.extract_text(document).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %e.path().display(), "Document could not be extracted");
                return abort(state, Error::Extraction(e));
            }
        };
        metrics::observe_collaborator("extractor", start.elapsed());

        // Counting
        state.advance(PipelineState::Counting);
        let counts = self.counter.count(&text);
        debug!(total = counts.total(), terms = counts.len(), "Counted keywords");

        // Resolving
        let identity = match &self.resolver {
            Some(resolver) => {
                state.advance(PipelineState::Resolving);
                match self.resolve(resolver.as_ref(), company_name).await {
                    Ok(identity) => Some(identity),
                    Err(e) => return abort(state, e),
                }
            }
            None => None,
        };
        let identifier = identity
            .as_ref()
            .map_or(company_name, |i| i.ticker.as_str());

        // Sentiment, with market data fetched alongside
        state.advance(PipelineState::Sentiment);
        let mut degradations = Vec::new();

        let (sentiment, market) = futures::join!(
            self.fetch_sentiment(company_name),
            self.fetch_market(identifier)
        );

        let sentiment = sentiment.unwrap_or_else(|degraded| {
            degradations.push(degraded);
            SentimentScore::NEUTRAL
        });
        let market = market.unwrap_or_else(|degraded| {
            degradations.push(degraded);
            None
        });

        // Scoring
        state.advance(PipelineState::Scoring);
        let scored = self.scorer.score(&counts, sentiment);
        info!(
            mean_impact = scored.mean_impact,
            conclusion = %scored.conclusion,
            "Scored impact"
        );

        // CompetitorComparison
        let (quote, competitors) = if self.market.is_some() {
            state.advance(PipelineState::CompetitorComparison);
            match market {
                Some(record) => {
                    let quote = Some(record.quote).filter(|q| !q.is_empty());
                    (quote, compare(record.competitors))
                }
                None => (None, CompetitorSnapshot::default()),
            }
        } else {
            (None, CompetitorSnapshot::default())
        };

        for degraded in &degradations {
            metrics::record_fallback(degraded.kind);
        }

        state.advance(PipelineState::Done);

        PipelineOutcome::Done(Box::new(AnalysisResult {
            run_id,
            company_name: company_name.to_string(),
            identity,
            quote,
            impact_table: scored.table,
            sentiment,
            mean_impact: scored.mean_impact,
            conclusion: scored.conclusion,
            competitors,
            degradations,
            transitions: state.visited,
            generated_at: Utc::now(),
        }))
    }

    async fn resolve(
        &self,
        resolver: &dyn TickerResolver,
        company_name: &str,
    ) -> Result<CompanyIdentity> {
        match resolver.resolve(company_name).await {
            Ok(Some(identity)) => {
                info!(ticker = %identity.ticker, resolver = resolver.name(), "Resolved ticker");
                Ok(identity)
            }
            Ok(None) => Err(Error::resolution(
                company_name,
                format!("{} returned no results", resolver.name()),
            )),
            Err(e) => Err(Error::resolution(
                company_name,
                format!("{} failed: {e}", resolver.name()),
            )),
        }
    }

    async fn fetch_sentiment(
        &self,
        query: &str,
    ) -> std::result::Result<SentimentScore, EnrichmentUnavailable> {
        let Some(source) = &self.sentiment else {
            debug!("No sentiment source configured; using neutral sentiment");
            return Ok(SentimentScore::NEUTRAL);
        };

        match source.fetch_sentiment(query).await {
            Ok(polarities) => {
                let score = aggregate(&polarities);
                info!(
                    source = source.name(),
                    headlines = polarities.len(),
                    sentiment = score.value(),
                    "Aggregated sentiment"
                );
                Ok(score)
            }
            Err(e) => {
                let degraded = EnrichmentUnavailable::new(
                    EnrichmentSource::Sentiment,
                    format!("{}: {e}", source.name()),
                );
                warn!(%degraded, "Using neutral sentiment");
                Err(degraded)
            }
        }
    }

    async fn fetch_market(
        &self,
        identifier: &str,
    ) -> std::result::Result<Option<MarketRecord>, EnrichmentUnavailable> {
        let Some(source) = &self.market else {
            return Ok(None);
        };

        let reason = match source.fetch_market_data(identifier).await {
            Ok(Some(record)) => {
                debug!(
                    source = source.name(),
                    competitors = record.competitors.len(),
                    "Fetched market data"
                );
                return Ok(Some(record));
            }
            Ok(None) => format!("{}: no record for {identifier}", source.name()),
            Err(e) => format!("{}: {e}", source.name()),
        };

        let degraded = EnrichmentUnavailable::new(EnrichmentSource::MarketData, reason);
        warn!(%degraded, "Using empty competitor snapshot");
        Err(degraded)
    }
}
