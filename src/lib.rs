//! ipolens - IPO prospectus profitability scoring
//!
//! Scores an IPO prospectus by counting financial terms, weighting them with
//! news-headline sentiment, and deriving a binary profitability conclusion.
//! Competitor market data enriches the report without affecting the verdict.
//!
//! # Architecture
//!
//! - [`analytics`] - Keyword counting, sentiment, impact scoring, competitor comparison
//! - [`collaborators`] - Document extraction and network enrichment sources
//! - [`pipeline`] - The staged pipeline with injected collaborators
//! - [`report`] - Markdown and JSON reports
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`metrics`] - Prometheus metrics
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use ipolens::collaborators::FileTextExtractor;
//! use ipolens::pipeline::ProfitabilityPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = ProfitabilityPipeline::builder(Arc::new(FileTextExtractor::new())).build()?;
//!     let result = pipeline
//!         .run(Path::new("prospectus.txt"), "Acme Foods")
//!         .await
//!         .into_result()?;
//!     println!("{}", result.conclusion.summary());
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::collaborators::{
        MarketDataSource, SentimentSource, TextExtractor, TickerResolver,
    };
    pub use crate::config::Config;
    pub use crate::error::{
        EnrichmentSource, EnrichmentUnavailable, Error, ErrorCategory, IpoLensErrorTrait, Result,
    };
    pub use crate::models::{
        AnalysisResult, Conclusion, CompetitorRecord, CompetitorSnapshot, ImpactTable,
        KeywordCount, KeywordVocabulary, PipelineState, SentimentScore,
    };
    pub use crate::pipeline::{PipelineOutcome, ProfitabilityPipeline};
    pub use crate::report::{ReportFormat, ReportRenderer, ReportWriter};
}

// Direct re-exports for convenience
pub use models::{AnalysisResult, Conclusion, KeywordVocabulary, PipelineState};
pub use pipeline::{PipelineOutcome, ProfitabilityPipeline};
