//! Analytics for the profitability-scoring pipeline
//!
//! Keyword counting, headline sentiment, impact scoring and competitor comparison.

pub mod competitors;
pub mod impact;
pub mod keywords;
pub mod sentiment;

pub use competitors::compare;
pub use impact::{ImpactScorer, ScoredImpact};
pub use keywords::{count_keywords, KeywordCounter};
pub use sentiment::{aggregate, HeadlineScorer};
