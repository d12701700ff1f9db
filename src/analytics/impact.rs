//! Per-keyword impact scoring and conclusion derivation
//!
//! Each vocabulary term gets `impact = count * (1 + sentiment)`. The mean of
//! all impacts is compared against [`IMPACT_THRESHOLD`] to derive the
//! [`Conclusion`]. Competitor data never participates.

use crate::models::{
    Conclusion, ImpactRow, ImpactTable, KeywordCount, SentimentScore, IMPACT_THRESHOLD,
};
use crate::utils::capitalize;

/// Impact table and the conclusion derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredImpact {
    pub table: ImpactTable,
    pub mean_impact: f64,
    pub conclusion: Conclusion,
}

/// Combines keyword counts and sentiment into impact rows
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactScorer;

impl ImpactScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score every term in vocabulary order
    pub fn score(&self, counts: &KeywordCount, sentiment: SentimentScore) -> ScoredImpact {
        let multiplier = 1.0 + sentiment.value();

        let rows = counts
            .iter()
            .map(|(term, count)| {
                let impact = count as f64 * multiplier;
                ImpactRow {
                    term: term.to_string(),
                    count,
                    sentiment: sentiment.value(),
                    impact,
                    rationale: rationale(term, impact),
                }
            })
            .collect();

        let table = ImpactTable::new(rows);
        let mean_impact = table.mean_impact();

        ScoredImpact {
            conclusion: Conclusion::from_mean_impact(mean_impact),
            mean_impact,
            table,
        }
    }
}

/// Explanation attached to a row, keyed on `impact > IMPACT_THRESHOLD`
pub fn rationale(term: &str, impact: f64) -> String {
    if impact > IMPACT_THRESHOLD {
        format!(
            "{} is strong, indicating financial stability and growth potential.",
            capitalize(term)
        )
    } else {
        format!("Low {term} may pose risks to profitability due to weaker financial indicators.")
    }
}
