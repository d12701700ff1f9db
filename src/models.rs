// Core data structures for the profitability-scoring pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{EnrichmentUnavailable, Error, Result};

/// Mean impact above which an IPO is classified as high potential
pub const IMPACT_THRESHOLD: f64 = 10.0;

/// Vocabulary used when no configuration overrides it
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "revenue",
    "growth",
    "debt",
    "profit",
    "competitive",
    "cash flow",
    "risk",
];

/// Ordered set of distinct lowercase terms
///
/// Insertion order defines report ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordVocabulary {
    terms: Vec<String>,
}

impl KeywordVocabulary {
    /// Build a vocabulary, lowercasing and trimming each term
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for empty or duplicate terms
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut normalized = Vec::new();

        for term in terms {
            let term = crate::utils::normalize_whitespace(&term.as_ref().to_lowercase());
            if term.is_empty() {
                return Err(Error::config("vocabulary terms must not be empty"));
            }
            if !seen.insert(term.clone()) {
                return Err(Error::config(format!("duplicate vocabulary term: {term}")));
            }
            normalized.push(term);
        }

        Ok(Self { terms: normalized })
    }

    /// The vocabulary without any terms
    #[must_use]
    pub fn empty() -> Self {
        Self { terms: Vec::new() }
    }

    /// Terms in insertion order
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }
}

impl Default for KeywordVocabulary {
    fn default() -> Self {
        Self {
            terms: DEFAULT_VOCABULARY.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for KeywordVocabulary {
    type Error = Error;

    fn try_from(terms: Vec<String>) -> Result<Self> {
        Self::new(terms)
    }
}

impl From<KeywordVocabulary> for Vec<String> {
    fn from(vocabulary: KeywordVocabulary) -> Self {
        vocabulary.terms
    }
}

/// Occurrence count per vocabulary term, in vocabulary order
///
/// Every vocabulary term has exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(String, u64)>", into = "Vec<(String, u64)>")]
pub struct KeywordCount {
    entries: Vec<(String, u64)>,
}

impl TryFrom<Vec<(String, u64)>> for KeywordCount {
    type Error = Error;

    fn try_from(pairs: Vec<(String, u64)>) -> Result<Self> {
        Self::from_pairs(pairs)
    }
}

impl From<KeywordCount> for Vec<(String, u64)> {
    fn from(counts: KeywordCount) -> Self {
        counts.entries
    }
}

impl KeywordCount {
    /// All-zero counts for a vocabulary
    #[must_use]
    pub fn zeroed(vocabulary: &KeywordVocabulary) -> Self {
        Self {
            entries: vocabulary.terms().iter().map(|t| (t.clone(), 0)).collect(),
        }
    }

    /// Build counts from `(term, count)` pairs, keeping their order
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a term appears twice or is empty
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let pairs: Vec<(String, u64)> = pairs
            .into_iter()
            .map(|(term, count)| (term.as_ref().to_string(), count))
            .collect();
        let vocabulary = KeywordVocabulary::new(pairs.iter().map(|(t, _)| t.as_str()))?;

        Ok(Self {
            entries: vocabulary
                .terms
                .into_iter()
                .zip(pairs.into_iter().map(|(_, count)| count))
                .collect(),
        })
    }

    /// Count for a term, if the term is in the vocabulary
    #[must_use]
    pub fn get(&self, term: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, count)| *count)
    }

    pub(crate) fn set(&mut self, index: usize, count: u64) {
        self.entries[index].1 = count;
    }

    /// Iterate `(term, count)` in vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

/// Mean headline polarity, nominally in [-1.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentScore(f64);

impl SentimentScore {
    /// Neutral score used when no headlines are available
    pub const NEUTRAL: Self = Self(0.0);

    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    /// Narrative sentence used in reports
    #[must_use]
    pub fn narrative(self) -> String {
        if self.is_positive() {
            format!(
                "Positive market sentiment ({:.2}), indicating potential market support.",
                self.0
            )
        } else {
            format!(
                "Negative market sentiment ({:.2}), indicating skepticism or competition concerns.",
                self.0
            )
        }
    }
}

impl fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Impact of a single vocabulary term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRow {
    pub term: String,
    pub count: u64,
    pub sentiment: f64,
    /// `count * (1 + sentiment)`
    pub impact: f64,
    pub rationale: String,
}

impl ImpactRow {
    /// Whether this row is above the fixed impact threshold
    #[must_use]
    pub fn is_strong(&self) -> bool {
        self.impact > IMPACT_THRESHOLD
    }
}

/// Ordered sequence of impact rows for one pipeline run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpactTable {
    rows: Vec<ImpactRow>,
}

impl ImpactTable {
    #[must_use]
    pub fn new(rows: Vec<ImpactRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[ImpactRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImpactRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Unweighted mean of row impacts; 0.0 for an empty table
    #[must_use]
    pub fn mean_impact(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows.iter().map(|r| r.impact).sum::<f64>() / self.rows.len() as f64
    }

    /// Impact for a term
    #[must_use]
    pub fn impact_of(&self, term: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.term == term).map(|r| r.impact)
    }
}

impl<'a> IntoIterator for &'a ImpactTable {
    type Item = &'a ImpactRow;
    type IntoIter = std::slice::Iter<'a, ImpactRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Binary profitability classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conclusion {
    HighPotential,
    RiskyOrLessProfitable,
}

impl Conclusion {
    /// Classify a mean impact against [`IMPACT_THRESHOLD`]
    #[must_use]
    pub fn from_mean_impact(mean: f64) -> Self {
        if mean > IMPACT_THRESHOLD {
            Self::HighPotential
        } else {
            Self::RiskyOrLessProfitable
        }
    }

    /// Sentence used in reports
    #[must_use]
    pub fn summary(&self) -> &'static str {
        match self {
            Self::HighPotential => "IPO has a high potential for profitability.",
            Self::RiskyOrLessProfitable => "IPO might be risky or less profitable.",
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighPotential => write!(f, "high potential"),
            Self::RiskyOrLessProfitable => write!(f, "risky or less profitable"),
        }
    }
}

/// Recent performance of a competitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTrend {
    Growing,
    Stable,
    Declining,
}

impl PerformanceTrend {
    /// Classify from a signed change (e.g. quarterly profit variation)
    #[must_use]
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Growing
        } else if change < 0.0 {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growing => "growing",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

impl fmt::Display for PerformanceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceTrend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "growing" => Ok(Self::Growing),
            "stable" => Ok(Self::Stable),
            "declining" => Ok(Self::Declining),
            other => Err(Error::config(format!("unknown performance trend: {other}"))),
        }
    }
}

/// Market position of a single competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub name: String,
    pub market_share_percent: f64,
    pub performance_trend: PerformanceTrend,
}

impl CompetitorRecord {
    pub fn new(
        name: impl Into<String>,
        market_share_percent: f64,
        performance_trend: PerformanceTrend,
    ) -> Self {
        Self {
            name: name.into(),
            market_share_percent,
            performance_trend,
        }
    }

    /// Report line for this competitor
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{}: Market Share = {}%, Recent Performance = {}.",
            self.name, self.market_share_percent, self.performance_trend
        )
    }
}

/// Set of competitor records
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorSnapshot {
    records: Vec<CompetitorRecord>,
}

impl CompetitorSnapshot {
    #[must_use]
    pub fn new(records: Vec<CompetitorRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[CompetitorRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompetitorRecord> {
        self.records.iter()
    }
}

/// Ticker and sector resolved for a company name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    pub ticker: String,
    pub sector: Option<String>,
}

/// Quote fields reported by a market-data source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketQuote {
    pub price: Option<String>,
    pub market_cap: Option<String>,
    pub pe_ratio: Option<String>,
}

impl MarketQuote {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.market_cap.is_none() && self.pe_ratio.is_none()
    }
}

/// Record returned by a market-data source for one identifier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketRecord {
    pub identifier: String,
    pub quote: MarketQuote,
    pub competitors: Vec<CompetitorRecord>,
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Extracting,
    Counting,
    Resolving,
    Sentiment,
    Scoring,
    CompetitorComparison,
    Done,
    Aborted,
}

impl PipelineState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Whether moving from `self` to `next` is a legal transition
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        use PipelineState::*;

        match (self, next) {
            (Done | Aborted, _) => false,
            (_, Aborted) => true,
            (Extracting, Counting)
            | (Counting, Resolving | Sentiment)
            | (Resolving, Sentiment)
            | (Sentiment, Scoring)
            | (Scoring, CompetitorComparison | Done)
            | (CompetitorComparison, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extracting => "extracting",
            Self::Counting => "counting",
            Self::Resolving => "resolving",
            Self::Sentiment => "sentiment",
            Self::Scoring => "scoring",
            Self::CompetitorComparison => "competitor_comparison",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Everything one pipeline run hands to the reporting boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub run_id: Uuid,
    pub company_name: String,
    pub identity: Option<CompanyIdentity>,
    pub quote: Option<MarketQuote>,
    pub impact_table: ImpactTable,
    pub sentiment: SentimentScore,
    pub mean_impact: f64,
    pub conclusion: Conclusion,
    pub competitors: CompetitorSnapshot,
    /// Enrichments that failed and were replaced by their fallback
    pub degradations: Vec<EnrichmentUnavailable>,
    pub transitions: Vec<PipelineState>,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Whether any enrichment fell back to its default
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}
