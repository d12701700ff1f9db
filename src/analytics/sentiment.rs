//! News sentiment: per-headline polarity and aggregation
//!
//! - [`HeadlineScorer`] turns a headline into a polarity in [-1.0, 1.0]
//!   with VADER, boosted by IPO and market terms.
//! - [`aggregate`] reduces headline polarities to a single [`SentimentScore`].

use std::collections::HashMap;
use std::fmt;

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::SentimentScore;

/// Mean of headline polarities; 0.0 when there are none
///
/// Values are not clamped; an out-of-range input passes through the
/// arithmetic unchanged.
#[must_use]
pub fn aggregate(polarities: &[f64]) -> SentimentScore {
    if polarities.is_empty() {
        return SentimentScore::NEUTRAL;
    }

    SentimentScore::new(polarities.iter().sum::<f64>() / polarities.len() as f64)
}

/// Weight of the financial boost added to the VADER compound score
const BOOST_WEIGHT: f64 = 0.5;

/// Words that flip the polarity of the following financial term
const NEGATORS: &[&str] = &["not", "no", "never", "without", "isn't", "wasn't", "won't", "don't"];

/// IPO and market vocabulary that general-purpose lexicons score weakly or not at all
const BULLISH_TERMS: &[(&str, f64)] = &[
    ("surge", 0.4),
    ("surges", 0.4),
    ("soar", 0.5),
    ("soars", 0.5),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("oversubscribed", 0.5),
    ("bullish", 0.5),
    ("profitable", 0.3),
    ("profit", 0.2),
    ("record", 0.2),
    ("beats", 0.3),
    ("upgrade", 0.3),
    ("premium", 0.2),
    ("expansion", 0.2),
];

const BEARISH_TERMS: &[(&str, f64)] = &[
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("crash", -0.5),
    ("crashes", -0.5),
    ("tumble", -0.5),
    ("tumbles", -0.5),
    ("slump", -0.4),
    ("slumps", -0.4),
    ("undersubscribed", -0.5),
    ("discount", -0.2),
    ("downgrade", -0.3),
    ("bearish", -0.5),
    ("probe", -0.3),
    ("lawsuit", -0.4),
    ("fraud", -0.5),
    ("selloff", -0.4),
    ("layoffs", -0.3),
    ("delayed", -0.2),
    ("debt", -0.1),
];

/// Headline polarity: VADER compound score plus a financial term boost
pub struct HeadlineScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
    boosts: HashMap<&'static str, f64>,
}

impl fmt::Debug for HeadlineScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlineScorer")
            .field("boost_terms", &self.boosts.len())
            .finish()
    }
}

impl Default for HeadlineScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlineScorer {
    /// Create a scorer with the VADER lexicon and the built-in financial boosts
    pub fn new() -> Self {
        let boosts = BULLISH_TERMS
            .iter()
            .chain(BEARISH_TERMS.iter())
            .copied()
            .collect();

        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
            boosts,
        }
    }

    /// Sum of financial term weights; a preceding negator flips a term
    fn financial_boost(&self, headline: &str) -> f64 {
        let lowered = headline.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| {
                let weight = *self.boosts.get(token)?;
                let negated = i > 0 && NEGATORS.iter().any(|n| *n == tokens[i - 1]);
                Some(if negated { -weight } else { weight })
            })
            .sum()
    }

    /// Polarity of a single headline in [-1.0, 1.0]
    ///
    /// Blank headlines and headlines with no sentiment-bearing words score 0.0.
    pub fn score(&self, headline: &str) -> f64 {
        if headline.trim().is_empty() {
            return 0.0;
        }

        let compound = self
            .analyzer
            .polarity_scores(headline)
            .get("compound")
            .copied()
            .unwrap_or(0.0);

        (compound + self.financial_boost(headline) * BOOST_WEIGHT).clamp(-1.0, 1.0)
    }

    /// Score every headline, preserving order
    pub fn score_all<I, S>(&self, headlines: I) -> Vec<f64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        headlines.into_iter().map(|h| self.score(h.as_ref())).collect()
    }
}
