//! Competitor share-of-market comparison
//!
//! Feeds the competitor section of reports only; it has no influence on the
//! profitability conclusion.

use std::cmp::Ordering;

use crate::models::{CompetitorRecord, CompetitorSnapshot};

/// Sort competitors by market share, largest first
///
/// The sort is stable, so equal shares keep their input order. NaN shares
/// sort after every real value.
pub fn compare<I>(records: I) -> CompetitorSnapshot
where
    I: IntoIterator<Item = CompetitorRecord>,
{
    let mut records: Vec<CompetitorRecord> = records.into_iter().collect();
    records.sort_by(|a, b| descending_share(a.market_share_percent, b.market_share_percent));
    CompetitorSnapshot::new(records)
}

fn descending_share(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Combined share of every competitor in the snapshot
pub fn total_share(snapshot: &CompetitorSnapshot) -> f64 {
    snapshot
        .iter()
        .map(|r| r.market_share_percent)
        .filter(|s| !s.is_nan())
        .sum()
}

/// The competitor with the largest share, if any
pub fn leader(snapshot: &CompetitorSnapshot) -> Option<&CompetitorRecord> {
    snapshot.records().first()
}
