//! Quote and peer data scraped from screener.in company pages
//!
//! `GET {base}/company/{identifier}/` returns an HTML page with a ratio list
//! (`#top-ratios`) and a peer comparison table (`#peers`). Peer market shares
//! are computed relative to the combined market cap of the listed peers.

use async_trait::async_trait;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::Instant;

use super::http::{endpoint, HttpFetcher};
use super::MarketDataSource;
use crate::metrics;
use crate::models::{CompetitorRecord, MarketQuote, MarketRecord, PerformanceTrend};
use crate::utils::error::FetchError;
use crate::utils::normalize_whitespace;

macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    static ref RATIO_ITEM: Selector = parse_selector!("#top-ratios li");
    static ref RATIO_NAME: Selector = parse_selector!(".name");
    static ref RATIO_VALUE: Selector = parse_selector!(".value");
    static ref PEERS_TABLE: Selector = parse_selector!("#peers table");
    static ref HEADER_CELL: Selector = parse_selector!("th");
    static ref ROW: Selector = parse_selector!("tr");
    static ref DATA_CELL: Selector = parse_selector!("td");
}

/// Market data source backed by screener.in
pub struct ScreenerClient {
    fetcher: Arc<HttpFetcher>,
    base_url: String,
}

impl ScreenerClient {
    pub fn new(fetcher: Arc<HttpFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    async fn fetch_page(&self, identifier: &str) -> Result<Option<String>, FetchError> {
        // Screener uses bare NSE symbols; strip exchange suffixes like ".NS"
        let symbol = identifier.split('.').next().unwrap_or(identifier);
        let url = endpoint(&self.base_url, &format!("company/{symbol}/"), &[])?;
        self.fetcher.get_text(&url).await
    }
}

#[async_trait]
impl MarketDataSource for ScreenerClient {
    fn name(&self) -> &'static str {
        "screener"
    }

    async fn fetch_market_data(
        &self,
        identifier: &str,
    ) -> Result<Option<MarketRecord>, FetchError> {
        let start = Instant::now();
        let page = self.fetch_page(identifier).await;
        metrics::observe_collaborator(self.name(), start.elapsed());

        Ok(page?.map(|html| parse_company_page(identifier, &html)))
    }
}

/// Parse a company page into a market record
pub fn parse_company_page(identifier: &str, html: &str) -> MarketRecord {
    let document = Html::parse_document(html);

    MarketRecord {
        identifier: identifier.to_string(),
        quote: parse_quote(&document),
        competitors: parse_peers(&document),
    }
}

fn parse_quote(document: &Html) -> MarketQuote {
    let mut quote = MarketQuote::default();

    for item in document.select(&RATIO_ITEM) {
        let Some(name) = first_text(item, &RATIO_NAME) else {
            continue;
        };
        let value = first_text(item, &RATIO_VALUE);

        match name.as_str() {
            "Current Price" => quote.price = value,
            "Market Cap" => quote.market_cap = value,
            "Stock P/E" => quote.pe_ratio = value,
            _ => {}
        }
    }

    quote
}

fn parse_peers(document: &Html) -> Vec<CompetitorRecord> {
    let Some(table) = document.select(&PEERS_TABLE).next() else {
        return Vec::new();
    };

    let headers: Vec<String> = table.select(&HEADER_CELL).map(cell_text).collect();
    let column = |label: &str| {
        let label = label.to_lowercase();
        headers.iter().position(|h| h.to_lowercase().contains(&label))
    };

    let (Some(name_col), Some(cap_col)) = (column("Name"), column("Mar Cap")) else {
        tracing::debug!("Peer table without name or market cap column");
        return Vec::new();
    };
    let profit_col = column("Qtr Profit Var");

    let peers: Vec<(String, f64, PerformanceTrend)> = table
        .select(&ROW)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&DATA_CELL).map(cell_text).collect();
            let name = cells.get(name_col)?.clone();
            if name.is_empty() || name.starts_with("Median") {
                return None;
            }

            let cap = cells.get(cap_col).and_then(|c| parse_number(c))?;
            let trend = profit_col
                .and_then(|i| cells.get(i))
                .and_then(|c| parse_number(c))
                .map_or(PerformanceTrend::Stable, PerformanceTrend::from_change);

            Some((name, cap, trend))
        })
        .filter(|(_, cap, _)| *cap > 0.0)
        .collect();

    let total: f64 = peers.iter().map(|(_, cap, _)| cap).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    peers
        .into_iter()
        .map(|(name, cap, trend)| {
            let share = (cap / total * 10_000.0).round() / 100.0;
            CompetitorRecord::new(name, share, trend)
        })
        .collect()
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(cell_text)
        .filter(|t| !t.is_empty())
}

fn cell_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Parse a number formatted with thousands separators and units
///
/// `"1,23,456.70 Cr."` gives `123456.7`; text without digits gives `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let cleaned = cleaned.trim_matches('.');

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}
