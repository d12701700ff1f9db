//! Chart data series for reports
//!
//! A [`ChartSeries`] carries the data a chart renderer needs. Reports embed a
//! fixed-width text rendering so that no image backend is required.

use serde::Serialize;

use crate::models::{CompetitorSnapshot, ImpactTable};
use crate::utils::capitalize;

/// Width of the longest bar in text renderings
const BAR_WIDTH: usize = 40;

/// Labelled values for a single bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(String, f64)>,
}

impl ChartSeries {
    /// Impact score per financial factor
    pub fn impact(table: &ImpactTable) -> Self {
        Self {
            title: String::from("Impact of Financial Factors on IPO Profitability"),
            x_label: String::from("Financial Factors"),
            y_label: String::from("Impact Score"),
            points: table
                .iter()
                .map(|row| (capitalize(&row.term), row.impact))
                .collect(),
        }
    }

    /// Market share per competitor
    pub fn market_share(snapshot: &CompetitorSnapshot) -> Self {
        Self {
            title: String::from("Competitor Market Share"),
            x_label: String::from("Competitors"),
            y_label: String::from("Market Share (%)"),
            points: snapshot
                .iter()
                .map(|r| (r.name.clone(), r.market_share_percent))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One line per point: label, a bar scaled to the largest value, the value
    ///
    /// Negative and NaN values draw an empty bar.
    pub fn text_bars(&self) -> Vec<String> {
        let label_width = self
            .points
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let max = self
            .points
            .iter()
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        self.points
            .iter()
            .map(|(label, value)| {
                let len = if max > 0.0 && value.is_finite() && *value > 0.0 {
                    ((value / max) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                format!(
                    "{label:<label_width$} | {} {value:.2}",
                    "#".repeat(len)
                )
            })
            .collect()
    }
}
