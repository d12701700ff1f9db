//! Markdown report rendering with the Handlebars template engine

use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use super::chart::ChartSeries;
use super::ReportRenderer;
use crate::analytics::competitors;
use crate::error::Result;
use crate::models::AnalysisResult;
use crate::utils::capitalize;

/// Default report template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.hbs");

const TEMPLATE_NAME: &str = "report";

/// Template data for rendering
#[derive(Debug, Serialize)]
struct ReportTemplateData {
    company_name: String,
    generated_at: String,
    run_id: String,
    ticker: Option<String>,
    sector: Option<String>,
    price: Option<String>,
    market_cap: Option<String>,
    pe_ratio: Option<String>,
    factors: Vec<FactorLine>,
    impact_chart: Vec<String>,
    mean_impact: String,
    sentiment: String,
    competitors: Vec<String>,
    competitor_chart: Vec<String>,
    market_leader: Option<String>,
    listed_share: String,
    degradations: Vec<String>,
    conclusion: &'static str,
}

#[derive(Debug, Serialize)]
struct FactorLine {
    term: String,
    impact: String,
    rationale: String,
}

impl From<&AnalysisResult> for ReportTemplateData {
    fn from(result: &AnalysisResult) -> Self {
        let quote = result.quote.clone().unwrap_or_default();

        Self {
            company_name: result.company_name.clone(),
            generated_at: result.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            run_id: result.run_id.to_string(),
            ticker: result.identity.as_ref().map(|i| i.ticker.clone()),
            sector: result.identity.as_ref().and_then(|i| i.sector.clone()),
            price: quote.price,
            market_cap: quote.market_cap,
            pe_ratio: quote.pe_ratio,
            factors: result
                .impact_table
                .iter()
                .map(|row| FactorLine {
                    term: capitalize(&row.term),
                    impact: format!("{:.2}", row.impact),
                    rationale: row.rationale.clone(),
                })
                .collect(),
            impact_chart: ChartSeries::impact(&result.impact_table).text_bars(),
            mean_impact: format!("{:.2}", result.mean_impact),
            sentiment: result.sentiment.narrative(),
            competitors: result.competitors.iter().map(|c| c.describe()).collect(),
            competitor_chart: ChartSeries::market_share(&result.competitors).text_bars(),
            market_leader: competitors::leader(&result.competitors).map(|c| c.name.clone()),
            listed_share: format!("{:.2}", competitors::total_share(&result.competitors)),
            degradations: result.degradations.iter().map(ToString::to_string).collect(),
            conclusion: result.conclusion.summary(),
        }
    }
}

/// Markdown renderer
pub struct MarkdownReport {
    handlebars: Handlebars<'static>,
}

impl MarkdownReport {
    /// Create a renderer with the built-in template
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to compile
    pub fn new() -> Result<Self> {
        let mut handlebars = Self::engine();
        handlebars.register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Create a renderer with a custom template file
    ///
    /// The template sees the same fields as the built-in one.
    pub fn with_template(template_path: &Path) -> Result<Self> {
        let mut handlebars = Self::engine();
        handlebars.register_template_file(TEMPLATE_NAME, template_path)?;
        Ok(Self { handlebars })
    }

    fn engine() -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(false);
        handlebars
    }
}

impl ReportRenderer for MarkdownReport {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, result: &AnalysisResult) -> Result<String> {
        let data = ReportTemplateData::from(result);
        Ok(self.handlebars.render(TEMPLATE_NAME, &data)?)
    }
}
