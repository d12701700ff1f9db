//! Report rendering and writing
//!
//! Renderers turn an [`AnalysisResult`] into text; [`ReportWriter`] saves it
//! under the output directory as
//! `{name}_IPO_Analysis_Report_{YYYYmmdd_HHMMSS}.{ext}`.

pub mod chart;
pub mod markdown;

use chrono::Local;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::models::AnalysisResult;
use crate::utils::sanitize_filename;

pub use chart::ChartSeries;
pub use markdown::MarkdownReport;

/// Turns an analysis result into a document
pub trait ReportRenderer: Send + Sync {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, result: &AnalysisResult) -> Result<String>;
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    /// Renderer for this format
    pub fn renderer(self) -> Result<Box<dyn ReportRenderer>> {
        Ok(match self {
            Self::Markdown => Box::new(MarkdownReport::new()?),
            Self::Json => Box::new(JsonReport),
        })
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(Error::config(format!("unknown report format: {other}"))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Pretty-printed JSON of the full result
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

impl ReportRenderer for JsonReport {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, result: &AnalysisResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}

/// Saves rendered reports to the filesystem
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    timestamped: bool,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            timestamped: true,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.output_dir.clone()).timestamped(config.timestamped)
    }

    /// Append the generation time to filenames
    pub fn timestamped(mut self, timestamped: bool) -> Self {
        self.timestamped = timestamped;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Filename for a result, using its local generation time
    pub fn filename(&self, result: &AnalysisResult, extension: &str) -> String {
        let name = sanitize_filename(&result.company_name);
        let name = if name.is_empty() { "IPO" } else { name.as_str() };

        if self.timestamped {
            let stamp = result
                .generated_at
                .with_timezone(&Local)
                .format("%Y%m%d_%H%M%S");
            format!("{name}_IPO_Analysis_Report_{stamp}.{extension}")
        } else {
            format!("{name}_IPO_Analysis_Report.{extension}")
        }
    }

    /// Render and save a report, returning its path
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written
    pub fn write(&self, result: &AnalysisResult, renderer: &dyn ReportRenderer) -> Result<PathBuf> {
        let content = renderer.render(result)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(self.filename(result, renderer.extension()));
        fs::write(&path, content)?;

        tracing::info!(path = %path.display(), "Saved report");
        Ok(path)
    }
}
