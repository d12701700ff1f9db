//! Unified error handling for the ipolens crate
//!
//! Errors fall into three groups:
//!
//! - Fatal: [`Error::Extraction`] (nothing to score) and [`Error::Resolution`]
//!   (no identifier for the company). The pipeline stops with `Aborted`.
//! - Recovered: [`EnrichmentUnavailable`] records a sentiment or market-data
//!   failure that was replaced by its fallback default. It is never returned
//!   as an `Err`, only attached to the analysis result.
//! - Everything else (configuration, report rendering, I/O) surfaces at the
//!   edges of the pipeline.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ipolens::error::{Error, IpoLensErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         println!("Transient failure ({}): {err}", err.category());
//!     } else {
//!         eprintln!("Fatal error: {err}");
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

pub use crate::utils::error::{ExtractionError, FetchError};

/// Common trait for all ipolens error types
pub trait IpoLensErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Document text extraction failed
    Extraction,
    /// No ticker or identifier could be resolved
    Resolution,
    /// Network-related errors (HTTP, timeout, rate limit)
    Network,
    /// Report rendering and writing errors
    Report,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Human-readable description of the category
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Extraction => "document extraction error",
            Self::Resolution => "identifier resolution error",
            Self::Network => "network error",
            Self::Report => "report error",
            Self::Config => "configuration error",
            Self::Other => "other error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Unified error type for the ipolens crate
#[derive(Error, Debug)]
pub enum Error {
    /// Document text extraction failed
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// No identifier could be resolved for the company
    #[error("No ticker found for \"{company}\": {reason}")]
    Resolution { company: String, reason: String },

    /// Fetch errors from network collaborators
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Report template errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl IpoLensErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Io(_) => true, // I/O errors are often transient
            Self::Extraction(_)
            | Self::Resolution { .. }
            | Self::Template(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Extraction(_) => ErrorCategory::Extraction,
            Self::Resolution { .. } => ErrorCategory::Resolution,
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Template(_) | Self::Io(_) | Self::Json(_) => ErrorCategory::Report,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a resolution failure for a company name
    pub fn resolution(company: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            company: company.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error stops the pipeline
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Extraction(_) | Self::Resolution { .. })
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::with_source("Failed to register report template", err)
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Which enrichment fell back to its default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentSource {
    /// News sentiment; falls back to 0.0
    Sentiment,
    /// Market and competitor data; falls back to an empty snapshot
    MarketData,
}

impl EnrichmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::MarketData => "market_data",
        }
    }
}

impl fmt::Display for EnrichmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An optional enrichment was unavailable and its fallback was used
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind} unavailable: {reason}")]
pub struct EnrichmentUnavailable {
    pub kind: EnrichmentSource,
    pub reason: String,
}

impl EnrichmentUnavailable {
    pub fn new(kind: EnrichmentSource, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}
