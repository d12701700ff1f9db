//! Error types for the collaborator layer
//!
//! This module defines the errors raised by document extraction and by the
//! HTTP-backed enrichment sources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit still in effect after the single retry
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Unexpected status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body could not be decoded
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Collaborator is missing configuration it needs (e.g. an API key)
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl FetchError {
    /// Check if this error is transient
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimit | Self::Timeout => true,
            Self::ServerError(status) => *status >= 500,
            Self::Decode(_) | Self::InvalidUrl(_) | Self::NotConfigured(_) => false,
        }
    }
}

/// Errors that can occur while extracting text from a document
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Document does not exist
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Document exists but could not be read
    #[error("Failed to read document {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document content could not be turned into text
    #[error("Failed to parse document {}: {reason}", path.display())]
    Unparsable { path: PathBuf, reason: String },
}

impl ExtractionError {
    /// Path of the document that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(path) => path,
            Self::Unreadable { path, .. } | Self::Unparsable { path, .. } => path,
        }
    }
}
