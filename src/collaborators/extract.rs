//! Prospectus text extraction from local files
//!
//! HTML documents are reduced to their visible text with `scraper`; every
//! other text format is read as UTF-8. Binary office formats need an external
//! converter and are rejected with a clear error.

use async_trait::async_trait;
use scraper::Html;
use std::io::ErrorKind;
use std::path::Path;

use super::TextExtractor;
use crate::utils::error::ExtractionError;

/// Extensions that cannot be read as text without an external converter
const BINARY_FORMATS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx"];

/// Extracts text from files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for FileTextExtractor {
    async fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if BINARY_FORMATS.contains(&extension.as_str()) {
            tokio::fs::metadata(path)
                .await
                .map_err(|e| io_error(path, e))?;

            return Err(ExtractionError::Unparsable {
                path: path.to_path_buf(),
                reason: format!(
                    "{extension} documents must be converted to text or HTML before analysis"
                ),
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;

        let raw = String::from_utf8(bytes).map_err(|e| ExtractionError::Unparsable {
            path: path.to_path_buf(),
            reason: format!("not valid UTF-8: {e}"),
        })?;

        let text = match extension.as_str() {
            "html" | "htm" | "xhtml" => html_to_text(&raw),
            _ => raw,
        };

        tracing::debug!(path = %path.display(), chars = text.len(), "Extracted document text");
        Ok(text)
    }
}

fn io_error(path: &Path, err: std::io::Error) -> ExtractionError {
    match err.kind() {
        ErrorKind::NotFound => ExtractionError::NotFound(path.to_path_buf()),
        _ => ExtractionError::Unreadable {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

/// Visible text of an HTML document, skipping script and style contents
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let parts: Vec<&str> = document
        .tree
        .nodes()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element())
                .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"));

            if hidden {
                None
            } else {
                Some(text.trim())
            }
        })
        .filter(|t| !t.is_empty())
        .collect();

    parts.join(" ")
}
