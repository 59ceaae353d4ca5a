//! PDF-to-text boundary.
//!
//! Everything downstream sees a statement as ordered pages of text lines.
//! Where that text comes from is behind [`PageSource`] so tests (and other
//! extraction backends) can feed lines directly.

use std::path::Path;

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to load PDF: {0}")]
    Load(String),

    #[error("failed to extract text: {0}")]
    Text(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracted text of one statement, one string per page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementText {
    pub pages: Vec<String>,
}

impl StatementText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn first_page(&self) -> &str {
        self.pages.first().map(String::as_str).unwrap_or("")
    }

    /// All lines of all pages, in page order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| page.lines())
    }
}

pub trait PageSource {
    fn pages(&self, path: &Path) -> Result<StatementText, ExtractError>;
}

/// `lopdf` page-by-page extraction, with `pdf-extract` as a whole-document
/// fallback when `lopdf` cannot read the file or finds no text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageSource;

impl PdfPageSource {
    fn extract_with_lopdf(path: &Path) -> Result<StatementText, ExtractError> {
        let doc = Document::load(path).map_err(|e| ExtractError::Load(e.to_string()))?;

        let mut pages = Vec::new();
        for (page_num, _page_id) in doc.get_pages() {
            let text = doc
                .extract_text(&[page_num])
                .map_err(|e| ExtractError::Text(e.to_string()))?;
            pages.push(text);
        }
        Ok(StatementText::new(pages))
    }

    fn extract_with_pdf_extract(path: &Path) -> Result<StatementText, ExtractError> {
        let bytes = std::fs::read(path)?;
        // pdf-extract panics on some malformed content streams.
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
            .map_err(|_| ExtractError::Text("pdf-extract panicked".to_string()))?
            .map_err(|e| ExtractError::Text(e.to_string()))?;
        Ok(StatementText::new(vec![text]))
    }
}

impl PageSource for PdfPageSource {
    fn pages(&self, path: &Path) -> Result<StatementText, ExtractError> {
        match Self::extract_with_lopdf(path) {
            Ok(text) if text.lines().any(|l| !l.trim().is_empty()) => {
                debug!(path = %path.display(), pages = text.pages.len(), "extracted with lopdf");
                Ok(text)
            }
            Ok(_) => {
                warn!(path = %path.display(), "lopdf found no text, trying pdf-extract");
                Self::extract_with_pdf_extract(path)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "lopdf failed, trying pdf-extract");
                Self::extract_with_pdf_extract(path).map_err(|fallback| {
                    debug!(error = %fallback, "pdf-extract fallback failed");
                    err
                })
            }
        }
    }
}
