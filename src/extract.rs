//! PDF text extraction.
//!
//! Pages are extracted one at a time with [`lopdf`]. A page that fails (or
//! panics inside the PDF library) contributes empty text; only a document
//! that cannot be opened at all is an error.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("empty document")]
    Empty,
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Extract the text of every page, concatenated in page order.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::Empty);
    }

    let doc = panic::catch_unwind(AssertUnwindSafe(|| Document::load_mem(bytes)))
        .map_err(|_| ExtractError::Pdf("PDF parser panicked (malformed document)".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let pages = doc.get_pages();
    let mut text = String::new();
    for page_num in pages.keys() {
        text.push_str(&extract_page(&doc, *page_num));
    }

    debug!(pages = pages.len(), chars = text.len(), "extracted PDF text");
    Ok(text)
}

fn extract_page(doc: &Document, page_num: u32) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page_num]))) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(page = page_num, error = %e, "page text extraction failed");
            String::new()
        }
        Err(_) => {
            warn!(page = page_num, "page text extraction panicked");
            String::new()
        }
    }
}
