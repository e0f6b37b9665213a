use std::path::Path;

use async_trait::async_trait;

use crate::domain::Document;
use crate::error::{RagError, Result};
use crate::ports::TextExtractor;

/// Page-ordered text of a PDF, without layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn supports(&self, doc: &Document) -> bool {
        doc.extension().as_deref() == Some("pdf")
    }

    async fn extract(&self, doc: &Document) -> Result<String> {
        let path = doc.path.clone();
        let filename = doc.filename.clone();
        tokio::task::spawn_blocking(move || extract_pdf_text(&path, &filename))
            .await
            .map_err(|e| RagError::extraction(&doc.filename, e))?
    }
}

pub fn extract_pdf_text(path: &Path, filename: &str) -> Result<String> {
    let document = lopdf::Document::load(path).map_err(|e| RagError::extraction(filename, e))?;
    let pages = document.get_pages();

    let mut text = String::new();
    let mut failed_pages = 0;
    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                if !text.ends_with(char::is_whitespace) {
                    text.push('\n');
                }
            }
            Err(e) => {
                failed_pages += 1;
                tracing::warn!("{}: page {} unreadable: {}", filename, page_number, e);
            }
        }
    }

    if failed_pages > 0 && failed_pages == pages.len() {
        return Err(RagError::extraction(filename, "no readable pages"));
    }

    tracing::info!(pages = pages.len(), "Text extracted from {}", filename);
    Ok(text)
}
