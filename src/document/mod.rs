
use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;
use tracing::{debug, warn};

/// A single page of the source PDF. One `PageDocument` is produced per page
/// and handed to the splitter; the page number travels with every chunk as
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDocument {
    pub content: String,
    pub page_number: u32,
}

/// Load a PDF from disk and extract one document per page.
#[inline]
pub fn load_pdf<P: AsRef<Path>>(path: P) -> Result<Vec<PageDocument>> {
    let path = path.as_ref();
    let doc = Document::load(path)
        .with_context(|| format!("Failed to load PDF from {}", path.display()))?;

    let pages = extract_pages(&doc);
    debug!("Loaded {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

/// Extract the text of every page, in page order. Pages with no extractable
/// text are skipped rather than producing empty documents.
#[inline]
pub fn extract_pages(doc: &Document) -> Vec<PageDocument> {
    let mut pages = Vec::new();

    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) if !text.trim().is_empty() => {
                pages.push(PageDocument {
                    content: text,
                    page_number: *page_number,
                });
            }
            Ok(_) => {
                debug!("Page {} has no extractable text, skipping", page_number);
            }
            Err(e) => {
                warn!("Failed to extract text from page {}: {}", page_number, e);
            }
        }
    }

    pages
}
