//! PDF text extraction. No OCR: only embedded text is read.

use std::sync::Arc;

use futures::future::join_all;
use lopdf::Document;
use tokio::task;
use tracing::info;

use crate::error::IngestError;

/// Extract the text of every page of a PDF.
///
/// One blocking extraction task is issued per page; the join preserves page
/// order regardless of completion order. Text fragments within a page are
/// joined by single spaces, pages by single newlines, so an N-page document
/// yields exactly N-1 newline separators.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, IngestError> {
    let document = task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    let document = Arc::new(document);

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Ok(String::new());
    }
    info!(pages = page_numbers.len(), "extracting PDF text");

    let extractions = page_numbers.into_iter().map(|page| {
        let document = Arc::clone(&document);
        task::spawn_blocking(move || document.extract_text(&[page]))
    });

    let mut pages = Vec::new();
    for outcome in join_all(extractions).await {
        pages.push(normalize_page(&outcome??));
    }
    Ok(pages.join("\n"))
}

/// Collapse intra-page whitespace so fragments read as space-separated text.
fn normalize_page(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
