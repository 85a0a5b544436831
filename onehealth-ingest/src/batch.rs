//! Batch ingestion with per-file fault isolation.

use tracing::warn;

use crate::{ExtractedDocument, IngestError, extract_text};

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub name: String,
    pub result: Result<ExtractedDocument, IngestError>,
}

/// Ingest a sequence of independent files, collecting per-file outcomes.
///
/// A failing file is logged and reported in its slot; it never aborts the
/// rest of the batch. Output order matches input order.
pub async fn extract_batch(files: Vec<RawFile>) -> Vec<BatchItem> {
    let mut items = Vec::with_capacity(files.len());
    for file in files {
        let result = extract_text(&file.name, file.bytes).await;
        if let Err(err) = &result {
            warn!(file = %file.name, error = %err, "failed to ingest file");
        }
        items.push(BatchItem {
            name: file.name,
            result,
        });
    }
    items
}
