pub mod batch;
pub mod docx;
pub mod error;
pub mod pdf;
pub mod sheet;

pub use batch::{BatchItem, RawFile, extract_batch};
pub use error::IngestError;

/// A file reduced to plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub name: String,
    pub content: String,
}

/// Knowledge-base upload formats, dispatched on file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
    PlainText,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match extension(name)?.as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Word),
            "txt" | "md" | "csv" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Tabular prediction-input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularKind {
    Csv,
    Excel,
}

impl TabularKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match extension(name)?.as_str() {
            "csv" => Some(Self::Csv),
            "xls" | "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Extract plain text from one knowledge-base upload.
pub async fn extract_text(name: &str, bytes: Vec<u8>) -> Result<ExtractedDocument, IngestError> {
    let kind = DocumentKind::from_name(name)
        .ok_or_else(|| IngestError::UnsupportedExtension(name.to_string()))?;

    let content = match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes).await?,
        DocumentKind::Word => docx::extract_docx_text(&bytes)?,
        DocumentKind::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
    };

    Ok(ExtractedDocument {
        name: name.to_string(),
        content: content.trim().to_string(),
    })
}

/// Convert a prediction upload into CSV text. CSV passes through untouched;
/// Excel workbooks are reduced to their first worksheet.
pub fn tabular_to_csv(name: &str, bytes: &[u8]) -> Result<String, IngestError> {
    let kind = TabularKind::from_name(name)
        .ok_or_else(|| IngestError::UnsupportedExtension(name.to_string()))?;

    match kind {
        TabularKind::Csv => Ok(String::from_utf8_lossy(bytes).into_owned()),
        TabularKind::Excel => sheet::first_sheet_to_csv(bytes),
    }
}
