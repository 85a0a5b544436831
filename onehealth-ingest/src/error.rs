use thiserror::Error;

/// Per-file ingestion errors. A failing file never aborts a batch; the error
/// is reported in that file's slot.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("document archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("document XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("spreadsheet has no worksheets")]
    EmptyWorkbook,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
