#[derive(Debug, thiserror::Error)]
pub enum BomError {
    #[error("extraction request failed: {0}")]
    Extraction(String),

    #[error("could not reach extraction service at {0}")]
    Connection(String),

    #[error("extraction request timed out after {0}s")]
    Timeout(u64),

    #[error("extraction service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("extraction service returned no content")]
    EmptyResponse,

    #[error("failed to parse model response: {0}")]
    ResponseParse(String),

    #[error("extraction cancelled")]
    Cancelled,

    #[error("failed to extract data from {failed} of {total} document(s). The model may have had trouble parsing the file")]
    BatchFailed { failed: usize, total: usize },

    #[error("no item with id '{0}' in the current session")]
    UnknownItem(String),

    #[error("no data to export")]
    NothingToExport,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl From<config::ConfigError> for BomError {
    fn from(e: config::ConfigError) -> Self {
        BomError::Config(e.to_string())
    }
}
