pub mod gemini;
pub mod prompt;

use crate::error::BomError;
use crate::parsing::RawExtraction;
use std::path::Path;

/// A document queued for extraction.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceDocument {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk, naming it after the file name.
    pub fn from_path(path: &Path) -> Result<Self, BomError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(SourceDocument { name, bytes })
    }
}

/// Trait for BOM extraction backends.
pub trait BomExtractor: Send + Sync {
    /// Ask the backend for the drawings and BOM rows in one PDF document.
    fn request_extraction(&self, file_name: &str, pdf_bytes: &[u8])
        -> Result<RawExtraction, BomError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
