pub mod assembly;
pub mod batch;
pub mod confidence;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod metrics;
pub mod model;
pub mod parsing;
pub mod session;

use error::BomError;
use extraction::BomExtractor;
use model::BomRecord;

pub use assembly::assemble_records;
pub use batch::{extract_batch, run_batch, BatchOutcome, BatchPolicy, CancelFlag};
pub use parsing::quantity::normalize_qty;

/// Main API entry point: extract BOM records from a single PDF document.
///
/// Produces one record per drawing the backend finds in the document.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    file_name: &str,
    extractor: &dyn BomExtractor,
) -> Result<Vec<BomRecord>, BomError> {
    let extraction = extractor.request_extraction(file_name, pdf_bytes)?;
    Ok(assemble_records(file_name, &extraction))
}

/// Run the pipeline on a model response saved as JSON text.
pub fn process_response(file_name: &str, response_text: &str) -> Result<Vec<BomRecord>, BomError> {
    let extraction = parsing::parse_response(response_text)?;
    Ok(assemble_records(file_name, &extraction))
}
