pub mod assemble;
pub mod export;
pub mod extract;
pub mod metrics;
pub mod normalize;

use bomlens_core::error::BomError;
use bomlens_core::model::BomRecord;
use std::path::Path;

/// Load records previously written by `extract --out`.
pub fn load_records(path: &Path) -> Result<Vec<BomRecord>, BomError> {
    let json_bytes = std::fs::read(path)?;
    let records: Vec<BomRecord> = serde_json::from_slice(&json_bytes)?;
    Ok(records)
}
