use bomlens_core::error::BomError;
use bomlens_core::metrics::SessionMetrics;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use super::load_records;
use crate::output;

pub fn run(records_file: PathBuf, output_format: &str) -> Result<(), BomError> {
    let records = load_records(&records_file)?;
    let files: HashSet<&str> = records.iter().map(|r| r.source_file.as_str()).collect();
    let metrics = SessionMetrics::compute(&records, files.len(), Duration::ZERO);

    match output_format {
        "json" => output::json::print(&metrics)?,
        _ => print!("{}", output::table::format_metrics(&metrics)),
    }
    Ok(())
}
