use bomlens_core::error::BomError;
use std::path::PathBuf;

use crate::output;

pub fn run(
    response_file: PathBuf,
    source_file: Option<String>,
    output_format: &str,
) -> Result<(), BomError> {
    let text = std::fs::read_to_string(&response_file)?;
    let source = source_file.unwrap_or_else(|| {
        response_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| response_file.display().to_string())
    });

    let records = bomlens_core::process_response(&source, &text)?;

    match output_format {
        "json" => output::json::print(&records)?,
        _ => output::table::print_records(&records),
    }

    Ok(())
}
