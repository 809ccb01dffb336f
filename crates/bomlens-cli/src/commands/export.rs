use bomlens_core::error::BomError;
use bomlens_core::export::write_export_file;
use std::path::PathBuf;

use super::extract::timestamped_export_name;
use super::load_records;

pub fn run(records_file: PathBuf, out: Option<PathBuf>) -> Result<(), BomError> {
    let records = load_records(&records_file)?;
    let path = out.unwrap_or_else(|| PathBuf::from(timestamped_export_name()));
    let rows = write_export_file(&records, &path)?;
    println!("Exported {} row(s) to {}", rows, path.display());
    Ok(())
}
