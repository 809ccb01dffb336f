use bomlens_core::config::ExtractorConfig;
use bomlens_core::error::BomError;
use bomlens_core::export::{default_export_name, write_export_file};
use bomlens_core::extraction::gemini::GeminiExtractor;
use bomlens_core::extraction::SourceDocument;
use bomlens_core::session::Session;
use bomlens_core::{BatchPolicy, CancelFlag};
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(
    input_files: Vec<PathBuf>,
    output_format: &str,
    out: Option<PathBuf>,
    export: Option<PathBuf>,
    partial: bool,
    config_file: Option<PathBuf>,
) -> Result<(), BomError> {
    dotenvy::dotenv().ok();
    let config = ExtractorConfig::load(config_file.as_deref())?;
    let extractor = GeminiExtractor::new(&config)?;

    let mut session = Session::new();
    let docs = input_files
        .iter()
        .map(|p| SourceDocument::from_path(p))
        .collect::<Result<Vec<_>, _>>()?;
    let queued = session.add_files(docs);
    if queued < input_files.len() {
        eprintln!(
            "Skipped {} file(s) with duplicate names",
            input_files.len() - queued
        );
    }

    // Ctrl-C stops files that have not been sent yet.
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.cancel()) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    let policy = if partial {
        BatchPolicy::Partial
    } else {
        BatchPolicy::AllOrNothing
    };

    eprintln!(
        "Extracting BOM from {} file(s) with {}...",
        session.files().len(),
        config.model
    );
    session.extract(&extractor, &cancel, policy)?;

    match output_format {
        "json" => output::json::print(session.records())?,
        _ => output::table::print_records(session.records()),
    }

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(session.records())?;
        std::fs::write(&path, json)?;
        eprintln!(
            "Wrote {} drawing record(s) to {}",
            session.records().len(),
            path.display()
        );
    }

    if let Some(target) = export {
        let path = export_path(&target);
        let rows = write_export_file(session.records(), &path)?;
        eprintln!("Exported {} row(s) to {}", rows, path.display());
    }

    eprintln!();
    eprint!("{}", output::table::format_metrics(&session.metrics()));

    Ok(())
}

/// A directory target gets the default timestamped file name.
fn export_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(timestamped_export_name())
    } else {
        target.to_path_buf()
    }
}

pub fn timestamped_export_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S");
    default_export_name(&timestamp.to_string())
}
