//! Explicit application state for one extraction session.
//!
//! Holds the upload queue, the current extraction status, the extracted
//! records and the last error. Front ends own a `Session` and pass it to
//! whatever renders it.

use crate::assembly::rescore_item;
use crate::batch::{run_batch, BatchPolicy, CancelFlag};
use crate::error::BomError;
use crate::extraction::{BomExtractor, SourceDocument};
use crate::metrics::SessionMetrics;
use crate::model::{BomItem, BomRecord};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Processing,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    #[default]
    Idle,
    Extracting,
    Review,
    Error,
}

#[derive(Debug, Clone)]
pub struct QueuedFile {
    pub document: SourceDocument,
    pub status: FileStatus,
}

/// Reviewer changes to one BOM row. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub item: Option<String>,
    pub qty_raw: Option<String>,
    pub size_nd: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    files: Vec<QueuedFile>,
    status: ExtractionStatus,
    records: Vec<BomRecord>,
    error: Option<String>,
    last_elapsed: Duration,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[QueuedFile] {
        &self.files
    }

    pub fn status(&self) -> ExtractionStatus {
        self.status
    }

    pub fn records(&self) -> &[BomRecord] {
        &self.records
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Queue documents, skipping names already in the queue.
    ///
    /// Adding files invalidates previous results. Returns how many were added.
    pub fn add_files(&mut self, docs: impl IntoIterator<Item = SourceDocument>) -> usize {
        let mut added = 0;
        for doc in docs {
            if self.files.iter().any(|f| f.document.name == doc.name) {
                tracing::debug!(file = %doc.name, "already queued");
                continue;
            }
            self.files.push(QueuedFile {
                document: doc,
                status: FileStatus::Pending,
            });
            added += 1;
        }
        self.status = ExtractionStatus::Idle;
        self.records.clear();
        added
    }

    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.document.name != name);
        self.files.len() != before
    }

    /// Drop queued files and results.
    pub fn clear_all(&mut self) {
        self.files.clear();
        self.records.clear();
        self.status = ExtractionStatus::Idle;
    }

    /// Return to a fresh session, as on sign-out.
    pub fn reset(&mut self) {
        *self = Session::default();
    }

    pub fn can_extract(&self) -> bool {
        !self.files.is_empty() && self.status != ExtractionStatus::Extracting
    }

    /// Extract every queued file and move to `Review` or `Error`.
    pub fn extract(
        &mut self,
        extractor: &dyn BomExtractor,
        cancel: &CancelFlag,
        policy: BatchPolicy,
    ) -> Result<&[BomRecord], BomError> {
        if self.files.is_empty() {
            return Ok(&self.records);
        }

        self.status = ExtractionStatus::Extracting;
        self.error = None;
        self.records.clear();
        for f in &mut self.files {
            f.status = FileStatus::Processing;
        }

        let docs: Vec<SourceDocument> = self.files.iter().map(|f| f.document.clone()).collect();
        let outcome = run_batch(&docs, extractor, cancel);
        self.last_elapsed = outcome.elapsed;

        for (queued, file_outcome) in self.files.iter_mut().zip(&outcome.files) {
            queued.status = if file_outcome.result.is_ok() {
                FileStatus::Success
            } else {
                FileStatus::Error
            };
        }

        match outcome.into_records(policy) {
            Ok(records) => {
                self.records = records;
                self.status = ExtractionStatus::Review;
                Ok(&self.records)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.status = ExtractionStatus::Error;
                Err(e)
            }
        }
    }

    pub fn find_item(&self, item_id: &str) -> Option<&BomItem> {
        self.records
            .iter()
            .flat_map(|r| r.bom.iter())
            .find(|i| i.id == item_id)
    }

    /// Apply a reviewer edit in place and re-score the row.
    pub fn edit_item(&mut self, item_id: &str, edit: ItemEdit) -> Result<&BomItem, BomError> {
        let item = self
            .records
            .iter_mut()
            .flat_map(|r| r.bom.iter_mut())
            .find(|i| i.id == item_id)
            .ok_or_else(|| BomError::UnknownItem(item_id.to_string()))?;

        if let Some(v) = edit.item {
            item.item = v;
        }
        if let Some(v) = edit.qty_raw {
            item.qty.raw = v;
        }
        if let Some(v) = edit.size_nd {
            item.size_nd = v;
        }
        if let Some(v) = edit.description {
            item.description = v;
        }
        rescore_item(item);
        Ok(item)
    }

    /// Replace results with records loaded from a saved session.
    pub fn load_records(&mut self, records: Vec<BomRecord>) {
        self.records = records;
        self.status = ExtractionStatus::Review;
        self.error = None;
    }

    pub fn metrics(&self) -> SessionMetrics {
        let processed = self
            .files
            .iter()
            .filter(|f| f.status == FileStatus::Success)
            .count();
        SessionMetrics::compute(&self.records, processed, self.last_elapsed)
    }
}
