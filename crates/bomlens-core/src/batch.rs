use crate::assembly::assemble_records;
use crate::error::BomError;
use crate::extraction::{BomExtractor, SourceDocument};
use crate::model::BomRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag, checked at the per-file request boundary.
///
/// Requests already in flight run to completion; their results are dropped.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a batch with failed files is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Any failed file fails the whole batch.
    #[default]
    AllOrNothing,
    /// Records from successful files are kept; failures are logged.
    Partial,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    pub result: Result<Vec<BomRecord>, BomError>,
}

#[derive(Debug)]
pub struct BatchOutcome {
    /// One entry per input file, in input order.
    pub files: Vec<FileOutcome>,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_err()).count()
    }

    pub fn succeeded_count(&self) -> usize {
        self.files.len() - self.failed_count()
    }

    /// Collapse per-file outcomes into one record list under the given policy.
    pub fn into_records(self, policy: BatchPolicy) -> Result<Vec<BomRecord>, BomError> {
        let total = self.files.len();
        let failed = self.failed_count();

        if failed > 0 && policy == BatchPolicy::AllOrNothing {
            let all_cancelled = self
                .files
                .iter()
                .filter_map(|f| f.result.as_ref().err())
                .all(|e| matches!(e, BomError::Cancelled));
            if all_cancelled {
                return Err(BomError::Cancelled);
            }
            return Err(BomError::BatchFailed { failed, total });
        }

        let mut records = Vec::new();
        for outcome in self.files {
            match outcome.result {
                Ok(mut r) => records.append(&mut r),
                Err(e) => {
                    tracing::warn!(file = %outcome.file_name, error = %e, "dropping failed document");
                }
            }
        }
        Ok(records)
    }
}

/// Extract and assemble records for a single document.
pub fn extract_document(
    doc: &SourceDocument,
    extractor: &dyn BomExtractor,
    cancel: &CancelFlag,
) -> Result<Vec<BomRecord>, BomError> {
    if cancel.is_cancelled() {
        return Err(BomError::Cancelled);
    }

    let extraction = extractor.request_extraction(&doc.name, &doc.bytes)?;

    if cancel.is_cancelled() {
        return Err(BomError::Cancelled);
    }

    let records = assemble_records(&doc.name, &extraction);
    tracing::info!(
        file = %doc.name,
        drawings = records.len(),
        rows = records.iter().map(|r| r.bom.len()).sum::<usize>(),
        "document extracted"
    );
    Ok(records)
}

/// Run one extraction request per document concurrently and collect the outcomes.
pub fn run_batch(
    docs: &[SourceDocument],
    extractor: &dyn BomExtractor,
    cancel: &CancelFlag,
) -> BatchOutcome {
    let started = Instant::now();
    tracing::info!(
        files = docs.len(),
        backend = extractor.backend_name(),
        "starting batch extraction"
    );

    let files = std::thread::scope(|s| {
        let handles: Vec<_> = docs
            .iter()
            .map(|doc| s.spawn(move || extract_document(doc, extractor, cancel)))
            .collect();

        handles
            .into_iter()
            .zip(docs)
            .map(|(handle, doc)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(BomError::Extraction(format!(
                        "worker for '{}' panicked",
                        doc.name
                    )))
                });
                if let Err(ref e) = result {
                    tracing::warn!(file = %doc.name, error = %e, "document extraction failed");
                }
                FileOutcome {
                    file_name: doc.name.clone(),
                    result,
                }
            })
            .collect()
    });

    let outcome = BatchOutcome {
        files,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        succeeded = outcome.succeeded_count(),
        failed = outcome.failed_count(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "batch extraction finished"
    );
    outcome
}

/// Run a batch and return records, failing as a whole under `AllOrNothing`.
pub fn extract_batch(
    docs: &[SourceDocument],
    extractor: &dyn BomExtractor,
    cancel: &CancelFlag,
    policy: BatchPolicy,
) -> Result<Vec<BomRecord>, BomError> {
    run_batch(docs, extractor, cancel).into_records(policy)
}
