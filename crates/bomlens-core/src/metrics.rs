use crate::model::{BomRecord, Supplier};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

/// Summary figures for the current session's results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub files_processed: usize,
    pub drawings: usize,
    pub rows_extracted: usize,
    /// Mean row confidence, rounded to four places. `None` without rows.
    pub average_confidence: Option<Decimal>,
    pub rows_needing_review: usize,
    pub processing_time_ms: u128,
    /// Supplier with the most rows; ties go to the first seen.
    pub top_supplier: Option<Supplier>,
}

impl SessionMetrics {
    pub fn compute(records: &[BomRecord], files_processed: usize, elapsed: Duration) -> Self {
        let items = || records.iter().flat_map(|r| r.bom.iter());

        let rows_extracted = items().count();
        let average_confidence = if rows_extracted == 0 {
            None
        } else {
            let total: Decimal = items().map(|i| i.confidence).sum();
            Some((total / Decimal::from(rows_extracted)).round_dp(4))
        };

        SessionMetrics {
            files_processed,
            drawings: records.len(),
            rows_extracted,
            average_confidence,
            rows_needing_review: items().filter(|i| i.needs_review).count(),
            processing_time_ms: elapsed.as_millis(),
            top_supplier: top_supplier(records),
        }
    }

    pub fn review_ratio(&self) -> Option<Decimal> {
        if self.rows_extracted == 0 {
            return None;
        }
        Some(
            (Decimal::from(self.rows_needing_review) / Decimal::from(self.rows_extracted))
                .round_dp(4),
        )
    }
}

fn top_supplier(records: &[BomRecord]) -> Option<Supplier> {
    let mut counts: Vec<(Supplier, usize)> = Vec::new();
    for record in records {
        if record.bom.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(s, _)| *s == record.supplier) {
            Some((_, n)) => *n += record.bom.len(),
            None => counts.push((record.supplier, record.bom.len())),
        }
    }

    // max_by_key returns the last maximum; walk in reverse so the first seen wins ties.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, n)| *n)
        .map(|(s, _)| s)
}
