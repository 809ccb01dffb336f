use crate::model::Qty;
use crate::parsing::values::{f64_to_decimal, has_leading_integer};
use rust_decimal::Decimal;

/// Rows scoring below this are queued for human review.
pub const REVIEW_THRESHOLD: Decimal = Decimal::from_parts(90, 0, 0, false, 2);

/// Lowest score a row can report.
pub const MIN_CONFIDENCE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

pub const MAX_CONFIDENCE: Decimal = Decimal::ONE;

/// Used when the model gives no usable OCR confidence for a row.
pub const DEFAULT_OCR_CONFIDENCE: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

const ITEM_PENALTY: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
const QTY_PENALTY: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
const DESCRIPTION_PENALTY: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
const SIZE_PENALTY: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

const MIN_DESCRIPTION_CHARS: usize = 3;

/// The normalized fields of a row that the penalty rules look at.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub item: &'a str,
    pub qty: &'a Qty,
    pub description: &'a str,
    pub size_nd: &'a str,
}

/// Recompute a row's confidence from the model's OCR estimate.
///
/// Penalties are cumulative:
/// - item label missing or not an integer: -0.20
/// - quantity without a numeric value: -0.20
/// - description shorter than 3 characters: -0.10
/// - size/ND missing: -0.05
///
/// The result is clamped to `[0.10, 1.00]`.
pub fn adjust_confidence(base: Decimal, input: &ScoringInput<'_>) -> Decimal {
    let mut score = base;

    if !has_leading_integer(input.item) {
        score -= ITEM_PENALTY;
    }
    if input.qty.value.is_none() {
        score -= QTY_PENALTY;
    }
    if input.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        score -= DESCRIPTION_PENALTY;
    }
    if input.size_nd.trim().is_empty() {
        score -= SIZE_PENALTY;
    }

    score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

pub fn needs_review(confidence: Decimal) -> bool {
    confidence < REVIEW_THRESHOLD
}

/// Convert the model's OCR confidence, falling back to the default when absent.
///
/// Finite values are clamped to `[0, 1]` first; only missing or non-finite
/// values use the default.
pub fn base_confidence(ocr_confidence: Option<f64>) -> Decimal {
    match ocr_confidence {
        Some(v) if v.is_finite() => f64_to_decimal(v.clamp(0.0, 1.0)).unwrap_or(Decimal::ZERO),
        _ => DEFAULT_OCR_CONFIDENCE,
    }
}
