pub mod quantity;
pub mod values;

use crate::error::BomError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use values::{value_as_f64, value_as_page, value_as_string};

/// One BOM table row as returned by the model. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBomRow {
    pub item: Option<String>,
    pub qty: Option<String>,
    pub size_nd: Option<String>,
    pub description: Option<String>,
    pub page: Option<u32>,
    pub ocr_confidence: Option<f64>,
}

/// One drawing (title block + BOM table) found in a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDrawing {
    pub supplier: Option<String>,
    pub drawing_no: Option<String>,
    pub issued_approved_date: Option<String>,
    pub bom: Vec<RawBomRow>,
}

/// The model's structured answer for a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawExtraction {
    pub drawings: Vec<RawDrawing>,
}

/// Decode the model's JSON answer into a `RawExtraction`.
///
/// Only malformed JSON is an error. A document without a `drawings` array
/// yields zero drawings, and entries that are not objects are skipped.
pub fn parse_response(text: &str) -> Result<RawExtraction, BomError> {
    let json: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| BomError::ResponseParse(e.to_string()))?;
    Ok(extraction_from_value(&json))
}

/// Build a `RawExtraction` from an already-decoded JSON document.
pub fn extraction_from_value(json: &Value) -> RawExtraction {
    let Some(drawings) = json.get("drawings").and_then(Value::as_array) else {
        tracing::warn!("model response did not contain a 'drawings' array");
        return RawExtraction::default();
    };

    let drawings = drawings
        .iter()
        .enumerate()
        .filter_map(|(i, d)| match d.as_object() {
            Some(obj) => Some(drawing_from_object(obj)),
            None => {
                tracing::warn!(index = i, "skipping drawing entry that is not an object");
                None
            }
        })
        .collect();

    RawExtraction { drawings }
}

fn drawing_from_object(obj: &Map<String, Value>) -> RawDrawing {
    let bom = match obj.get("BOM") {
        Some(Value::Array(rows)) => rows
            .iter()
            .filter_map(|r| match r.as_object() {
                Some(row) => Some(row_from_object(row)),
                None => {
                    tracing::warn!("skipping BOM row that is not an object");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    RawDrawing {
        supplier: text_field(obj, "Supplier"),
        drawing_no: text_field(obj, "DrawingNo"),
        issued_approved_date: text_field(obj, "IssuedApprovedDate"),
        bom,
    }
}

fn row_from_object(obj: &Map<String, Value>) -> RawBomRow {
    RawBomRow {
        item: text_field(obj, "ITEM"),
        qty: text_field(obj, "QTY"),
        size_nd: text_field(obj, "SIZE_ND"),
        description: text_field(obj, "DESCRIPTION"),
        page: obj.get("Page").and_then(value_as_page),
        ocr_confidence: obj.get("ocrConfidence").and_then(value_as_f64),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(value_as_string)
}

/// Models sometimes wrap JSON in a ```json fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
