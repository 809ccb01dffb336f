use crate::confidence::{adjust_confidence, base_confidence, needs_review, ScoringInput};
use crate::model::{BomItem, BomRecord, Supplier};
use crate::parsing::quantity::normalize_qty;
use crate::parsing::{RawBomRow, RawDrawing, RawExtraction};

/// Turn one document's raw extraction into finished records, one per drawing.
///
/// Drawing and row order follow the model's output. Missing supplier, drawing
/// number and page fall back to defaults instead of failing.
pub fn assemble_records(source_file: &str, extraction: &RawExtraction) -> Vec<BomRecord> {
    extraction
        .drawings
        .iter()
        .enumerate()
        .map(|(drawing_index, drawing)| assemble_drawing(source_file, drawing_index, drawing))
        .collect()
}

fn assemble_drawing(source_file: &str, drawing_index: usize, drawing: &RawDrawing) -> BomRecord {
    let drawing_no = drawing
        .drawing_no
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| placeholder_drawing_no(drawing_index));

    let bom = drawing
        .bom
        .iter()
        .enumerate()
        .map(|(item_index, row)| {
            assemble_item(item_id(source_file, drawing_index, item_index), row)
        })
        .collect();

    BomRecord {
        source_file: source_file.to_string(),
        supplier: drawing
            .supplier
            .as_deref()
            .map(Supplier::from_str_loose)
            .unwrap_or_default(),
        drawing_no,
        issued_approved_date: drawing.issued_approved_date.clone(),
        bom,
    }
}

fn assemble_item(id: String, row: &RawBomRow) -> BomItem {
    let item = row.item.clone().unwrap_or_default();
    let size_nd = row.size_nd.clone().unwrap_or_default();
    let description = row.description.clone().unwrap_or_default();
    let qty = normalize_qty(row.qty.as_deref().unwrap_or_default());

    let ocr_confidence = base_confidence(row.ocr_confidence);
    let confidence = adjust_confidence(
        ocr_confidence,
        &ScoringInput {
            item: &item,
            qty: &qty,
            description: &description,
            size_nd: &size_nd,
        },
    );

    BomItem {
        id,
        item,
        qty,
        size_nd,
        description,
        page: row.page.unwrap_or(0),
        ocr_confidence,
        confidence,
        needs_review: needs_review(confidence),
    }
}

/// Re-run normalization and scoring after a reviewer changed a row.
pub fn rescore_item(item: &mut BomItem) {
    item.qty = normalize_qty(&item.qty.raw);
    item.confidence = adjust_confidence(
        item.ocr_confidence,
        &ScoringInput {
            item: &item.item,
            qty: &item.qty,
            description: &item.description,
            size_nd: &item.size_nd,
        },
    );
    item.needs_review = needs_review(item.confidence);
}

pub fn item_id(source_file: &str, drawing_index: usize, item_index: usize) -> String {
    format!("{source_file}-drawing-{drawing_index}-item-{item_index}")
}

fn placeholder_drawing_no(drawing_index: usize) -> String {
    format!("N/A (Drawing {})", drawing_index + 1)
}
