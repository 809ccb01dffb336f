//! Integration tests for the extraction pipeline end to end.
//!
//! Uses a MockExtractor that returns canned model responses without
//! calling the hosted model, so these tests run offline.

use bomlens_core::error::BomError;
use bomlens_core::export::write_csv;
use bomlens_core::extraction::{BomExtractor, SourceDocument};
use bomlens_core::model::{QtyUnit, Supplier};
use bomlens_core::parsing::{parse_response, RawExtraction};
use bomlens_core::session::{ExtractionStatus, Session};
use bomlens_core::{extract_batch, extract_pdf, process_response, BatchPolicy, CancelFlag};
use rust_decimal_macros::dec;
use std::collections::HashMap;

struct MockExtractor {
    responses: HashMap<String, String>,
}

impl MockExtractor {
    fn new(responses: &[(&str, &str)]) -> Self {
        MockExtractor {
            responses: responses
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl BomExtractor for MockExtractor {
    fn request_extraction(
        &self,
        file_name: &str,
        _pdf_bytes: &[u8],
    ) -> Result<RawExtraction, BomError> {
        match self.responses.get(file_name) {
            Some(text) => parse_response(text),
            None => Err(BomError::Service {
                status: 500,
                body: "internal".into(),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

const TWO_DRAWINGS: &str = r#"{
  "drawings": [
    {
      "Supplier": "KENT",
      "DrawingNo": "KNT-ISO-0041",
      "IssuedApprovedDate": "12-FEB-2024",
      "BOM": [
        { "ITEM": "1", "QTY": "43'-4\"", "SIZE_ND": "DN50", "DESCRIPTION": "PIPE SMLS BE ASTM A106 GR.B", "Page": 1, "ocrConfidence": 0.97 },
        { "ITEM": "2", "QTY": "3.5m", "SIZE_ND": "DN50", "DESCRIPTION": "ELBOW 90 LR", "Page": 1, "ocrConfidence": 0.92 },
        { "ITEM": "", "QTY": "AS REQ", "SIZE_ND": "DN50", "DESCRIPTION": "ok desc", "Page": 1, "ocrConfidence": 0.85 }
      ]
    },
    {
      "Supplier": "Unknown",
      "BOM": [
        { "ITEM": "1", "QTY": "7", "SIZE_ND": "", "DESCRIPTION": "GASKET SPW", "ocrConfidence": 0.99 }
      ]
    },
    {
      "BOM": []
    }
  ]
}"#;

const ONE_DRAWING: &str = r#"{
  "drawings": [
    {
      "Supplier": "worley",
      "DrawingNo": "WP-200",
      "BOM": [
        { "ITEM": "1", "QTY": "12\"", "SIZE_ND": "2\"", "DESCRIPTION": "NIPPLE", "Page": 3, "ocrConfidence": 0.95 }
      ]
    }
  ]
}"#;

// ---------------------------------------------------------------------------
// Single document with several drawings
// ---------------------------------------------------------------------------
#[test]
fn single_document_multiple_drawings() {
    let extractor = MockExtractor::new(&[("iso.pdf", TWO_DRAWINGS)]);
    let records = extract_pdf(b"%PDF", "iso.pdf", &extractor).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].supplier, Supplier::Kent);
    assert_eq!(records[0].drawing_no, "KNT-ISO-0041");
    assert_eq!(records[0].issued_approved_date.as_deref(), Some("12-FEB-2024"));
    assert_eq!(records[1].drawing_no, "N/A (Drawing 2)");
    assert_eq!(records[2].drawing_no, "N/A (Drawing 3)");
    assert!(records[2].bom.is_empty());

    let pipe = &records[0].bom[0];
    assert_eq!(pipe.qty.unit, QtyUnit::Feet);
    assert!((pipe.qty.value.unwrap() - 43.333_333).abs() < 1e-3);
    assert_eq!(pipe.confidence, dec!(0.97));
    assert!(!pipe.needs_review);

    let elbow = &records[0].bom[1];
    assert_eq!(elbow.qty.unit, QtyUnit::Meters);
    assert_eq!(elbow.qty.value, Some(3.5));

    // Missing label and unparsable quantity: 0.85 - 0.20 - 0.20
    let blank = &records[0].bom[2];
    assert_eq!(blank.confidence, dec!(0.45));
    assert!(blank.needs_review);

    // Missing size and page: 0.99 - 0.05
    let gasket = &records[1].bom[0];
    assert_eq!(gasket.qty.unit, QtyUnit::Unknown);
    assert_eq!(gasket.qty.value, Some(7.0));
    assert_eq!(gasket.page, 0);
    assert_eq!(gasket.confidence, dec!(0.94));
    assert_eq!(gasket.id, "iso.pdf-drawing-1-item-0");
}

// ---------------------------------------------------------------------------
// Scores stay in range and the review flag follows the threshold
// ---------------------------------------------------------------------------
#[test]
fn confidence_invariants_hold() {
    let records = process_response("iso.pdf", TWO_DRAWINGS).unwrap();
    for item in records.iter().flat_map(|r| r.bom.iter()) {
        assert!(item.confidence >= dec!(0.10) && item.confidence <= dec!(1.0));
        assert_eq!(item.needs_review, item.confidence < dec!(0.90));
        if let Some(v) = item.qty.value {
            assert!(v.is_finite());
        }
    }
}

// ---------------------------------------------------------------------------
// Re-running assembly on the same response is byte-identical
// ---------------------------------------------------------------------------
#[test]
fn assembly_is_deterministic() {
    let a = process_response("iso.pdf", TWO_DRAWINGS).unwrap();
    let b = process_response("iso.pdf", TWO_DRAWINGS).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

// ---------------------------------------------------------------------------
// A response without a drawings array is zero drawings, not an error
// ---------------------------------------------------------------------------
#[test]
fn missing_drawings_array_yields_no_records() {
    let extractor = MockExtractor::new(&[("blank.pdf", r#"{"note": "no BOM found"}"#)]);
    let records = extract_pdf(b"%PDF", "blank.pdf", &extractor).unwrap();
    assert!(records.is_empty());
}

// ---------------------------------------------------------------------------
// Batch: documents concatenated in input order
// ---------------------------------------------------------------------------
#[test]
fn batch_concatenates_in_input_order() {
    let extractor = MockExtractor::new(&[("iso.pdf", TWO_DRAWINGS), ("wp.pdf", ONE_DRAWING)]);
    let docs = vec![
        SourceDocument::new("wp.pdf", vec![]),
        SourceDocument::new("iso.pdf", vec![]),
    ];
    let records = extract_batch(
        &docs,
        &extractor,
        &CancelFlag::new(),
        BatchPolicy::AllOrNothing,
    )
    .unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].source_file, "wp.pdf");
    assert_eq!(records[0].supplier, Supplier::Worley);
    assert_eq!(records[0].bom[0].qty.unit, QtyUnit::Inches);
    assert_eq!(records[1].source_file, "iso.pdf");
}

// ---------------------------------------------------------------------------
// Batch: one failing file and the two policies
// ---------------------------------------------------------------------------
#[test]
fn batch_failure_policies() {
    let extractor = MockExtractor::new(&[("wp.pdf", ONE_DRAWING)]);
    let docs = vec![
        SourceDocument::new("wp.pdf", vec![]),
        SourceDocument::new("missing.pdf", vec![]),
    ];

    let err = extract_batch(
        &docs,
        &extractor,
        &CancelFlag::new(),
        BatchPolicy::AllOrNothing,
    )
    .unwrap_err();
    assert!(matches!(err, BomError::BatchFailed { failed: 1, total: 2 }));

    let records =
        extract_batch(&docs, &extractor, &CancelFlag::new(), BatchPolicy::Partial).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].drawing_no, "WP-200");
}

// ---------------------------------------------------------------------------
// Session round trip: extract, edit, export
// ---------------------------------------------------------------------------
#[test]
fn session_extract_edit_export() {
    let extractor = MockExtractor::new(&[("iso.pdf", TWO_DRAWINGS)]);
    let mut session = Session::new();
    session.add_files([SourceDocument::new("iso.pdf", b"%PDF".to_vec())]);
    session
        .extract(&extractor, &CancelFlag::new(), BatchPolicy::AllOrNothing)
        .unwrap();
    assert_eq!(session.status(), ExtractionStatus::Review);

    let before = session.metrics();
    assert_eq!(before.rows_extracted, 4);
    assert_eq!(before.rows_needing_review, 1);
    assert_eq!(before.top_supplier, Some(Supplier::Kent));

    session
        .edit_item(
            "iso.pdf-drawing-0-item-2",
            bomlens_core::session::ItemEdit {
                item: Some("3".into()),
                qty_raw: Some("2'".into()),
                ..Default::default()
            },
        )
        .unwrap();
    // Both penalties lifted, back to the model's 0.85, which still needs review.
    let edited = session.find_item("iso.pdf-drawing-0-item-2").unwrap();
    assert_eq!(edited.confidence, dec!(0.85));
    assert!(edited.needs_review);
    assert!(session.metrics().average_confidence > before.average_confidence);

    let mut buf = Vec::new();
    let rows = write_csv(session.records(), &mut buf).unwrap();
    assert_eq!(rows, 4);
    let csv = String::from_utf8(buf).unwrap();
    assert!(csv.contains("iso.pdf,KENT,KNT-ISO-0041,3,2',ft,2.0,DN50,ok desc,1,Yes,85.0%"));
}
