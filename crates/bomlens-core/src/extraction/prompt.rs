use serde_json::{json, Value};

pub const EXTRACTION_PROMPT: &str = r#"
You are an advanced document processing pipeline. Your task is to extract Bill of Materials (BOM) data from a multi-page engineering PDF.
A single PDF file can contain multiple distinct drawings, often one per page.

For each page:
1. Decide whether it contains a distinct engineering drawing with its own title block and a "BILL OF MATERIALS" table.
2. For each distinct drawing, read the title block and record its DrawingNo, Supplier (KENT, TENG, TECSAR, WORLEY, or Unknown) and issued/approved date if shown.
3. Locate the BILL OF MATERIALS table for that drawing. For each row, perform high-fidelity OCR, clean up OCR errors, and record:
   - ITEM: the item number
   - QTY: the quantity exactly as printed, e.g. 43'-4"
   - SIZE_ND: the size or nominal diameter
   - DESCRIPTION: the full item description
   - Page: the page number the row was found on
   - ocrConfidence: your confidence (0.0 to 1.0) in the OCR quality of this row

Group the results by drawing. Return a JSON object with a 'drawings' array, one entry per drawing, strictly following the response schema.
"#;

/// Response schema for `generationConfig.responseSchema`.
pub fn response_schema() -> Value {
    let bom_item = json!({
        "type": "OBJECT",
        "properties": {
            "ITEM": { "type": "STRING", "description": "The final, clean item number." },
            "QTY": { "type": "STRING", "description": "The raw quantity value from the table, e.g., '43'-4\"'." },
            "SIZE_ND": { "type": "STRING", "description": "The final, clean size or nominal diameter value." },
            "DESCRIPTION": { "type": "STRING", "description": "The final, clean, full item description." },
            "Page": { "type": "INTEGER", "description": "The page number where this item was found." },
            "ocrConfidence": { "type": "NUMBER", "description": "Estimated confidence (0.0 to 1.0) in the OCR quality of this row." }
        },
        "required": ["ITEM", "QTY", "SIZE_ND", "DESCRIPTION", "Page", "ocrConfidence"]
    });

    let drawing = json!({
        "type": "OBJECT",
        "properties": {
            "Supplier": { "type": "STRING", "description": "Supplier for this drawing (KENT, TENG, TECSAR, WORLEY, or Unknown)." },
            "DrawingNo": { "type": "STRING", "description": "The drawing number from the title block." },
            "IssuedApprovedDate": { "type": "STRING", "description": "Issued or approved date from the title block, if present." },
            "BOM": {
                "type": "ARRAY",
                "items": bom_item,
                "description": "All items from the Bill of Materials table for this drawing."
            }
        },
        "required": ["Supplier", "DrawingNo", "BOM"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "drawings": {
                "type": "ARRAY",
                "items": drawing,
                "description": "All distinct drawings found in the document."
            }
        },
        "required": ["drawings"]
    })
}
