use crate::error::BomError;
use crate::model::BomRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const SHEET_NAME: &str = "BOM Data";

/// Column headers, in export order.
pub const EXPORT_HEADERS: [&str; 12] = [
    "Source File",
    "Supplier",
    "Drawing No",
    "Item",
    "Qty (Raw)",
    "Qty (Unit)",
    "Qty (Value)",
    "Size/ND",
    "Description",
    "Page",
    "Needs Review",
    "Confidence",
];

/// One spreadsheet row: a BOM item with its drawing's context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Source File")]
    pub source_file: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Drawing No")]
    pub drawing_no: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Qty (Raw)")]
    pub qty_raw: String,
    #[serde(rename = "Qty (Unit)")]
    pub qty_unit: String,
    #[serde(rename = "Qty (Value)")]
    pub qty_value: Option<f64>,
    #[serde(rename = "Size/ND")]
    pub size_nd: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Page")]
    pub page: u32,
    #[serde(rename = "Needs Review")]
    pub needs_review: &'static str,
    #[serde(rename = "Confidence")]
    pub confidence: String,
}

/// Render a confidence as a percentage with one decimal place, e.g. `45.0%`.
pub fn format_confidence(confidence: Decimal) -> String {
    let pct = (confidence * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.1}%")
}

pub fn flatten_records(records: &[BomRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .flat_map(|record| {
            record.bom.iter().map(move |item| ExportRow {
                source_file: record.source_file.clone(),
                supplier: record.supplier.to_string(),
                drawing_no: record.drawing_no.clone(),
                item: item.item.clone(),
                qty_raw: item.qty.raw.clone(),
                qty_unit: item.qty.unit.to_string(),
                qty_value: item.qty.value,
                size_nd: item.size_nd.clone(),
                description: item.description.clone(),
                page: item.page,
                needs_review: if item.needs_review { "Yes" } else { "No" },
                confidence: format_confidence(item.confidence),
            })
        })
        .collect()
}

/// Write all BOM rows as CSV with a header line.
pub fn write_csv<W: Write>(records: &[BomRecord], writer: W) -> Result<usize, BomError> {
    let rows = flatten_records(records);
    if rows.is_empty() {
        return Err(BomError::NothingToExport);
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

pub fn write_csv_file(records: &[BomRecord], path: &Path) -> Result<usize, BomError> {
    if flatten_records(records).is_empty() {
        return Err(BomError::NothingToExport);
    }
    let file = std::fs::File::create(path)?;
    let n = write_csv(records, std::io::BufWriter::new(file))?;
    tracing::info!(rows = n, path = %path.display(), "exported BOM rows");
    Ok(n)
}

/// Build a one-sheet workbook with a header row followed by every BOM row.
fn build_workbook(records: &[BomRecord]) -> Result<(Workbook, usize), BomError> {
    let rows = flatten_records(records);
    if rows.is_empty() {
        return Err(BomError::NothingToExport);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, header) in (0u16..).zip(EXPORT_HEADERS) {
        sheet.write_string(0, col, header)?;
    }
    for (row_idx, row) in (1u32..).zip(&rows) {
        write_xlsx_row(sheet, row_idx, row)?;
    }
    Ok((workbook, rows.len()))
}

fn write_xlsx_row(sheet: &mut Worksheet, row: u32, r: &ExportRow) -> Result<(), BomError> {
    sheet.write_string(row, 0, &r.source_file)?;
    sheet.write_string(row, 1, &r.supplier)?;
    sheet.write_string(row, 2, &r.drawing_no)?;
    sheet.write_string(row, 3, &r.item)?;
    sheet.write_string(row, 4, &r.qty_raw)?;
    sheet.write_string(row, 5, &r.qty_unit)?;
    if let Some(v) = r.qty_value {
        sheet.write_number(row, 6, v)?;
    }
    sheet.write_string(row, 7, &r.size_nd)?;
    sheet.write_string(row, 8, &r.description)?;
    sheet.write_number(row, 9, f64::from(r.page))?;
    sheet.write_string(row, 10, r.needs_review)?;
    sheet.write_string(row, 11, &r.confidence)?;
    Ok(())
}

/// Serialize the workbook to bytes, e.g. for a download response.
pub fn write_xlsx_buffer(records: &[BomRecord]) -> Result<Vec<u8>, BomError> {
    let (mut workbook, _) = build_workbook(records)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx_file(records: &[BomRecord], path: &Path) -> Result<usize, BomError> {
    let (mut workbook, n) = build_workbook(records)?;
    workbook.save(path)?;
    tracing::info!(rows = n, path = %path.display(), "exported BOM rows");
    Ok(n)
}

/// Write to `path`, choosing CSV for a `.csv` extension and xlsx otherwise.
pub fn write_export_file(records: &[BomRecord], path: &Path) -> Result<usize, BomError> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv_file(records, path)
    } else {
        write_xlsx_file(records, path)
    }
}

/// Default export file name for a timestamp such as `2024-05-01T10-30-00`.
pub fn default_export_name(timestamp: &str) -> String {
    format!("BOM_Export_{timestamp}.xlsx")
}
