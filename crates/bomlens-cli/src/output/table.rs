use bomlens_core::export::format_confidence;
use bomlens_core::metrics::SessionMetrics;
use bomlens_core::model::BomRecord;
use std::fmt::Write;

pub fn print_records(records: &[BomRecord]) {
    print!("{}", format_records(records));
}

pub fn format_records(records: &[BomRecord]) -> String {
    let mut out = String::new();

    if records.is_empty() {
        writeln!(out, "No drawings found.").ok();
        return out;
    }

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            writeln!(out).ok();
        }
        write!(
            out,
            "=== {} | {} | {}",
            record.source_file, record.drawing_no, record.supplier
        )
        .ok();
        if let Some(ref date) = record.issued_approved_date {
            write!(out, " | {date}").ok();
        }
        writeln!(out, " ===\n").ok();

        if record.bom.is_empty() {
            writeln!(out, "  (no BOM rows)").ok();
            continue;
        }

        let item_w = column_width(record.bom.iter().map(|b| b.item.as_str()), "Item");
        let qty_w = column_width(record.bom.iter().map(|b| b.qty.raw.as_str()), "Qty");
        let size_w = column_width(record.bom.iter().map(|b| b.size_nd.as_str()), "Size/ND");

        writeln!(
            out,
            "  {:<item_w$}  {:<qty_w$}  {:<12}  {:<size_w$}  {:>4}  {:>7}  Description",
            "Item", "Qty", "Parsed", "Size/ND", "Page", "Conf",
        )
        .ok();

        for item in &record.bom {
            let review_marker = if item.needs_review { " (?)" } else { "" };
            writeln!(
                out,
                "  {:<item_w$}  {:<qty_w$}  {:<12}  {:<size_w$}  {:>4}  {:>7}  {}{}",
                item.item,
                item.qty.raw,
                item.qty.to_string(),
                item.size_nd,
                item.page,
                format_confidence(item.confidence),
                item.description,
                review_marker,
            )
            .ok();
        }

        let flagged = record.items_needing_review().count();
        if flagged > 0 {
            writeln!(out, "\n  {flagged} row(s) need review").ok();
        }
    }

    out
}

pub fn format_metrics(metrics: &SessionMetrics) -> String {
    let mut out = String::new();
    let avg = metrics
        .average_confidence
        .map(format_confidence)
        .unwrap_or_else(|| "-".into());
    let top = metrics
        .top_supplier
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".into());

    writeln!(out, "  Files processed:      {}", metrics.files_processed).ok();
    writeln!(out, "  Drawings:             {}", metrics.drawings).ok();
    writeln!(out, "  BOM rows extracted:   {}", metrics.rows_extracted).ok();
    writeln!(out, "  Average confidence:   {avg}").ok();
    writeln!(out, "  Rows needing review:  {}", metrics.rows_needing_review).ok();
    if metrics.processing_time_ms > 0 {
        writeln!(
            out,
            "  Processing time:      {:.1}s",
            metrics.processing_time_ms as f64 / 1000.0
        )
        .ok();
    }
    writeln!(out, "  Top supplier:         {top}").ok();
    out
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_records_message() {
        assert_eq!(format_records(&[]), "No drawings found.\n");
    }

    #[test]
    fn records_table_marks_review_rows() {
        let records = bomlens_core::process_response(
            "a.pdf",
            r#"{"drawings": [{"Supplier": "TENG", "DrawingNo": "T-1", "BOM": [
                {"ITEM": "1", "QTY": "12\"", "SIZE_ND": "DN25", "DESCRIPTION": "VALVE GATE", "Page": 1, "ocrConfidence": 0.95},
                {"ITEM": "x", "QTY": "?", "SIZE_ND": "DN25", "DESCRIPTION": "BOLT", "Page": 1, "ocrConfidence": 0.95}
            ]}]}"#,
        )
        .unwrap();
        let text = format_records(&records);
        assert!(text.contains("=== a.pdf | T-1 | TENG ==="));
        assert!(text.contains("12 in"));
        assert!(text.contains("BOLT (?)"));
        assert!(text.contains("1 row(s) need review"));
    }

    #[test]
    fn metrics_without_rows() {
        let m = SessionMetrics::compute(&[], 0, Duration::ZERO);
        let text = format_metrics(&m);
        assert!(text.contains("Average confidence:   -"));
        assert!(!text.contains("Processing time"));
    }
}
