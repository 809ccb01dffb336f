use bomlens_core::error::BomError;
use bomlens_core::normalize_qty;

pub fn run(quantities: &[String]) -> Result<(), BomError> {
    let width = quantities.iter().map(|q| q.len()).max().unwrap_or(0);
    for raw in quantities {
        let qty = normalize_qty(raw);
        let value = qty
            .value
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "-".into());
        println!("  {:<width$}  -> {:<8} {}", raw, qty.unit.to_string(), value);
    }
    Ok(())
}
