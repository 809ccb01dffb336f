use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QtyUnit {
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "in")]
    Inches,
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl fmt::Display for QtyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QtyUnit::Meters => write!(f, "m"),
            QtyUnit::Feet => write!(f, "ft"),
            QtyUnit::Inches => write!(f, "in"),
            QtyUnit::Unknown => write!(f, "unknown"),
        }
    }
}

/// A quantity as read from a BOM table, with its parsed measurement.
///
/// `value` is always finite when present, and `unit` is `Unknown` whenever
/// `value` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qty {
    pub raw: String,
    pub unit: QtyUnit,
    pub value: Option<f64>,
}

impl Qty {
    pub fn unparsed(raw: &str) -> Self {
        Qty {
            raw: raw.to_string(),
            unit: QtyUnit::Unknown,
            value: None,
        }
    }
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.value, self.unit) {
            (Some(v), QtyUnit::Unknown) => write!(f, "{v}"),
            (Some(v), unit) => write!(f, "{v} {unit}"),
            (None, _) => write!(f, "?"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supplier {
    #[serde(rename = "KENT")]
    Kent,
    #[serde(rename = "TENG")]
    Teng,
    #[serde(rename = "TECSAR")]
    Tecsar,
    #[serde(rename = "WORLEY")]
    Worley,
    #[default]
    Unknown,
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Supplier::Kent => write!(f, "KENT"),
            Supplier::Teng => write!(f, "TENG"),
            Supplier::Tecsar => write!(f, "TECSAR"),
            Supplier::Worley => write!(f, "WORLEY"),
            Supplier::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Supplier {
    pub fn from_str_loose(s: &str) -> Supplier {
        match s.trim().to_uppercase().as_str() {
            "KENT" => Supplier::Kent,
            "TENG" => Supplier::Teng,
            "TECSAR" => Supplier::Tecsar,
            "WORLEY" => Supplier::Worley,
            _ => Supplier::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    pub id: String,
    #[serde(rename = "ITEM")]
    pub item: String,
    #[serde(rename = "QTY")]
    pub qty: Qty,
    #[serde(rename = "SIZE_ND")]
    pub size_nd: String,
    #[serde(rename = "DESCRIPTION")]
    pub description: String,
    #[serde(rename = "Page")]
    pub page: u32,
    /// Row confidence as reported by the model, before adjustment.
    #[serde(rename = "OcrConfidence")]
    pub ocr_confidence: Decimal,
    #[serde(rename = "Confidence")]
    pub confidence: Decimal,
    pub needs_review: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomRecord {
    #[serde(rename = "SourceFile")]
    pub source_file: String,
    #[serde(rename = "Supplier")]
    pub supplier: Supplier,
    #[serde(rename = "DrawingNo")]
    pub drawing_no: String,
    #[serde(
        rename = "IssuedApprovedDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub issued_approved_date: Option<String>,
    #[serde(rename = "BOM")]
    pub bom: Vec<BomItem>,
}

impl BomRecord {
    pub fn items_needing_review(&self) -> impl Iterator<Item = &BomItem> {
        self.bom.iter().filter(|item| item.needs_review)
    }
}
