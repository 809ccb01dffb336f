use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::LazyLock;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
});

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("valid regex"));

/// Parse the numeric prefix of a string, ignoring leading whitespace.
///
/// Handles formats like:
/// - "3.5m" -> 3.5
/// - "  12 ft" -> 12
/// - ".5" -> 0.5
/// - "1e3 mm" -> 1000
/// - "m3" -> None
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let m = LEADING_NUMBER.find(s.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole string as a plain finite number.
pub fn parse_plain_number(s: &str) -> Option<f64> {
    let s = s.trim();
    // Reject words f64::from_str accepts ("inf", "NaN", "infinity").
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when the string begins with an integer after trimming.
///
/// Item labels like "12", "7A" or "3." count; "A7", "" and "-" do not.
pub fn has_leading_integer(s: &str) -> bool {
    LEADING_INTEGER.is_match(s.trim())
}

/// Read a JSON field as text. Numbers and booleans are rendered, blanks are absent.
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a JSON field as a page number. Accepts integers, integral floats and numeric strings.
pub fn value_as_page(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|p| u32::try_from(p).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Read a JSON field as a finite number. Numeric strings are accepted.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_plain_number(s),
        _ => None,
    }
}

/// Convert f64 to Decimal, preserving the shortest decimal representation.
///
/// Uses a string round-trip to avoid floating-point artifacts
/// (e.g., 0.85_f64 becoming 0.84999999999999997779...).
pub fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    let s = format!("{f}");
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_leading_number_with_unit_suffix() {
        assert_eq!(parse_leading_number("3.5m"), Some(3.5));
        assert_eq!(parse_leading_number("  12 ft"), Some(12.0));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("-2"), Some(-2.0));
    }

    #[test]
    fn test_leading_number_absent() {
        assert_eq!(parse_leading_number("m"), None);
        assert_eq!(parse_leading_number("LOT"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn test_plain_number_rejects_words() {
        assert_eq!(parse_plain_number("7"), Some(7.0));
        assert_eq!(parse_plain_number(" 2.25 "), Some(2.25));
        assert_eq!(parse_plain_number("inf"), None);
        assert_eq!(parse_plain_number("NaN"), None);
        assert_eq!(parse_plain_number("7 pcs"), None);
    }

    #[test]
    fn test_leading_integer() {
        assert!(has_leading_integer("12"));
        assert!(has_leading_integer(" 7A"));
        assert!(!has_leading_integer("A7"));
        assert!(!has_leading_integer(""));
        assert!(!has_leading_integer("-"));
    }

    #[test]
    fn test_value_as_string() {
        assert_eq!(value_as_string(&json!("DN50")), Some("DN50".into()));
        assert_eq!(value_as_string(&json!(4)), Some("4".into()));
        assert_eq!(value_as_string(&json!("  ")), None);
        assert_eq!(value_as_string(&json!(null)), None);
        assert_eq!(value_as_string(&json!(["a"])), None);
    }

    #[test]
    fn test_value_as_page() {
        assert_eq!(value_as_page(&json!(3)), Some(3));
        assert_eq!(value_as_page(&json!(2.0)), Some(2));
        assert_eq!(value_as_page(&json!("5")), Some(5));
        assert_eq!(value_as_page(&json!(-1)), None);
        assert_eq!(value_as_page(&json!(1.5)), None);
    }

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.85), Some(dec!(0.85)));
        assert_eq!(f64_to_decimal(1.0), Some(dec!(1)));
        assert_eq!(f64_to_decimal(f64::NAN), None);
    }
}
