use crate::model::{Qty, QtyUnit};
use crate::parsing::values::{parse_leading_number, parse_plain_number};
use regex::Regex;
use std::sync::LazyLock;

/// `<feet>'-<inches>"` with either number optional, e.g. `43'-4"`, `5' 6"`, `'6"`.
/// Searched anywhere in the string so `43'-4" LG` still matches.
static FEET_INCHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:(\d+(?:\.\d+)?)\s*)?'\s*-?\s*(?:(\d+(?:\.\d+)?)\s*)?""#)
        .expect("valid regex")
});

/// Normalize a free-text BOM quantity into a typed measurement.
///
/// Never fails: anything unrecognized comes back as `unknown` with no value.
/// The first matching rule wins:
/// - `43'-4"` -> 43.333 ft
/// - `12'` -> 12 ft
/// - `12"` -> 12 in
/// - `3.5m` -> 3.5 m
/// - `7` -> 7 (unitless)
pub fn normalize_qty(raw: &str) -> Qty {
    let s = raw.trim();
    if s.is_empty() {
        return Qty::unparsed(raw);
    }

    let (unit, value) = if let Some(caps) = feet_inches(s) {
        (QtyUnit::Feet, Some(caps))
    } else if s.contains('\'') {
        (QtyUnit::Feet, parse_leading_number(&s.replacen('\'', "", 1)))
    } else if s.contains('"') {
        (QtyUnit::Inches, parse_leading_number(&s.replacen('"', "", 1)))
    } else if s.contains(['m', 'M']) {
        (QtyUnit::Meters, parse_leading_number(s))
    } else {
        (QtyUnit::Unknown, parse_plain_number(s))
    };

    match value.filter(|v| v.is_finite()) {
        Some(v) => Qty {
            raw: raw.to_string(),
            unit,
            value: Some(v),
        },
        None => Qty::unparsed(raw),
    }
}

fn feet_inches(s: &str) -> Option<f64> {
    FEET_INCHES.captures_iter(s).find_map(|caps| {
        let feet = caps.get(1).map(|m| m.as_str());
        let inches = caps.get(2).map(|m| m.as_str());
        if feet.is_none() && inches.is_none() {
            return None;
        }
        let feet: f64 = feet.map_or(Some(0.0), |f| f.parse().ok())?;
        let inches: f64 = inches.map_or(Some(0.0), |i| i.parse().ok())?;
        Some(feet + inches / 12.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let v = actual.expect("expected a value");
        assert!((v - expected).abs() < 1e-9, "{v} != {expected}");
    }

    #[test]
    fn test_feet_and_inches() {
        let q = normalize_qty("43'-4\"");
        assert_eq!(q.unit, QtyUnit::Feet);
        assert_close(q.value, 43.0 + 4.0 / 12.0);
        assert_eq!(q.raw, "43'-4\"");
    }

    #[test]
    fn test_feet_and_inches_with_space() {
        let q = normalize_qty("5' 6\"");
        assert_eq!(q.unit, QtyUnit::Feet);
        assert_close(q.value, 5.5);
    }

    #[test]
    fn test_inches_only_with_feet_marker() {
        let q = normalize_qty("'6\"");
        assert_eq!(q.unit, QtyUnit::Feet);
        assert_close(q.value, 0.5);
    }

    #[test]
    fn test_feet_and_inches_inside_text() {
        for raw in ["43'-4\" LG", "43'-4\" (TYP)", "TOTAL 43'-4\"", "2x 5'-6\""] {
            let q = normalize_qty(raw);
            assert_eq!(q.unit, QtyUnit::Feet, "{raw:?}");
            let expected = if raw.starts_with("2x") { 5.5 } else { 43.0 + 4.0 / 12.0 };
            assert_close(q.value, expected);
            assert_eq!(q.raw, raw);
        }
    }

    #[test]
    fn test_empty_marker_pair_before_measurement() {
        let q = normalize_qty("'\" 5'-6\"");
        assert_eq!(q.unit, QtyUnit::Feet);
        assert_close(q.value, 5.5);
    }

    #[test]
    fn test_feet_then_unrelated_inches() {
        // Only adjacent markers form a feet-and-inches pair.
        let q = normalize_qty("12' PIPE 2\"");
        assert_eq!(q.unit, QtyUnit::Feet);
        assert_close(q.value, 12.0);
    }

    #[test]
    fn test_feet_only() {
        let q = normalize_qty("12'");
        assert_eq!(q.unit, QtyUnit::Feet);
        assert_close(q.value, 12.0);
    }

    #[test]
    fn test_inches() {
        let q = normalize_qty("12\"");
        assert_eq!(q.unit, QtyUnit::Inches);
        assert_close(q.value, 12.0);
    }

    #[test]
    fn test_meters() {
        let q = normalize_qty("3.5m");
        assert_eq!(q.unit, QtyUnit::Meters);
        assert_close(q.value, 3.5);

        let q = normalize_qty("2 M");
        assert_eq!(q.unit, QtyUnit::Meters);
        assert_close(q.value, 2.0);
    }

    #[test]
    fn test_plain_number_is_unitless() {
        let q = normalize_qty("7");
        assert_eq!(q.unit, QtyUnit::Unknown);
        assert_close(q.value, 7.0);
    }

    #[test]
    fn test_empty() {
        let q = normalize_qty("");
        assert_eq!(q, Qty::unparsed(""));
    }

    #[test]
    fn test_garbage_does_not_fail() {
        let q = normalize_qty("abc");
        assert_eq!(q.unit, QtyUnit::Unknown);
        assert_eq!(q.value, None);
        assert_eq!(q.raw, "abc");
    }

    #[test]
    fn test_marker_without_number_drops_unit() {
        assert_eq!(normalize_qty("m").unit, QtyUnit::Unknown);
        assert_eq!(normalize_qty("'\"").value, None);
        assert_eq!(normalize_qty("AS REQ'D").unit, QtyUnit::Unknown);
    }

    #[test]
    fn test_raw_preserved_verbatim() {
        let q = normalize_qty("  12\"  ");
        assert_eq!(q.raw, "  12\"  ");
        assert_close(q.value, 12.0);
    }

    #[test]
    fn test_never_nan_or_infinite() {
        for raw in [
            "NaN", "nan m", "inf", "infinity'", "1e999", "1e999m", "-", ".", "'", "\"", "--4\"",
            "43'-4\"", "0", "1/2\"", "½\"",
        ] {
            let q = normalize_qty(raw);
            if let Some(v) = q.value {
                assert!(v.is_finite(), "{raw:?} produced {v}");
            } else {
                assert_eq!(q.unit, QtyUnit::Unknown, "{raw:?}");
            }
        }
    }
}
