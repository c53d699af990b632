//! Cell coercion by declared column type
//!
//! Coercion never fails. A cell that does not fit its declared type still
//! yields a value (`NaN` for numbers, truthiness for booleans, the raw text
//! for datetimes) together with the issue code to report.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::record::FeatureValue;
use crate::schema::DataType;
use crate::validation::IssueCode;

/// Coerces one cell. `None` means the row was shorter than the header.
pub fn coerce_cell(raw: Option<&str>, data_type: Option<DataType>) -> (FeatureValue, Option<IssueCode>) {
    let Some(raw) = raw else {
        return (FeatureValue::Text(String::new()), None);
    };

    match data_type {
        Some(DataType::Float64) => number(raw, false),
        Some(DataType::Int64) => number(raw, true),
        Some(DataType::Bool) => boolean(raw),
        Some(DataType::Datetime) => {
            let issue = (!raw.trim().is_empty() && !is_datetime(raw.trim()))
                .then_some(IssueCode::CellNotDatetime);
            (FeatureValue::Text(raw.to_string()), issue)
        }
        Some(DataType::Object) | None => (FeatureValue::Text(raw.to_string()), None),
    }
}

/// Empty cells become `NaN` silently; other unparsable text is reported.
///
/// `inf`, `NaN` and out-of-range literals like `1e999` are reported too.
fn number(raw: &str, truncate: bool) -> (FeatureValue, Option<IssueCode>) {
    let trimmed = raw.trim();
    match finite(trimmed) {
        Some(n) if truncate => (FeatureValue::Number(n.trunc()), None),
        Some(n) => (FeatureValue::Number(n), None),
        None if trimmed.is_empty() => (FeatureValue::Number(f64::NAN), None),
        None => (FeatureValue::Number(f64::NAN), Some(IssueCode::CellNotNumeric)),
    }
}

fn finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn boolean(raw: &str) -> (FeatureValue, Option<IssueCode>) {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return (FeatureValue::Bool(true), None);
    }
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return (FeatureValue::Bool(false), None);
    }

    let truthy = match trimmed.parse::<f64>() {
        Ok(n) => n != 0.0 && !n.is_nan(),
        Err(_) => true,
    };
    (FeatureValue::Bool(truthy), Some(IssueCode::CellNotBoolean))
}

fn is_datetime(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// Parses an auxiliary score cell; empty cells are absent.
pub fn coerce_score(raw: &str) -> (Option<f64>, Option<IssueCode>) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return (None, None);
    }
    match finite(trimmed) {
        Some(n) => (Some(n), None),
        None => (None, Some(IssueCode::CellNotNumeric)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(raw: &str, ty: DataType) -> FeatureValue {
        coerce_cell(Some(raw), Some(ty)).0
    }

    #[test]
    fn test_float_and_int() {
        assert_eq!(value(" 12.5 ", DataType::Float64), FeatureValue::Number(12.5));
        assert_eq!(value("7.9", DataType::Int64), FeatureValue::Number(7.0));
        assert_eq!(value("-7.9", DataType::Int64), FeatureValue::Number(-7.0));
        assert_eq!(value("1e3", DataType::Float64), FeatureValue::Number(1000.0));
    }

    #[test]
    fn test_non_numeric_is_nan_with_issue() {
        let (v, issue) = coerce_cell(Some("abc"), Some(DataType::Float64));
        assert!(v.as_number().unwrap().is_nan());
        assert_eq!(issue, Some(IssueCode::CellNotNumeric));

        let (v, issue) = coerce_cell(Some(""), Some(DataType::Int64));
        assert!(v.as_number().unwrap().is_nan());
        assert_eq!(issue, None);
    }

    #[test]
    fn test_non_finite_is_nan_with_issue() {
        for raw in ["NaN", "inf", "-Infinity", "1e999"] {
            for ty in [DataType::Float64, DataType::Int64] {
                let (v, issue) = coerce_cell(Some(raw), Some(ty));
                assert!(v.as_number().unwrap().is_nan(), "{raw}");
                assert_eq!(issue, Some(IssueCode::CellNotNumeric), "{raw}");
            }
        }
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(value("1", DataType::Bool), FeatureValue::Bool(true));
        assert_eq!(value("TRUE", DataType::Bool), FeatureValue::Bool(true));
        assert_eq!(value("false", DataType::Bool), FeatureValue::Bool(false));
        assert_eq!(value("0", DataType::Bool), FeatureValue::Bool(false));
        assert_eq!(value("", DataType::Bool), FeatureValue::Bool(false));
    }

    #[test]
    fn test_boolean_truthiness() {
        let (v, issue) = coerce_cell(Some("yes"), Some(DataType::Bool));
        assert_eq!(v, FeatureValue::Bool(true));
        assert_eq!(issue, Some(IssueCode::CellNotBoolean));

        let (v, issue) = coerce_cell(Some("0.0"), Some(DataType::Bool));
        assert_eq!(v, FeatureValue::Bool(false));
        assert_eq!(issue, Some(IssueCode::CellNotBoolean));
    }

    #[test]
    fn test_datetime_stays_text() {
        let (v, issue) = coerce_cell(Some("2024-03-01"), Some(DataType::Datetime));
        assert_eq!(v, FeatureValue::Text("2024-03-01".into()));
        assert_eq!(issue, None);

        assert_eq!(
            coerce_cell(Some("2024-03-01T10:00:00Z"), Some(DataType::Datetime)).1,
            None
        );
        assert_eq!(
            coerce_cell(Some("2024-03-01 10:00:00"), Some(DataType::Datetime)).1,
            None
        );
        assert_eq!(
            coerce_cell(Some("last tuesday"), Some(DataType::Datetime)).1,
            Some(IssueCode::CellNotDatetime)
        );
    }

    #[test]
    fn test_object_and_unmapped_are_text() {
        assert_eq!(value(" north ", DataType::Object), FeatureValue::Text(" north ".into()));
        assert_eq!(
            coerce_cell(Some("12"), None).0,
            FeatureValue::Text("12".into())
        );
    }

    #[test]
    fn test_missing_cell_is_empty_text() {
        for ty in [DataType::Float64, DataType::Bool, DataType::Datetime] {
            assert_eq!(
                coerce_cell(None, Some(ty)),
                (FeatureValue::Text(String::new()), None)
            );
        }
    }

    #[test]
    fn test_score() {
        assert_eq!(coerce_score("0.75"), (Some(0.75), None));
        assert_eq!(coerce_score(""), (None, None));
        assert_eq!(coerce_score("high"), (None, Some(IssueCode::CellNotNumeric)));
        assert_eq!(coerce_score("inf"), (None, Some(IssueCode::CellNotNumeric)));
    }
}
