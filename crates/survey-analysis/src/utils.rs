//! Shared utilities for the analysis pipeline.
//!
//! Common helpers used across the cleaner, statistics and visualization
//! modules to keep dtype handling and value extraction consistent.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for analysis purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer numbers
    Integer,
    /// Floating point numbers
    Float,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a float type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || is_float_dtype(dtype)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_integer_dtype(dtype) {
        DtypeCategory::Integer
    } else if is_float_dtype(dtype) {
        DtypeCategory::Float
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Value Extraction Utilities
// =============================================================================

/// Non-null values of a numeric column as `f64`, in row order.
pub fn numeric_values(column: &Column) -> PolarsResult<Vec<f64>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().flatten().collect())
}

/// Non-null values of any column rendered as plain labels, in row order.
///
/// Strings are returned as-is (no surrounding quotes), other types use
/// their polars text representation.
pub fn label_values(column: &Column) -> PolarsResult<Vec<String>> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}

/// Parse a text cell as an integer.
///
/// Accepts plain integers and floats without a fractional part
/// (`"25"`, `" 25 "`, `"25.0"`); anything else returns `None`.
pub fn parse_integer_string(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    trimmed.parse::<f64>().ok().and_then(float_to_integer)
}

/// Convert a float to an integer only when it is finite, integral and in `i64` range.
pub fn float_to_integer(value: f64) -> Option<i64> {
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}

/// Truncate a string to max characters with ellipsis.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== dtype tests ====================

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Integer);
        assert_eq!(get_dtype_category(&DataType::UInt8), DtypeCategory::Integer);
        assert_eq!(get_dtype_category(&DataType::Float32), DtypeCategory::Float);
        assert_eq!(get_dtype_category(&DataType::Boolean), DtypeCategory::Boolean);
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Other);
    }

    #[test]
    fn test_boolean_is_not_numeric() {
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(is_numeric_dtype(&DataType::Float64));
    }

    // ==================== value extraction tests ====================

    #[test]
    fn test_numeric_values_skips_nulls() {
        let column = Column::new("age".into(), &[Some(25i64), None, Some(40)]);
        assert_eq!(numeric_values(&column).unwrap(), vec![25.0, 40.0]);
    }

    #[test]
    fn test_label_values_have_no_quotes() {
        let column = Column::new("response".into(), &[Some("Yes"), None, Some("No")]);
        assert_eq!(
            label_values(&column).unwrap(),
            vec!["Yes".to_string(), "No".to_string()]
        );
    }

    #[test]
    fn test_label_values_of_integers() {
        let column = Column::new("response".into(), &[1i64, 2, 1]);
        assert_eq!(label_values(&column).unwrap(), vec!["1", "2", "1"]);
    }

    // ==================== parsing tests ====================

    #[test]
    fn test_parse_integer_string() {
        assert_eq!(parse_integer_string("25"), Some(25));
        assert_eq!(parse_integer_string("  7 "), Some(7));
        assert_eq!(parse_integer_string("30.0"), Some(30));
        assert_eq!(parse_integer_string("-3"), Some(-3));
        assert_eq!(parse_integer_string("30.5"), None);
        assert_eq!(parse_integer_string("N/A"), None);
        assert_eq!(parse_integer_string(""), None);
        assert_eq!(parse_integer_string("inf"), None);
    }

    #[test]
    fn test_float_to_integer() {
        assert_eq!(float_to_integer(42.0), Some(42));
        assert_eq!(float_to_integer(42.5), None);
        assert_eq!(float_to_integer(f64::NAN), None);
        assert_eq!(float_to_integer(9223372036854775808.0), None);
        assert_eq!(float_to_integer(-9223372036854775808.0), Some(i64::MIN));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("response", 20), "response");
        assert_eq!(truncate_str("engaging_preference_score", 10), "engagin...");
    }
}
