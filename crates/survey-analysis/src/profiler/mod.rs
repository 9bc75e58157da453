//! Column profiling for cleaned datasets.
//!
//! This module turns a dataset's column set into the capability descriptor
//! consumed by the statistics engine and the visualization selector, so
//! neither of them inspects raw column names on its own.

use crate::config::AnalysisConfig;
use crate::utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Which analysis capabilities a dataset supports, computed once per dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnCapabilities {
    /// The configured age column is present.
    pub has_age_column: bool,
    /// The configured response column is present.
    pub has_response_column: bool,
    /// Numeric columns in frame order.
    pub numeric_columns: Vec<String>,
}

impl ColumnCapabilities {
    /// Detect capabilities by exact column-name match and dtype inspection.
    pub fn detect(df: &DataFrame, config: &AnalysisConfig) -> Self {
        let numeric_columns = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect();

        Self {
            has_age_column: df.column(&config.age_column).is_ok(),
            has_response_column: df.column(&config.response_column).is_ok(),
            numeric_columns,
        }
    }

    /// A correlation matrix needs at least two numeric columns.
    pub fn supports_correlation(&self) -> bool {
        self.numeric_columns.len() >= 2
    }
}

/// Short description of one column, used in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub kind: String,
    pub unique_count: usize,
}

/// Data profiler for describing a dataset's columns.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column of a dataset.
    pub fn profile_columns(df: &DataFrame) -> PolarsResult<Vec<ColumnProfile>> {
        df.get_columns()
            .iter()
            .map(|col| {
                let kind = match get_dtype_category(col.dtype()) {
                    DtypeCategory::Integer | DtypeCategory::Float => "numeric",
                    DtypeCategory::Boolean => "binary",
                    DtypeCategory::String => "text",
                    DtypeCategory::Other => "other",
                };
                Ok(ColumnProfile {
                    name: col.name().to_string(),
                    dtype: format!("{:?}", col.dtype()),
                    kind: kind.to_string(),
                    unique_count: col.as_materialized_series().n_unique()?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_age_and_response() {
        let df = df![
            "age" => [25i64, 40],
            "response" => ["Yes", "Yes"],
        ]
        .unwrap();

        let caps = ColumnCapabilities::detect(&df, &AnalysisConfig::default());
        assert!(caps.has_age_column);
        assert!(caps.has_response_column);
        assert_eq!(caps.numeric_columns, vec!["age".to_string()]);
        assert!(!caps.supports_correlation());
    }

    #[test]
    fn test_detect_is_exact_match() {
        let df = df![
            "Age" => [25i64, 40],
            "responses" => ["Yes", "No"],
        ]
        .unwrap();

        let caps = ColumnCapabilities::detect(&df, &AnalysisConfig::default());
        assert!(!caps.has_age_column);
        assert!(!caps.has_response_column);
    }

    #[test]
    fn test_detect_uses_configured_names() {
        let df = df!["alter" => [30i64, 31]].unwrap();
        let config = AnalysisConfig::builder().age_column("alter").build().unwrap();

        assert!(ColumnCapabilities::detect(&df, &config).has_age_column);
    }

    #[test]
    fn test_numeric_columns_exclude_text_and_bool() {
        let df = df![
            "age" => [25i64, 40],
            "score" => [1.5f64, 2.5],
            "visited" => [true, false],
            "city" => ["Berlin", "Bonn"],
        ]
        .unwrap();

        let caps = ColumnCapabilities::detect(&df, &AnalysisConfig::default());
        assert_eq!(
            caps.numeric_columns,
            vec!["age".to_string(), "score".to_string()]
        );
        assert!(caps.supports_correlation());
    }

    #[test]
    fn test_profile_columns() {
        let df = df![
            "age" => [25i64, 40, 40],
            "response" => ["Yes", "No", "Yes"],
        ]
        .unwrap();

        let profiles = DataProfiler::profile_columns(&df).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].kind, "numeric");
        assert_eq!(profiles[0].unique_count, 2);
        assert_eq!(profiles[1].kind, "text");
    }
}
