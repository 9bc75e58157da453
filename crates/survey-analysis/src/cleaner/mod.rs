//! Data cleaning for loaded response files.
//!
//! This module provides functionality for:
//! - Removing rows that contain a missing value in any column
//! - Coercing recognized columns (the age column and any configured
//!   integer columns) to integers
//!
//! Cleaning is applied independently per dataset and is idempotent.

mod converters;

use crate::config::{AnalysisConfig, CoercionFailurePolicy};
use crate::error::Result;
use crate::profiler::ColumnCapabilities;
use crate::types::{CleanedDataset, CleanedFileSet, FileFailure, ResponseFileSet};
use crate::utils::is_float_dtype;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Cleaned datasets plus the datasets dropped under
/// [`CoercionFailurePolicy::SkipDataset`].
#[derive(Debug, Default)]
pub struct CleanOutcome {
    pub file_set: CleanedFileSet,
    pub failures: Vec<FileFailure>,
}

/// Data cleaner producing the version of each dataset all later stages read.
#[derive(Debug, Clone)]
pub struct ResponseCleaner {
    config: AnalysisConfig,
}

impl ResponseCleaner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Clean every dataset of a file set.
    ///
    /// # Errors
    ///
    /// With [`CoercionFailurePolicy::AbortRun`] the first `TypeCoercion`
    /// error aborts the run. With `SkipDataset` the offending dataset is
    /// dropped and reported in [`CleanOutcome::failures`].
    pub fn clean(&self, file_set: ResponseFileSet) -> Result<CleanOutcome> {
        info!("Cleaning {} dataset(s)...", file_set.len());

        let mut cleaned = Vec::with_capacity(file_set.len());
        let mut failures = Vec::new();

        for dataset in file_set.into_datasets() {
            let rows_before = dataset.record_count;
            match self.clean_frame(dataset.id.as_str(), dataset.frame) {
                Ok(frame) => {
                    let capabilities = ColumnCapabilities::detect(&frame, &self.config);
                    debug!(
                        "'{}': {} -> {} rows, capabilities {:?}",
                        dataset.id,
                        rows_before,
                        frame.height(),
                        capabilities
                    );
                    cleaned.push(CleanedDataset {
                        id: dataset.id,
                        frame,
                        rows_before,
                        capabilities,
                    });
                }
                Err(error) => match self.config.coercion_failure_policy {
                    CoercionFailurePolicy::AbortRun => return Err(error),
                    CoercionFailurePolicy::SkipDataset => {
                        warn!("Dropping dataset: {}", error);
                        failures.push(FileFailure {
                            file: dataset.id,
                            error,
                        });
                    }
                },
            }
        }

        Ok(CleanOutcome {
            file_set: CleanedFileSet::new(cleaned),
            failures,
        })
    }

    /// Clean a single table: drop incomplete rows, then coerce recognized columns.
    ///
    /// `file` only identifies the source in error messages.
    pub fn clean_frame(&self, file: &str, df: DataFrame) -> Result<DataFrame> {
        let mut df = drop_incomplete_rows(&df)?;

        let age_column = self.config.age_column.as_str();
        for name in self.config.coerced_columns() {
            let Ok(column) = df.column(name) else {
                continue;
            };
            let series = column.as_materialized_series();
            let coerced = converters::coerce_to_integer(series, file, name == age_column)?;
            df.replace(name, coerced)?;
        }

        Ok(df)
    }
}

/// Remove every row with a null (or a float NaN) in any column.
fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        if is_float_dtype(series.dtype()) {
            let floats = series.cast(&DataType::Float64)?;
            for (flag, value) in keep.iter_mut().zip(floats.f64()?.into_iter()) {
                *flag &= value.is_some_and(|v| !v.is_nan());
            }
        } else {
            let valid = series.is_not_null();
            for (flag, value) in keep.iter_mut().zip(valid.into_iter()) {
                *flag &= value.unwrap_or(false);
            }
        }
    }

    let removed = keep.iter().filter(|k| !**k).count();
    if removed == 0 {
        return Ok(df.clone());
    }

    debug!("Removing {} row(s) with missing values", removed);
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Whether any row of a table has a missing value (null or float NaN).
pub fn has_missing_values(df: &DataFrame) -> Result<bool> {
    Ok(drop_incomplete_rows(df)?.height() != df.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::types::{Dataset, DatasetId};
    use std::path::PathBuf;

    fn cleaner() -> ResponseCleaner {
        ResponseCleaner::new(AnalysisConfig::default())
    }

    fn file_set(entries: Vec<(&str, DataFrame)>) -> ResponseFileSet {
        ResponseFileSet::new(
            entries
                .into_iter()
                .map(|(name, df)| Dataset::new(DatasetId::new(name), PathBuf::from(name), df))
                .collect(),
        )
    }

    // ========================================================================
    // clean_frame() tests
    // ========================================================================

    #[test]
    fn test_rows_with_missing_values_are_removed() {
        let df = df![
            "age" => [Some(25i64), None, Some(40)],
            "response" => [Some("Yes"), Some("No"), Some("Yes")],
        ]
        .unwrap();

        let cleaned = cleaner().clean_frame("s1.csv", df).unwrap();
        assert_eq!(cleaned.height(), 2);

        let ages: Vec<Option<i64>> = cleaned.column("age").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ages, vec![Some(25), Some(40)]);
        assert!(!has_missing_values(&cleaned).unwrap());
    }

    #[test]
    fn test_missing_value_in_any_column_removes_row() {
        let df = df![
            "age" => [25i64, 30, 35],
            "city" => [Some("Bonn"), None, Some("Köln")],
        ]
        .unwrap();

        let cleaned = cleaner().clean_frame("s1.csv", df).unwrap();
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df!["score" => [1.0f64, f64::NAN, 3.0]].unwrap();
        assert!(has_missing_values(&df).unwrap());

        let cleaned = cleaner().clean_frame("s1.csv", df).unwrap();
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_age_from_float_becomes_integer() {
        // A null in an integer column can make polars infer floats upstream
        let df = df!["age" => [25.0f64, 40.0]].unwrap();
        let cleaned = cleaner().clean_frame("s1.csv", df).unwrap();
        assert_eq!(cleaned.column("age").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_unparseable_age_is_coercion_error() {
        let df = df!["age" => ["25", "N/A"]].unwrap();
        let err = cleaner().clean_frame("s4.csv", df).unwrap_err();

        match err {
            AnalysisError::TypeCoercion { file, column, value, .. } => {
                assert_eq!(file, "s4.csv");
                assert_eq!(column, "age");
                assert_eq!(value, "N/A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_configured_integer_column_is_coerced() {
        let config = AnalysisConfig::builder()
            .integer_column("overall_rating")
            .build()
            .unwrap();
        let df = df!["overall_rating" => ["4", "5"]].unwrap();

        let cleaned = ResponseCleaner::new(config).clean_frame("f.csv", df).unwrap();
        assert_eq!(cleaned.column("overall_rating").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_clean_frame_is_idempotent() {
        let df = df![
            "age" => [Some("25"), None, Some("40")],
            "response" => [Some("Yes"), Some("No"), None],
            "score" => [Some(1.5f64), Some(2.5), Some(f64::NAN)],
        ]
        .unwrap();

        let once = cleaner().clean_frame("s1.csv", df).unwrap();
        let twice = cleaner().clean_frame("s1.csv", once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
        assert_eq!(once.height(), 1);
    }

    // ========================================================================
    // clean() tests
    // ========================================================================

    #[test]
    fn test_clean_keeps_order_and_capabilities() {
        let set = file_set(vec![
            ("b.csv", df!["response" => ["A", "A", "B"]].unwrap()),
            ("a.csv", df!["age" => [10i64, 20]].unwrap()),
        ]);

        let outcome = cleaner().clean(set).unwrap();
        let ids: Vec<&str> = outcome.file_set.iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["b.csv", "a.csv"]);

        let first = outcome.file_set.get("b.csv").unwrap();
        assert!(first.capabilities().has_response_column);
        assert!(!first.capabilities().has_age_column);
        assert_eq!(first.rows_before(), 3);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_clean_aborts_on_coercion_error_by_default() {
        let set = file_set(vec![
            ("bad.csv", df!["age" => ["x"]].unwrap()),
            ("good.csv", df!["age" => [1i64]].unwrap()),
        ]);

        let err = cleaner().clean(set).unwrap_err();
        assert_eq!(err.file(), Some("bad.csv"));
    }

    #[test]
    fn test_clean_skip_dataset_policy() {
        let config = AnalysisConfig::builder()
            .coercion_failure_policy(CoercionFailurePolicy::SkipDataset)
            .build()
            .unwrap();
        let set = file_set(vec![
            ("bad.csv", df!["age" => ["x"]].unwrap()),
            ("good.csv", df!["age" => [1i64]].unwrap()),
        ]);

        let outcome = ResponseCleaner::new(config).clean(set).unwrap();
        assert_eq!(outcome.file_set.len(), 1);
        assert!(outcome.file_set.get("good.csv").is_some());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].file.as_str(), "bad.csv");
    }

    #[test]
    fn test_empty_after_cleaning_is_kept_with_warning() {
        let set = file_set(vec![(
            "empty.csv",
            df!["age" => [None::<i64>, None]].unwrap(),
        )]);

        let outcome = cleaner().clean(set).unwrap();
        let dataset = outcome.file_set.get("empty.csv").unwrap();
        assert_eq!(dataset.frame().height(), 0);
        assert_eq!(dataset.warnings().len(), 1);
    }

    #[test]
    fn test_rows_before_uses_source_record_count() {
        // A blank line in the file is read as an all-null row
        let dataset = Dataset::new(
            DatasetId::new("s1.csv"),
            PathBuf::from("s1.csv"),
            df!["age" => [Some(25i64), None, Some(40)]].unwrap(),
        )
        .with_record_count(2);

        let outcome = cleaner()
            .clean(ResponseFileSet::new(vec![dataset]))
            .unwrap();
        let cleaned = outcome.file_set.get("s1.csv").unwrap();
        assert_eq!(cleaned.rows_before(), 2);
        assert_eq!(cleaned.frame().height(), 2);
    }
}
