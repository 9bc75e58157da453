//! Summary statistics for cleaned datasets.
//!
//! The engine is a read-only consumer of a [`CleanedFileSet`]: for each
//! dataset it describes every numeric column (count, mean, sample std, min,
//! quartiles, max), computes the correlation matrix when at least two
//! numeric columns exist, and scores the survey's rating scales.

pub mod correlation;
pub mod descriptive;
pub mod scales;

pub use correlation::CorrelationMatrix;
pub use scales::{ScaleKind, ScaleSummary};

use crate::error::{Result, ResultExt};
use crate::types::{CleanedDataset, CleanedFileSet, DatasetId};
use crate::utils::numeric_values;
use descriptive::{mean, percentile_sorted, sample_std, sorted};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Descriptive statistics of one numeric column.
///
/// `count` is the number of non-missing values. For an empty column every
/// other field is NaN; `std` is NaN when `count < 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStatistics {
    /// Describe a column from its non-missing values.
    pub fn from_values(column: impl Into<String>, values: &[f64]) -> Self {
        let sorted = sorted(values);
        Self {
            column: column.into(),
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: percentile_sorted(&sorted, 0.25),
            q50: percentile_sorted(&sorted, 0.5),
            q75: percentile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// Per-column statistics of one dataset, in frame column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub columns: Vec<ColumnStatistics>,
}

impl SummaryStatistics {
    pub fn get(&self, column: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Everything the engine derives from one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub dataset: DatasetId,
    pub summary: SummaryStatistics,
    pub correlation: Option<CorrelationMatrix>,
    pub scales: Vec<ScaleSummary>,
}

/// Computes [`DatasetStatistics`] for cleaned datasets.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Describe every dataset of the set, in order.
    pub fn describe_all(&self, file_set: &CleanedFileSet) -> Result<Vec<DatasetStatistics>> {
        info!("Computing statistics for {} dataset(s)...", file_set.len());
        file_set.iter().map(|d| self.describe(d)).collect()
    }

    /// Describe a single cleaned dataset.
    pub fn describe(&self, dataset: &CleanedDataset) -> Result<DatasetStatistics> {
        let file = dataset.id().as_str();
        let context = || format!("Statistics for '{}'", file);
        let summary = self.summary(dataset).context(context())?;

        let capabilities = dataset.capabilities();
        let correlation = if capabilities.supports_correlation() {
            Some(
                CorrelationMatrix::compute(dataset.frame(), &capabilities.numeric_columns)
                    .context(context())?,
            )
        } else {
            None
        };

        let scales = scales::score_scales(dataset.frame()).context(context())?;

        debug!(
            "'{}': {} numeric column(s), correlation: {}, {} rating scale(s)",
            file,
            summary.columns.len(),
            correlation.is_some(),
            scales.len()
        );

        Ok(DatasetStatistics {
            dataset: dataset.id().clone(),
            summary,
            correlation,
            scales,
        })
    }

    /// Summary statistics over the numeric columns of a dataset.
    pub fn summary(&self, dataset: &CleanedDataset) -> Result<SummaryStatistics> {
        let frame = dataset.frame();
        let columns = dataset
            .capabilities()
            .numeric_columns
            .iter()
            .map(|name| {
                let values = numeric_values(frame.column(name)?)?;
                Ok(ColumnStatistics::from_values(name.as_str(), &values))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SummaryStatistics { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::ResponseCleaner;
    use crate::config::AnalysisConfig;
    use crate::types::{Dataset, ResponseFileSet};
    use polars::prelude::*;
    use std::path::PathBuf;

    fn cleaned(name: &str, df: DataFrame) -> CleanedFileSet {
        let set = ResponseFileSet::new(vec![Dataset::new(
            DatasetId::new(name),
            PathBuf::from(name),
            df,
        )]);
        ResponseCleaner::new(AnalysisConfig::default())
            .clean(set)
            .unwrap()
            .file_set
    }

    // ========================================================================
    // ColumnStatistics tests
    // ========================================================================

    #[test]
    fn test_column_statistics_basic() {
        let stats = ColumnStatistics::from_values("age", &[40.0, 25.0]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 32.5);
        assert_eq!(stats.min, 25.0);
        assert_eq!(stats.max, 40.0);
        assert_eq!(stats.q50, 32.5);
        assert!((stats.std - 10.606_601_717_798_213).abs() < 1e-9);
    }

    #[test]
    fn test_column_statistics_single_value() {
        let stats = ColumnStatistics::from_values("age", &[30.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 30.0);
        assert!(stats.std.is_nan());
        assert_eq!(stats.q25, 30.0);
    }

    #[test]
    fn test_column_statistics_empty() {
        let stats = ColumnStatistics::from_values("age", &[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.std.is_nan());
        assert!(stats.min.is_nan());
        assert!(stats.max.is_nan());
    }

    // ========================================================================
    // StatisticsEngine tests
    // ========================================================================

    #[test]
    fn test_describe_age_response_dataset() {
        let df = df![
            "age" => [Some(25i64), None, Some(40)],
            "response" => [Some("Yes"), Some("No"), Some("Yes")],
        ]
        .unwrap();
        let set = cleaned("s1.csv", df);

        let stats = StatisticsEngine::new().describe_all(&set).unwrap();
        assert_eq!(stats.len(), 1);

        let age = stats[0].summary.get("age").unwrap();
        assert_eq!(age.count, 2);
        assert_eq!(age.mean, 32.5);
        assert_eq!(age.min, 25.0);
        assert_eq!(age.max, 40.0);
        assert!(stats[0].summary.get("response").is_none());
        assert!(stats[0].correlation.is_none());
    }

    #[test]
    fn test_counts_never_exceed_cleaned_rows() {
        let df = df![
            "age" => [Some(20i64), Some(30), None, Some(50)],
            "score" => [Some(1.0f64), None, Some(3.0), Some(4.0)],
        ]
        .unwrap();
        let set = cleaned("s2.csv", df);
        let dataset = set.get("s2.csv").unwrap();

        let stats = StatisticsEngine::new().describe(dataset).unwrap();
        for column in &stats.summary.columns {
            assert!(column.count <= dataset.frame().height());
        }
        let correlation = stats.correlation.unwrap();
        assert!(correlation.is_symmetric());
    }

    #[test]
    fn test_empty_dataset_is_not_an_error() {
        let df = df!["age" => [None::<i64>, None]].unwrap();
        let set = cleaned("empty.csv", df);

        let stats = StatisticsEngine::new().describe_all(&set).unwrap();
        let age = stats[0].summary.get("age").unwrap();
        assert_eq!(age.count, 0);
        assert!(age.mean.is_nan());
    }

    #[test]
    fn test_text_only_dataset_has_no_numeric_summary() {
        let df = df!["response" => ["A", "A", "B"]].unwrap();
        let set = cleaned("r.csv", df);

        let stats = StatisticsEngine::new().describe_all(&set).unwrap();
        assert!(stats[0].summary.is_empty());
        assert!(stats[0].correlation.is_none());
    }
}
