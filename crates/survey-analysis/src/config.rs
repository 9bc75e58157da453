//! Configuration types for the survey analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup. Configurations can also be
//! read from a JSON file.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when a recognized column holds values that cannot be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoercionFailurePolicy {
    /// Abort the whole run with a `TypeCoercion` error
    #[default]
    AbortRun,
    /// Drop only the offending dataset, report it and continue
    SkipDataset,
}

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use survey_analysis::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .file_pattern("survey_responses_*.csv")
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// File extension (without dot) of response files, matched case-insensitively.
    /// Default: "csv"
    pub extension: String,

    /// Optional glob pattern the file name must also match.
    /// Default: None
    pub file_pattern: Option<String>,

    /// Name of the age-like column (exact match).
    /// Default: "age"
    pub age_column: String,

    /// Name of the response-like column (exact match).
    /// Default: "response"
    pub response_column: String,

    /// Columns coerced to integers during cleaning. The age column is always included.
    /// Default: []
    pub integer_columns: Vec<String>,

    /// Number of equal-width bins of the age histogram.
    /// Default: 20
    pub histogram_bins: usize,

    /// Number of leading rows shown in the dataset preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Behaviour when coercion of a recognized column fails.
    /// Default: AbortRun
    pub coercion_failure_policy: CoercionFailurePolicy,

    /// Width and height in pixels of rendered figures.
    /// Default: (800, 600)
    pub figure_size: (u32, u32),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extension: "csv".to_string(),
            file_pattern: None,
            age_column: "age".to_string(),
            response_column: "response".to_string(),
            integer_columns: Vec::new(),
            histogram_bins: 20,
            preview_rows: 5,
            coercion_failure_policy: CoercionFailurePolicy::default(),
            figure_size: (800, 600),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Read and validate a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: AnalysisConfig = serde_json::from_str(&raw)?;
        config
            .validate()
            .map_err(|e| crate::error::AnalysisError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// All columns the cleaner coerces to integers, age column first, without duplicates.
    pub fn coerced_columns(&self) -> Vec<&str> {
        let mut columns = vec![self.age_column.as_str()];
        for name in &self.integer_columns {
            if !columns.contains(&name.as_str()) {
                columns.push(name.as_str());
            }
        }
        columns
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.extension.trim().is_empty() || self.extension.contains('.') {
            return Err(ConfigValidationError::InvalidExtension(
                self.extension.clone(),
            ));
        }

        if let Some(pattern) = &self.file_pattern {
            glob::Pattern::new(pattern).map_err(|e| ConfigValidationError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }

        for (field, value) in [
            ("age_column", &self.age_column),
            ("response_column", &self.response_column),
        ] {
            if value.is_empty() {
                return Err(ConfigValidationError::EmptyColumnName(field.to_string()));
            }
        }

        if self.age_column == self.response_column {
            return Err(ConfigValidationError::ConflictingColumns(
                self.age_column.clone(),
            ));
        }

        if self.integer_columns.contains(&self.response_column) {
            return Err(ConfigValidationError::ConflictingColumns(
                self.response_column.clone(),
            ));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.histogram_bins,
            ));
        }

        if self.figure_size.0 < 100 || self.figure_size.1 < 100 {
            return Err(ConfigValidationError::InvalidFigureSize {
                width: self.figure_size.0,
                height: self.figure_size.1,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid file extension '{0}' (expected a non-empty extension without dot)")]
    InvalidExtension(String),

    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Column name for '{0}' must not be empty")]
    EmptyColumnName(String),

    #[error("Column '{0}' cannot be both the response column and an integer column")]
    ConflictingColumns(String),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),

    #[error("Invalid figure size {width}x{height} (minimum 100x100)")]
    InvalidFigureSize { width: u32, height: u32 },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    extension: Option<String>,
    file_pattern: Option<String>,
    age_column: Option<String>,
    response_column: Option<String>,
    integer_columns: Option<Vec<String>>,
    histogram_bins: Option<usize>,
    preview_rows: Option<usize>,
    coercion_failure_policy: Option<CoercionFailurePolicy>,
    figure_size: Option<(u32, u32)>,
}

impl AnalysisConfigBuilder {
    /// Set the response file extension (without dot).
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Restrict eligible files to names matching a glob pattern.
    ///
    /// # Arguments
    /// * `pattern` - e.g. `"survey_responses_*.csv"`
    pub fn file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = Some(pattern.into());
        self
    }

    /// Set the name of the age-like column.
    pub fn age_column(mut self, name: impl Into<String>) -> Self {
        self.age_column = Some(name.into());
        self
    }

    /// Set the name of the response-like column.
    pub fn response_column(mut self, name: impl Into<String>) -> Self {
        self.response_column = Some(name.into());
        self
    }

    /// Add a column to coerce to integers during cleaning.
    pub fn integer_column(mut self, name: impl Into<String>) -> Self {
        self.integer_columns
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    /// Set the number of bins of the age histogram.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of rows shown in the dataset preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the coercion failure policy.
    pub fn coercion_failure_policy(mut self, policy: CoercionFailurePolicy) -> Self {
        self.coercion_failure_policy = Some(policy);
        self
    }

    /// Set the size of rendered figures in pixels.
    pub fn figure_size(mut self, width: u32, height: u32) -> Self {
        self.figure_size = Some((width, height));
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            extension: self.extension.unwrap_or(defaults.extension),
            file_pattern: self.file_pattern,
            age_column: self.age_column.unwrap_or(defaults.age_column),
            response_column: self.response_column.unwrap_or(defaults.response_column),
            integer_columns: self.integer_columns.unwrap_or_default(),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            coercion_failure_policy: self.coercion_failure_policy.unwrap_or_default(),
            figure_size: self.figure_size.unwrap_or(defaults.figure_size),
        };

        config.validate()?;
        Ok(config)
    }
}
