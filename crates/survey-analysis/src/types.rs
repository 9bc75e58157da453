//! Core data types shared by the pipeline stages.
//!
//! The stage order Loader → Cleaner → {Statistics, Visualization} is encoded
//! in these types: the loader produces a [`ResponseFileSet`], only the
//! cleaner can turn it into a [`CleanedFileSet`], and the downstream stages
//! accept nothing else.

use crate::error::AnalysisError;
use crate::profiler::ColumnCapabilities;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a dataset: the source file name including its extension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the identifier from a file path (its file name).
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One loaded response file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: DatasetId,
    pub path: PathBuf,
    pub frame: DataFrame,
    /// Data records in the source file. Blank lines are not records, but
    /// polars reads them as all-null rows, so this can be below `frame.height()`.
    pub record_count: usize,
}

impl Dataset {
    pub fn new(id: DatasetId, path: PathBuf, frame: DataFrame) -> Self {
        let record_count = frame.height();
        Self {
            id,
            path,
            frame,
            record_count,
        }
    }

    /// Override the record count with the one observed in the source file.
    pub fn with_record_count(mut self, record_count: usize) -> Self {
        self.record_count = record_count;
        self
    }
}

/// Datasets in discovery order, as returned by the loader.
#[derive(Debug, Clone, Default)]
pub struct ResponseFileSet {
    datasets: Vec<Dataset>,
}

impl ResponseFileSet {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self { datasets }
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id.as_str() == id)
    }

    pub fn ids(&self) -> Vec<&DatasetId> {
        self.datasets.iter().map(|d| &d.id).collect()
    }

    pub fn into_datasets(self) -> Vec<Dataset> {
        self.datasets
    }
}

/// A file that could not be loaded or cleaned, with the reason.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub file: DatasetId,
    pub error: AnalysisError,
}

/// Result of loading a directory: the datasets plus per-file failures.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub file_set: ResponseFileSet,
    pub failures: Vec<FileFailure>,
}

/// Non-fatal conditions observed while analysing a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetWarning {
    /// No rows remained after cleaning; statistics are degenerate.
    EmptyDataset { file: DatasetId },
}

impl fmt::Display for DatasetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDataset { file } => {
                write!(f, "'{}' has no rows left after cleaning", file)
            }
        }
    }
}

/// A dataset after null-row removal and type coercion.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub(crate) id: DatasetId,
    pub(crate) frame: DataFrame,
    pub(crate) rows_before: usize,
    pub(crate) capabilities: ColumnCapabilities,
}

impl CleanedDataset {
    pub fn id(&self) -> &DatasetId {
        &self.id
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Row count of the dataset as loaded, before cleaning.
    pub fn rows_before(&self) -> usize {
        self.rows_before
    }

    pub fn capabilities(&self) -> &ColumnCapabilities {
        &self.capabilities
    }

    pub fn warnings(&self) -> Vec<DatasetWarning> {
        if self.frame.height() == 0 {
            vec![DatasetWarning::EmptyDataset {
                file: self.id.clone(),
            }]
        } else {
            Vec::new()
        }
    }
}

/// Cleaned datasets in discovery order. Only the cleaner constructs this.
#[derive(Debug, Clone, Default)]
pub struct CleanedFileSet {
    datasets: Vec<CleanedDataset>,
}

impl CleanedFileSet {
    pub(crate) fn new(datasets: Vec<CleanedDataset>) -> Self {
        Self { datasets }
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CleanedDataset> {
        self.datasets.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CleanedDataset> {
        self.datasets.iter().find(|d| d.id.as_str() == id)
    }
}
