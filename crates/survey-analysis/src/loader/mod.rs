//! Response file discovery and loading.
//!
//! The loader turns a directory of per-session response files into a
//! [`ResponseFileSet`]. One malformed file never prevents the others from
//! loading: parse failures are collected in [`LoadOutcome::failures`].

mod csv_reader;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{Dataset, DatasetId, FileFailure, LoadOutcome, ResponseFileSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Discovers and parses response files.
#[derive(Debug, Clone)]
pub struct ResponseLoader {
    extension: String,
    pattern: Option<glob::Pattern>,
}

impl ResponseLoader {
    /// Create a loader from the file-selection part of the configuration.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let pattern = config
            .file_pattern
            .as_deref()
            .map(glob::Pattern::new)
            .transpose()
            .map_err(|e| AnalysisError::InvalidConfig(format!("file pattern: {}", e)))?;

        Ok(Self {
            extension: config.extension.to_ascii_lowercase(),
            pattern,
        })
    }

    /// List eligible files in `dir`, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryNotFound` when `dir` is missing, unreadable or not a directory.
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let not_found = |reason: String| AnalysisError::DirectoryNotFound {
            path: dir.to_path_buf(),
            reason,
        };

        if dir.exists() && !dir.is_dir() {
            return Err(not_found("not a directory".to_string()));
        }

        let entries = std::fs::read_dir(dir).map_err(|e| not_found(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| not_found(e.to_string()))?.path();
            if path.is_file() && self.is_eligible(&path) {
                files.push(path);
            } else {
                debug!("Ignoring {}", path.display());
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Load every eligible file of `dir`.
    ///
    /// Per-file parse failures are logged and returned in the outcome; only a
    /// directory-level failure is returned as an error.
    pub fn load_directory(&self, dir: &Path) -> Result<LoadOutcome> {
        let files = self.discover(dir)?;
        info!(
            "Discovered {} response file(s) in {}",
            files.len(),
            dir.display()
        );

        let mut datasets = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for path in files {
            match self.load_file(&path) {
                Ok(dataset) => {
                    debug!(
                        "Loaded '{}': {:?}",
                        dataset.id,
                        dataset.frame.shape()
                    );
                    datasets.push(dataset);
                }
                Err(error) => {
                    warn!("Skipping file: {}", error);
                    failures.push(FileFailure {
                        file: DatasetId::from_path(&path),
                        error,
                    });
                }
            }
        }

        info!(
            "Loaded {} dataset(s), {} file(s) failed to parse",
            datasets.len(),
            failures.len()
        );

        Ok(LoadOutcome {
            file_set: ResponseFileSet::new(datasets),
            failures,
        })
    }

    /// Parse a single response file into a dataset.
    pub fn load_file(&self, path: &Path) -> Result<Dataset> {
        let id = DatasetId::from_path(path);
        let records = csv_reader::validate_structure(path, id.as_str())?;
        let frame = csv_reader::read_frame(path, id.as_str())?;
        Ok(Dataset::new(id, path.to_path_buf(), frame).with_record_count(records))
    }

    fn is_eligible(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension));

        if !extension_matches {
            return false;
        }

        match (&self.pattern, path.file_name().and_then(|n| n.to_str())) {
            (Some(pattern), Some(name)) => pattern.matches(name),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn loader() -> ResponseLoader {
        ResponseLoader::new(&AnalysisConfig::default()).unwrap()
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_discover_filters_by_extension_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "age\n1\n").unwrap();
        fs::write(dir.path().join("a.CSV"), "age\n1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("csv"), "no extension").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let files = loader().discover(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_discover_applies_glob_pattern() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("survey_responses_1.csv"), "age\n1\n").unwrap();
        fs::write(dir.path().join("final_responses_1.csv"), "age\n1\n").unwrap();

        let config = AnalysisConfig::builder()
            .file_pattern("survey_responses_*.csv")
            .build()
            .unwrap();
        let files = ResponseLoader::new(&config)
            .unwrap()
            .discover(dir.path())
            .unwrap();
        assert_eq!(names(&files), vec!["survey_responses_1.csv"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = loader().discover(&missing).unwrap_err();
        assert_eq!(err.error_code(), "DIRECTORY_NOT_FOUND");
    }

    #[test]
    fn test_discover_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("s1.csv");
        fs::write(&file, "age\n1\n").unwrap();
        let err = loader().discover(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_load_directory_isolates_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.csv"), "age,response\n25,Yes\n").unwrap();
        fs::write(dir.path().join("bad.csv"), "age,response\n25\n").unwrap();
        fs::write(dir.path().join("also_good.csv"), "response\nA\n").unwrap();

        let outcome = loader().load_directory(dir.path()).unwrap();
        let ids: Vec<&str> = outcome
            .file_set
            .ids()
            .into_iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, vec!["also_good.csv", "good.csv"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].file.as_str(), "bad.csv");
        assert_eq!(outcome.failures[0].error.error_code(), "FILE_PARSE_ERROR");
    }

    #[test]
    fn test_load_file_sets_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s1.csv");
        fs::write(&path, "age,response\n25,Yes\n").unwrap();

        let dataset = loader().load_file(&path).unwrap();
        assert_eq!(dataset.id.as_str(), "s1.csv");
        assert_eq!(dataset.path, path);
        assert_eq!(dataset.frame.shape(), (1, 2));
    }
}
