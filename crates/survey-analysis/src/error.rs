//! Custom error types for the survey analysis pipeline.
//!
//! This module provides a single error hierarchy using `thiserror`.
//! Every variant that originates from a response file carries the file
//! identifier so a reviewer can locate and fix the source data.
//!
//! Errors are serializable, allowing them to be embedded in the JSON
//! analysis report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input directory is missing, unreadable or not a directory.
    #[error("Input directory '{}' cannot be read: {reason}", path.display())]
    DirectoryNotFound { path: PathBuf, reason: String },

    /// A response file could not be parsed.
    #[error("Failed to parse '{file}': {reason}")]
    FileParse { file: String, reason: String },

    /// A recognized column holds a value that cannot be coerced.
    #[error("Cannot coerce column '{column}' in '{file}' (value '{value}'): {reason}")]
    TypeCoercion {
        file: String,
        column: String,
        value: String,
        reason: String,
    },

    /// A selected plot could not be rendered.
    #[error("Failed to render {plot} for '{file}': {reason}")]
    Render {
        file: String,
        plot: String,
        reason: String,
    },

    /// A figure sink could not present a rendered figure.
    #[error("Figure sink error: {0}")]
    FigureSink(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine consumers of the report.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DirectoryNotFound { .. } => "DIRECTORY_NOT_FOUND",
            Self::FileParse { .. } => "FILE_PARSE_ERROR",
            Self::TypeCoercion { .. } => "TYPE_COERCION_ERROR",
            Self::Render { .. } => "RENDER_ERROR",
            Self::FigureSink(_) => "FIGURE_SINK_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// The response file this error originates from, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::FileParse { file, .. }
            | Self::TypeCoercion { file, .. }
            | Self::Render { file, .. } => Some(file),
            Self::WithContext { source, .. } => source.file(),
            _ => None,
        }
    }
}

/// Errors are serialized as a struct with `code`, `file` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("file", &self.file())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coercion_error() -> AnalysisError {
        AnalysisError::TypeCoercion {
            file: "s1.csv".to_string(),
            column: "age".to_string(),
            value: "N/A".to_string(),
            reason: "not an integer".to_string(),
        }
    }

    #[test]
    fn test_error_code() {
        assert_eq!(coercion_error().error_code(), "TYPE_COERCION_ERROR");
        assert_eq!(
            AnalysisError::FileParse {
                file: "bad.csv".to_string(),
                reason: "ragged".to_string()
            }
            .error_code(),
            "FILE_PARSE_ERROR"
        );
    }

    #[test]
    fn test_message_names_file_and_column() {
        let message = coercion_error().to_string();
        assert!(message.contains("s1.csv"));
        assert!(message.contains("age"));
        assert!(message.contains("N/A"));
    }

    #[test]
    fn test_file_accessor() {
        assert_eq!(coercion_error().file(), Some("s1.csv"));
        assert_eq!(AnalysisError::InvalidConfig("x".to_string()).file(), None);
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_string(&coercion_error()).unwrap();
        assert!(json.contains("TYPE_COERCION_ERROR"));
        assert!(json.contains("\"file\":\"s1.csv\""));
    }

    #[test]
    fn test_with_context() {
        let error = coercion_error().with_context("During cleaning");
        assert!(error.to_string().contains("During cleaning"));
        assert_eq!(error.error_code(), "TYPE_COERCION_ERROR");
        assert_eq!(error.file(), Some("s1.csv"));
    }
}
