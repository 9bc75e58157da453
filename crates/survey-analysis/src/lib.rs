//! Survey Response Analysis Library
//!
//! Batch analysis of survey response files built with Rust and Polars.
//!
//! # Overview
//!
//! Each response file (one completed questionnaire session) becomes an
//! independent dataset that flows through four stages:
//!
//! - **Loading**: discover eligible files in a directory and parse each one,
//!   isolating malformed files instead of aborting
//! - **Cleaning**: drop rows with missing values and coerce the age column
//!   (and other configured columns) to integers
//! - **Statistics**: count, mean, std, min, quartiles and max per numeric
//!   column, pairwise correlation, and scoring of the survey's rating scales
//! - **Visualization**: pick plots by the columns a dataset actually has and
//!   render them to SVG for a pluggable [`FigureSink`]
//!
//! The stage order is enforced by types: statistics and visualization only
//! accept a [`CleanedFileSet`], which only the cleaner can produce.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use survey_analysis::{AnalysisConfig, Pipeline, ReportGenerator};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::builder()
//!     .file_pattern("survey_responses_*.csv")
//!     .build()?;
//!
//! let report = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(Path::new("survey_results"))?;
//!
//! println!("{}", ReportGenerator::render_text(&report));
//! ```
//!
//! # Using the stages directly
//!
//! ```rust,ignore
//! use survey_analysis::*;
//!
//! let config = AnalysisConfig::default();
//! let loaded = ResponseLoader::new(&config)?.load_directory(Path::new("survey_results"))?;
//! let cleaned = ResponseCleaner::new(config.clone()).clean(loaded.file_set)?;
//!
//! let stats = StatisticsEngine::new().describe_all(&cleaned.file_set)?;
//! let sink = MemoryFigureSink::new();
//! let plots = VisualizationSelector::new(&config).visualize(&cleaned.file_set, &sink)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod statistics;
pub mod types;
pub mod utils;
pub mod visualization;

// Re-exports for convenient access
pub use cleaner::{CleanOutcome, ResponseCleaner};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, CoercionFailurePolicy, ConfigValidationError,
};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use loader::ResponseLoader;
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use profiler::{ColumnCapabilities, ColumnProfile, DataProfiler};
pub use reporting::{AnalysisReport, DatasetReport, ReportGenerator};
pub use statistics::{
    ColumnStatistics, CorrelationMatrix, DatasetStatistics, ScaleKind, ScaleSummary,
    StatisticsEngine, SummaryStatistics,
};
pub use types::{
    CleanedDataset, CleanedFileSet, Dataset, DatasetId, DatasetWarning, FileFailure, LoadOutcome,
    ResponseFileSet,
};
pub use visualization::{
    DatasetPlots, FigureRenderer, FigureSink, LoggingFigureSink, MemoryFigureSink, PlotKind,
    RenderedFigure, SvgDirectorySink, VisualizationSelector,
};
