//! Report generation module.
//!
//! This module turns the outputs of a run into:
//! - a serializable [`AnalysisReport`] (printed by the `--json` CLI flag)
//! - fixed-width text tables for the dataset preview and statistics
//!
//! Nothing here writes files; callers decide where the output goes.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_analysis::reporting::ReportGenerator;
//!
//! let report = pipeline.run(Path::new("survey_results"))?;
//! println!("{}", ReportGenerator::render_text(&report));
//! println!("{}", ReportGenerator::to_json(&report)?);
//! ```

mod generator;

pub use generator::{AnalysisReport, DatasetReport, ReportGenerator};
