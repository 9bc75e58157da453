use crate::error::Result;
use crate::profiler::{ColumnCapabilities, ColumnProfile, DataProfiler};
use crate::statistics::{CorrelationMatrix, DatasetStatistics, ScaleSummary, SummaryStatistics};
use crate::types::{CleanedDataset, CleanedFileSet, DatasetId, DatasetWarning, FileFailure};
use crate::utils::truncate_str;
use crate::visualization::{DatasetPlots, PlotKind};
use chrono::Local;
use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Report Types
// ============================================================================

/// Summary of one analysis run, suitable for JSON output (`--json`).
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// The analysed input directory
    pub input_dir: String,
    /// One entry per cleaned dataset, in discovery order
    pub datasets: Vec<DatasetReport>,
    /// Files that failed to load, or were dropped while cleaning
    pub failures: Vec<FileFailure>,
}

impl AnalysisReport {
    /// All dataset warnings of the run, in dataset order.
    pub fn warnings(&self) -> Vec<&DatasetWarning> {
        self.datasets.iter().flat_map(|d| d.warnings.iter()).collect()
    }

    pub fn dataset(&self, id: &str) -> Option<&DatasetReport> {
        self.datasets.iter().find(|d| d.dataset.as_str() == id)
    }
}

/// Everything derived from one dataset.
#[derive(Debug, Serialize)]
pub struct DatasetReport {
    pub dataset: DatasetId,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: Vec<ColumnProfile>,
    pub capabilities: ColumnCapabilities,
    pub statistics: SummaryStatistics,
    pub correlation: Option<CorrelationMatrix>,
    pub scales: Vec<ScaleSummary>,
    pub plots: Vec<PlotKind>,
    pub warnings: Vec<DatasetWarning>,
    /// Leading rows of the cleaned table, as printed by the CLI
    #[serde(skip)]
    pub preview: String,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Assembles [`AnalysisReport`]s and formats their text output.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    preview_rows: usize,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ReportGenerator {
    pub fn new(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    /// Build the run report from the outputs of every stage.
    pub fn build_report(
        &self,
        input_dir: &Path,
        file_set: &CleanedFileSet,
        statistics: Vec<DatasetStatistics>,
        plots: Vec<DatasetPlots>,
        failures: Vec<FileFailure>,
    ) -> Result<AnalysisReport> {
        let mut datasets = Vec::with_capacity(file_set.len());

        for (dataset, stats) in file_set.iter().zip(statistics) {
            let plot_kinds = plots
                .iter()
                .find(|p| &p.dataset == dataset.id())
                .map(|p| p.plots.clone())
                .unwrap_or_default();
            datasets.push(self.dataset_report(dataset, stats, plot_kinds)?);
        }

        debug!(
            "Built report: {} dataset(s), {} failure(s)",
            datasets.len(),
            failures.len()
        );

        Ok(AnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_dir: input_dir.display().to_string(),
            datasets,
            failures,
        })
    }

    fn dataset_report(
        &self,
        dataset: &CleanedDataset,
        stats: DatasetStatistics,
        plots: Vec<PlotKind>,
    ) -> Result<DatasetReport> {
        Ok(DatasetReport {
            dataset: dataset.id().clone(),
            rows_before: dataset.rows_before(),
            rows_after: dataset.frame().height(),
            columns: DataProfiler::profile_columns(dataset.frame())?,
            capabilities: dataset.capabilities().clone(),
            statistics: stats.summary,
            correlation: stats.correlation,
            scales: stats.scales,
            plots,
            warnings: dataset.warnings(),
            preview: self.preview(dataset.frame()),
        })
    }

    /// The leading rows of a table, as printed to the user.
    pub fn preview(&self, df: &DataFrame) -> String {
        format!("{}", df.head(Some(self.preview_rows)))
    }

    /// Format summary statistics as a fixed-width table.
    pub fn statistics_table(stats: &SummaryStatistics) -> String {
        if stats.is_empty() {
            return "  No numeric columns\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        let _ = writeln!(out, "{}", "-".repeat(100));
        for col in &stats.columns {
            let _ = writeln!(
                out,
                "{:<20} {:>6} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                truncate_str(&col.column, 19),
                col.count,
                col.mean,
                col.std,
                col.min,
                col.q25,
                col.q50,
                col.q75,
                col.max
            );
        }
        out
    }

    /// Format a correlation matrix with one row per column.
    pub fn correlation_table(matrix: &CorrelationMatrix) -> String {
        let mut out = String::new();
        let _ = write!(out, "{:<20}", "");
        for name in &matrix.columns {
            let _ = write!(out, " {:>10}", truncate_str(name, 10));
        }
        let _ = writeln!(out);
        for (name, row) in matrix.columns.iter().zip(&matrix.values) {
            let _ = write!(out, "{:<20}", truncate_str(name, 19));
            for value in row {
                let _ = write!(out, " {:>10.3}", value);
            }
            let _ = writeln!(out);
        }
        out
    }

    /// Format rating scale summaries.
    pub fn scale_table(scales: &[ScaleSummary]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<28} {:<12} {:>8} {:>10} {:>8}",
            "Column", "Scale", "Scored", "Unscored", "Mean"
        );
        let _ = writeln!(out, "{}", "-".repeat(70));
        for scale in scales {
            let _ = writeln!(
                out,
                "{:<28} {:<12} {:>8} {:>10} {:>8.3}",
                truncate_str(&scale.column, 27),
                format!("{:?}", scale.kind).to_lowercase(),
                scale.scored,
                scale.unscored,
                scale.mean
            );
        }
        out
    }

    /// Human-readable rendering of a whole report.
    pub fn render_text(report: &AnalysisReport) -> String {
        let mut out = String::new();

        for dataset in &report.datasets {
            let _ = writeln!(out, "\n{}", "=".repeat(80));
            let _ = writeln!(out, "DATASET: {}", dataset.dataset);
            let _ = writeln!(out, "{}", "=".repeat(80));
            let _ = writeln!(
                out,
                "  Rows: {} (before cleaning: {})",
                dataset.rows_after, dataset.rows_before
            );
            let _ = writeln!(out, "  Columns: {}", dataset.columns.len());
            for warning in &dataset.warnings {
                let _ = writeln!(out, "  Warning: {}", warning);
            }

            let _ = writeln!(out, "\nPREVIEW");
            let _ = writeln!(out, "{}", "-".repeat(40));
            let _ = writeln!(out, "{}", dataset.preview);

            let _ = writeln!(out, "\nSUMMARY STATISTICS");
            let _ = writeln!(out, "{}", "-".repeat(40));
            out.push_str(&Self::statistics_table(&dataset.statistics));

            if let Some(matrix) = &dataset.correlation {
                let _ = writeln!(out, "\nCORRELATION");
                let _ = writeln!(out, "{}", "-".repeat(40));
                out.push_str(&Self::correlation_table(matrix));
            }

            if !dataset.scales.is_empty() {
                let _ = writeln!(out, "\nRATING SCALES");
                let _ = writeln!(out, "{}", "-".repeat(40));
                out.push_str(&Self::scale_table(&dataset.scales));
            }

            let _ = writeln!(out, "\nPLOTS");
            let _ = writeln!(out, "{}", "-".repeat(40));
            if dataset.plots.is_empty() {
                let _ = writeln!(out, "  No applicable plots");
            }
            for plot in &dataset.plots {
                let _ = writeln!(out, "  - {}", plot);
            }
        }

        if !report.failures.is_empty() {
            let _ = writeln!(out, "\nFAILED FILES");
            let _ = writeln!(out, "{}", "-".repeat(40));
            for failure in &report.failures {
                let _ = writeln!(out, "  {}: {}", failure.file, failure.error);
            }
        }

        out
    }

    /// Serialize a report as pretty-printed JSON.
    pub fn to_json(report: &AnalysisReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
