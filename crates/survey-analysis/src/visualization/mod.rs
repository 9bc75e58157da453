//! Column-driven plot selection and rendering.
//!
//! For each cleaned dataset a fixed rule list decides which plots apply,
//! based only on the dataset's [`ColumnCapabilities`](crate::profiler::ColumnCapabilities):
//!
//! | Plot | Requires |
//! |---|---|
//! | Age histogram | age column |
//! | Response counts | response column |
//! | Age box plot | age column |
//! | Response counts, by frequency | response column |
//! | Correlation heatmap | two or more numeric columns |
//!
//! Selected plots are rendered to SVG in memory and handed to a
//! [`FigureSink`], which decides how a figure is presented.

pub mod color;
pub mod data;
mod render;
mod selector;
mod sink;

pub use render::FigureRenderer;
pub use selector::{DatasetPlots, VisualizationSelector};
pub use sink::{FigureSink, LoggingFigureSink, MemoryFigureSink, SvgDirectorySink};

use crate::types::DatasetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The plots the selector can trigger, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    AgeHistogram,
    ResponseCounts,
    AgeBoxPlot,
    ResponseCountsOrdered,
    CorrelationHeatmap,
}

impl PlotKind {
    /// All kinds in the order the rules are evaluated.
    pub const ALL: [PlotKind; 5] = [
        Self::AgeHistogram,
        Self::ResponseCounts,
        Self::AgeBoxPlot,
        Self::ResponseCountsOrdered,
        Self::CorrelationHeatmap,
    ];

    /// Returns a human-readable name for the plot.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AgeHistogram => "Age distribution",
            Self::ResponseCounts => "Response counts",
            Self::AgeBoxPlot => "Age box plot",
            Self::ResponseCountsOrdered => "Response counts by frequency",
            Self::CorrelationHeatmap => "Correlation heatmap",
        }
    }

    /// Short identifier used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::AgeHistogram => "age_histogram",
            Self::ResponseCounts => "response_counts",
            Self::AgeBoxPlot => "age_boxplot",
            Self::ResponseCountsOrdered => "response_counts_ordered",
            Self::CorrelationHeatmap => "correlation_heatmap",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A rendered plot as a standalone SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFigure {
    pub dataset: DatasetId,
    pub kind: PlotKind,
    pub title: String,
    pub svg: String,
}

impl RenderedFigure {
    /// File name for saving the figure, unique per dataset and plot kind.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .dataset
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{}__{}.svg", stem, self.kind.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PlotKind::ResponseCountsOrdered).unwrap();
        assert_eq!(json, "\"response_counts_ordered\"");
    }

    #[test]
    fn test_figure_file_name() {
        let figure = RenderedFigure {
            dataset: DatasetId::new("survey responses 1.csv"),
            kind: PlotKind::AgeBoxPlot,
            title: String::new(),
            svg: String::new(),
        };
        assert_eq!(figure.file_name(), "survey_responses_1_csv__age_boxplot.svg");
    }
}
