//! Rule-based plot selection.

use super::{FigureRenderer, FigureSink, PlotKind};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::profiler::ColumnCapabilities;
use crate::types::{CleanedFileSet, DatasetId};
use serde::Serialize;
use tracing::{debug, info};

/// The plots presented for one dataset, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetPlots {
    pub dataset: DatasetId,
    pub plots: Vec<PlotKind>,
}

/// Decides which plots apply to each dataset and presents them.
#[derive(Debug, Clone)]
pub struct VisualizationSelector {
    renderer: FigureRenderer,
}

impl VisualizationSelector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            renderer: FigureRenderer::new(config),
        }
    }

    /// Evaluate the rule list against a dataset's capabilities.
    ///
    /// A missing column is a normal skip, never an error.
    pub fn select(capabilities: &ColumnCapabilities) -> Vec<PlotKind> {
        PlotKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                PlotKind::AgeHistogram | PlotKind::AgeBoxPlot => capabilities.has_age_column,
                PlotKind::ResponseCounts | PlotKind::ResponseCountsOrdered => {
                    capabilities.has_response_column
                }
                PlotKind::CorrelationHeatmap => capabilities.supports_correlation(),
            })
            .collect()
    }

    /// Select, render and present the plots of every dataset, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first `Render` or `FigureSink` error.
    pub fn visualize(
        &self,
        file_set: &CleanedFileSet,
        sink: &dyn FigureSink,
    ) -> Result<Vec<DatasetPlots>> {
        info!("Selecting plots for {} dataset(s)...", file_set.len());

        let mut presented = Vec::with_capacity(file_set.len());
        for dataset in file_set.iter() {
            let plots = Self::select(dataset.capabilities());
            debug!("'{}': {:?}", dataset.id(), plots);

            for kind in &plots {
                let figure = self.renderer.render(dataset, *kind)?;
                sink.present(&figure)?;
            }

            presented.push(DatasetPlots {
                dataset: dataset.id().clone(),
                plots,
            });
        }

        Ok(presented)
    }
}
