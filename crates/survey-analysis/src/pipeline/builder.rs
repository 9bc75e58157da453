//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating Loader → Cleaner → {Statistics, Visualization}.

use crate::cleaner::ResponseCleaner;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::loader::ResponseLoader;
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{AnalysisReport, ReportGenerator};
use crate::statistics::StatisticsEngine;
use crate::visualization::{FigureSink, LoggingFigureSink, VisualizationSelector};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// The main analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use survey_analysis::{AnalysisConfig, MemoryFigureSink, Pipeline};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemoryFigureSink::new());
/// let report = Pipeline::builder()
///     .config(AnalysisConfig::builder().histogram_bins(10).build()?)
///     .figure_sink(sink.clone())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run(Path::new("survey_results"))?;
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    figure_sink: Arc<dyn FigureSink>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    loader: ResponseLoader,
    cleaner: ResponseCleaner,
    engine: StatisticsEngine,
    selector: VisualizationSelector,
    reporter: ReportGenerator,
}

// A host may move a run to a worker thread
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse every response file in `dir`.
    ///
    /// # Errors
    ///
    /// Fails with `DirectoryNotFound` when `dir` cannot be read, and with
    /// `TypeCoercion` when a dataset cannot be coerced under
    /// [`CoercionFailurePolicy::AbortRun`](crate::config::CoercionFailurePolicy::AbortRun).
    /// Malformed files never fail the run; they are listed in the report.
    pub fn run(&self, dir: &Path) -> Result<AnalysisReport> {
        match self.run_internal(dir) {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, dir: &Path) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        info!("Starting analysis of {}", dir.display());

        // Step 1: Load
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            0.0,
            "Discovering response files...",
        ));
        let loaded = self.loader.load_directory(dir)?;
        let mut failures = loaded.failures;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            1.0,
            format!("Loaded {} dataset(s)", loaded.file_set.len()),
        ));

        // Step 2: Clean
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Cleaning,
            0.0,
            "Cleaning datasets...",
        ));
        let cleaned = self.cleaner.clean(loaded.file_set)?;
        failures.extend(cleaned.failures);
        let file_set = cleaned.file_set;
        for dataset in file_set.iter() {
            for warning in dataset.warnings() {
                warn!("{}", warning);
            }
        }
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Cleaning,
            1.0,
            format!("Cleaned {} dataset(s)", file_set.len()),
        ));

        // Step 3: Statistics
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Statistics,
            0.0,
            "Computing summary statistics...",
        ));
        let statistics = self.engine.describe_all(&file_set)?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Statistics,
            1.0,
            "Statistics complete",
        ));

        // Step 4: Visualization
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Visualization,
            0.0,
            "Rendering plots...",
        ));
        let plots = self.selector.visualize(&file_set, self.figure_sink.as_ref())?;
        let figure_count: usize = plots.iter().map(|p| p.plots.len()).sum();
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Visualization,
            1.0,
            format!("Rendered {} figure(s)", figure_count),
        ));

        // Step 5: Report
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Reporting,
            0.0,
            "Building report...",
        ));
        let report = self
            .reporter
            .build_report(dir, &file_set, statistics, plots, failures)?;

        info!(
            "Analysed {} dataset(s), {} failure(s) in {} ms",
            report.datasets.len(),
            report.failures.len(),
            start_time.elapsed().as_millis()
        );

        Ok(report)
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    figure_sink: Option<Arc<dyn FigureSink>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the analysis configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set where rendered figures go. Defaults to [`LoggingFigureSink`].
    pub fn figure_sink(mut self, sink: Arc<dyn FigureSink>) -> Self {
        self.figure_sink = Some(sink);
        self
    }

    /// Set a progress reporter for receiving updates during a run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns `InvalidConfig` if the configuration is invalid.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;

        Ok(Pipeline {
            loader: ResponseLoader::new(&config)?,
            cleaner: ResponseCleaner::new(config.clone()),
            engine: StatisticsEngine::new(),
            selector: VisualizationSelector::new(&config),
            reporter: ReportGenerator::new(config.preview_rows),
            figure_sink: self
                .figure_sink
                .unwrap_or_else(|| Arc::new(LoggingFigureSink)),
            progress_reporter: self.progress_reporter,
            config,
        })
    }
}
