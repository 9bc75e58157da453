//! CLI entry point for the survey response analysis.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use survey_analysis::{
    AnalysisConfig, AnalysisReport, CoercionFailurePolicy, FigureSink, LoggingFigureSink, Pipeline,
    ReportGenerator, SvgDirectorySink,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Survey response analysis",
    long_about = "Loads every response file of a directory, cleans each one and prints \
                  previews, summary statistics and the plots that apply.\n\n\
                  EXAMPLES:\n  \
                  # Analyse all CSV files of a directory\n  \
                  survey-analysis survey_results\n\n  \
                  # Only the per-session response files, saving figures\n  \
                  survey-analysis -i survey_results --pattern 'survey_responses_*.csv' --figures-dir figures\n\n  \
                  # Machine-readable report\n  \
                  survey-analysis -i survey_results --json"
)]
struct Args {
    /// Directory containing the response files
    #[arg(value_name = "DIR", required_unless_present = "input")]
    dir: Option<PathBuf>,

    /// Directory containing the response files (alternative to the positional argument)
    #[arg(short, long, value_name = "DIR", conflicts_with = "dir")]
    input: Option<PathBuf>,

    /// Only analyse files whose name matches this glob pattern
    #[arg(long)]
    pattern: Option<String>,

    /// JSON configuration file (fields of the analysis configuration)
    ///
    /// Command line flags override values from the file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the age column
    #[arg(long)]
    age_column: Option<String>,

    /// Name of the response column
    #[arg(long)]
    response_column: Option<String>,

    /// Number of bins of the age histogram
    #[arg(long)]
    bins: Option<usize>,

    /// Number of rows shown in each dataset preview
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Drop datasets whose columns cannot be coerced instead of aborting
    #[arg(long)]
    skip_invalid_datasets: bool,

    /// Save rendered figures as SVG files in this directory
    #[arg(long)]
    figures_dir: Option<PathBuf>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    debug!("Configuration: {:?}", config);

    let figure_sink: Arc<dyn FigureSink> = match &args.figures_dir {
        Some(dir) => {
            info!("Saving figures to {}", dir.display());
            Arc::new(SvgDirectorySink::new(dir)?)
        }
        None => Arc::new(LoggingFigureSink),
    };

    let pipeline = Pipeline::builder()
        .config(config)
        .figure_sink(figure_sink)
        .build()?;

    let input = args
        .input
        .as_ref()
        .or(args.dir.as_ref())
        .context("No input directory given")?;
    let report = pipeline.run(input)?;

    if args.json {
        println!("{}", ReportGenerator::to_json(&report)?);
    } else {
        print_human_readable_summary(&report);
    }

    Ok(())
}

/// Merge the optional configuration file with command line overrides.
fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(pattern) = &args.pattern {
        config.file_pattern = Some(pattern.clone());
    }
    if let Some(name) = &args.age_column {
        config.age_column = name.clone();
    }
    if let Some(name) = &args.response_column {
        config.response_column = name.clone();
    }
    if let Some(bins) = args.bins {
        config.histogram_bins = bins;
    }
    if let Some(rows) = args.preview_rows {
        config.preview_rows = rows;
    }
    if args.skip_invalid_datasets {
        config.coercion_failure_policy = CoercionFailurePolicy::SkipDataset;
    }

    config.validate()?;
    Ok(config)
}

/// Print the per-dataset output followed by a short run summary.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_human_readable_summary(report: &AnalysisReport) {
    print!("{}", ReportGenerator::render_text(report));

    let warnings = report.warnings();

    println!("\n{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!("  Input: {}", report.input_dir);
    println!("  Datasets analysed: {}", report.datasets.len());
    println!("  Files skipped: {}", report.failures.len());
    println!("  Warnings: {}", warnings.len());
    println!("  Generated at: {}", report.generated_at);
}
