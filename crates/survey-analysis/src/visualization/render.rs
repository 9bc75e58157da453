//! SVG rendering of selected plots with `plotters`.

use super::color::{annotation_color, category_palette, diverging_color};
use super::data::{self, BoxSummary, CategoryCount, HistogramBin};
use super::{PlotKind, RenderedFigure};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::statistics::CorrelationMatrix;
use crate::types::CleanedDataset;
use crate::utils::{label_values, numeric_values, truncate_str};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::PolarsResult;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), DrawingAreaErrorKind<std::io::Error>>;

const FONT: &str = "sans-serif";

/// Data behind one figure, extracted before any drawing happens.
enum PlotData {
    Histogram(Vec<HistogramBin>),
    Counts(Vec<CategoryCount>),
    Box(Option<BoxSummary>),
    Heatmap(CorrelationMatrix),
}

/// Renders plots of cleaned datasets to standalone SVG documents.
#[derive(Debug, Clone)]
pub struct FigureRenderer {
    size: (u32, u32),
    bins: usize,
    age_column: String,
    response_column: String,
}

impl FigureRenderer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            size: config.figure_size,
            bins: config.histogram_bins,
            age_column: config.age_column.clone(),
            response_column: config.response_column.clone(),
        }
    }

    /// Render one plot of a dataset.
    ///
    /// # Errors
    ///
    /// Returns `Render` naming the dataset and plot when the required column
    /// cannot be read or drawing fails.
    pub fn render(&self, dataset: &CleanedDataset, kind: PlotKind) -> Result<RenderedFigure> {
        let file = dataset.id().as_str();
        let render_error = |reason: String| AnalysisError::Render {
            file: file.to_string(),
            plot: kind.slug().to_string(),
            reason,
        };

        let plot_data = self
            .plot_data(dataset, kind)
            .map_err(|e| render_error(e.to_string()))?;
        let title = format!("{} - {}", kind.display_name(), file);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            let drawn = root.fill(&WHITE).and_then(|_| match &plot_data {
                PlotData::Histogram(bins) => draw_histogram(&root, &title, &self.age_column, bins),
                PlotData::Counts(counts) => {
                    draw_counts(&root, &title, &self.response_column, counts)
                }
                PlotData::Box(summary) => {
                    draw_box(&root, &title, &self.age_column, summary.as_ref())
                }
                PlotData::Heatmap(matrix) => draw_heatmap(&root, &title, matrix),
            });
            drawn
                .and_then(|_| root.present())
                .map_err(|e| render_error(e.to_string()))?;
        }

        Ok(RenderedFigure {
            dataset: dataset.id().clone(),
            kind,
            title,
            svg,
        })
    }

    fn plot_data(&self, dataset: &CleanedDataset, kind: PlotKind) -> PolarsResult<PlotData> {
        let frame = dataset.frame();
        let plot_data = match kind {
            PlotKind::AgeHistogram => {
                let values = numeric_values(frame.column(&self.age_column)?)?;
                PlotData::Histogram(data::histogram_bins(&values, self.bins))
            }
            PlotKind::AgeBoxPlot => {
                let values = numeric_values(frame.column(&self.age_column)?)?;
                PlotData::Box(data::box_summary(&values))
            }
            PlotKind::ResponseCounts => {
                let labels = label_values(frame.column(&self.response_column)?)?;
                PlotData::Counts(data::category_counts(&labels))
            }
            PlotKind::ResponseCountsOrdered => {
                let labels = label_values(frame.column(&self.response_column)?)?;
                PlotData::Counts(data::ordered_by_frequency(data::category_counts(&labels)))
            }
            PlotKind::CorrelationHeatmap => PlotData::Heatmap(CorrelationMatrix::compute(
                frame,
                &dataset.capabilities().numeric_columns,
            )?),
        };
        Ok(plot_data)
    }
}

fn draw_histogram(root: &Area<'_>, title: &str, column: &str, bins: &[HistogramBin]) -> DrawResult {
    let (x_lo, x_hi) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 1.0),
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(column)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            BLUE.mix(0.6).filled(),
        )
    }))?;
    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            BLACK.stroke_width(1),
        )
    }))?;

    Ok(())
}

fn draw_counts(root: &Area<'_>, title: &str, column: &str, counts: &[CategoryCount]) -> DrawResult {
    let n = counts.len().max(1) as f64;
    let y_max = counts.iter().map(|c| c.count).max().unwrap_or(0).max(1) as f64 * 1.15;
    let colors = category_palette(counts.len());

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..n, 0f64..y_max)?;

    // Categories are annotated on the bars, so the x axis carries no ticks
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_: &f64| String::new())
        .x_desc(column)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(counts.iter().zip(&colors).enumerate().map(|(i, (c, color))| {
        let x = i as f64;
        Rectangle::new([(x + 0.15, 0.0), (x + 0.85, c.count as f64)], color.filled())
    }))?;

    let label_style = (FONT, 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
        Text::new(
            format!("{} ({})", truncate_str(&c.label, 24), c.count),
            (i as f64 + 0.5, c.count as f64),
            label_style.clone(),
        )
    }))?;

    Ok(())
}

fn draw_box(root: &Area<'_>, title: &str, column: &str, summary: Option<&BoxSummary>) -> DrawResult {
    let (y_lo, y_hi) = match summary {
        Some(s) => {
            let lo = s.outliers.first().copied().unwrap_or(s.lower_whisker).min(s.lower_whisker);
            let hi = s.outliers.last().copied().unwrap_or(s.upper_whisker).max(s.upper_whisker);
            let pad = if hi > lo { (hi - lo) * 0.08 } else { 1.0 };
            (lo - pad, hi + pad)
        }
        None => (0.0, 1.0),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..2f64, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_: &f64| String::new())
        .x_desc(column)
        .draw()?;

    let Some(s) = summary else {
        return Ok(());
    };

    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.6, s.q1), (1.4, s.q3)],
        BLUE.mix(0.3).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.6, s.q1), (1.4, s.q3)],
        BLUE.stroke_width(2),
    )))?;

    let lines = vec![
        vec![(0.6, s.median), (1.4, s.median)],
        vec![(1.0, s.q3), (1.0, s.upper_whisker)],
        vec![(1.0, s.q1), (1.0, s.lower_whisker)],
        vec![(0.8, s.upper_whisker), (1.2, s.upper_whisker)],
        vec![(0.8, s.lower_whisker), (1.2, s.lower_whisker)],
    ];
    chart.draw_series(
        lines
            .into_iter()
            .map(|points| PathElement::new(points, BLACK.stroke_width(2))),
    )?;

    chart.draw_series(
        s.outliers
            .iter()
            .map(|v| Circle::new((1.0, *v), 4, RED.filled())),
    )?;

    Ok(())
}

fn draw_heatmap(root: &Area<'_>, title: &str, matrix: &CorrelationMatrix) -> DrawResult {
    let n = matrix.size() as f64;
    // Room left of and above the grid for the column names
    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 22))
        .margin(15)
        .build_cartesian_2d(-2.0..n, 0f64..(n + 0.6))?;

    for (i, row) in matrix.values.iter().enumerate() {
        let y = n - 1.0 - i as f64;
        chart.draw_series(row.iter().enumerate().map(|(j, &r)| {
            let x = j as f64;
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], diverging_color(r).filled())
        }))?;
        chart.draw_series(row.iter().enumerate().map(|(j, &r)| {
            let style = (FONT, 14)
                .into_font()
                .color(&annotation_color(r))
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(format_coefficient(r), (j as f64 + 0.5, y + 0.5), style)
        }))?;
    }

    let row_style = (FONT, 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    chart.draw_series(matrix.columns.iter().enumerate().map(|(i, name)| {
        Text::new(
            truncate_str(name, 20),
            (-0.1, n - 0.5 - i as f64),
            row_style.clone(),
        )
    }))?;

    let column_style = (FONT, 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(matrix.columns.iter().enumerate().map(|(j, name)| {
        Text::new(
            truncate_str(name, 14),
            (j as f64 + 0.5, n + 0.1),
            column_style.clone(),
        )
    }))?;

    Ok(())
}

/// Cell annotation: two decimals, `nan` for an undefined coefficient.
fn format_coefficient(r: f64) -> String {
    if r.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.2}", r)
    }
}
