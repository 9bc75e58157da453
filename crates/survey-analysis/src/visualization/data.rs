//! Plot-ready data derived from cleaned columns.
//!
//! Everything here is pure so the numbers behind each figure can be tested
//! without rendering.

use crate::statistics::descriptive::{percentile_sorted, sorted};
use serde::Serialize;
use std::collections::HashMap;

/// One equal-width histogram bin, `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split values into `bins` equal-width bins spanning their range.
///
/// A constant column gets a unit-wide range centred on its value.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

/// Occurrences of one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Count labels, keeping the order in which each label first appears.
pub fn category_counts(labels: &[String]) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for label in labels {
        match index.get(label.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label.as_str(), counts.len());
                counts.push(CategoryCount {
                    label: label.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Sort counts by descending frequency. Ties keep first-appearance order.
pub fn ordered_by_frequency(mut counts: Vec<CategoryCount>) -> Vec<CategoryCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Five-number summary for a box plot with 1.5·IQR whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value not below `q1 - 1.5·IQR`.
    pub lower_whisker: f64,
    /// Largest value not above `q3 + 1.5·IQR`.
    pub upper_whisker: f64,
    /// Values outside the whiskers, ascending.
    pub outliers: Vec<f64>,
}

/// Box-plot summary of a distribution, `None` when there are no values.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted(values);
    let q1 = percentile_sorted(&sorted, 0.25);
    let median = percentile_sorted(&sorted, 0.5);
    let q3 = percentile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let inside = || {
        sorted
            .iter()
            .copied()
            .filter(|v| *v >= lower_fence && *v <= upper_fence)
    };
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    Some(BoxSummary {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}
