//! Pairwise Pearson correlation between numeric columns.

use super::descriptive::pearson;
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Square correlation matrix over the numeric columns of one dataset.
///
/// Row and column order follow `columns`. The diagonal is always 1; a pair
/// involving a zero-variance column is NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Compute the matrix for the named numeric columns of a cleaned frame.
    pub fn compute(df: &DataFrame, columns: &[String]) -> PolarsResult<Self> {
        let data = columns
            .iter()
            .map(|name| numeric_values(df.column(name)?))
            .collect::<PolarsResult<Vec<_>>>()?;

        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let r = pearson(&data[i], &data[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Ok(Self {
            columns: columns.to_vec(),
            values,
        })
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    /// Coefficient between two columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Symmetry check treating two NaN entries as equal.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size()).all(|i| {
            (0..self.size()).all(|j| {
                let (a, b) = (self.values[i][j], self.values[j][i]);
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }
}
