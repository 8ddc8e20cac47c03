//! Pivot Module
//! Mean pivot table keyed by two categorical columns (heatmap input).

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use super::dataset::{any_to_text, numeric_values};

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Dense `rows x columns` matrix of mean values.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub index_name: String,
    pub columns_name: String,
    pub values_name: String,
    pub row_keys: Vec<String>,
    pub col_keys: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    /// Mean at (row key, column key), `None` when nothing was observed there.
    pub fn value(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_keys.iter().position(|k| k == row)?;
        let c = self.col_keys.iter().position(|k| k == col)?;
        self.cell(r, c)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_keys.len(), self.col_keys.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty() || self.col_keys.is_empty()
    }

    /// Min and max over populated cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Group by (`index`, `columns`) and average `values`.
///
/// Missing keys and missing or non-numeric values are skipped, and axes come
/// out sorted. With `columns == index` only the diagonal is populated.
pub fn pivot_mean(
    df: &DataFrame,
    index: &str,
    columns: &str,
    values: &str,
) -> Result<PivotTable, PivotError> {
    let index_col = df.column(index)?;
    let columns_col = df.column(columns)?;
    let values_num = numeric_values(df.column(values)?)?;

    let mut sums: HashMap<(String, String), (f64, usize)> = HashMap::new();

    for i in 0..df.height() {
        let (Some(row), Some(col)) = (
            any_to_text(&index_col.get(i)?),
            any_to_text(&columns_col.get(i)?),
        ) else {
            continue;
        };
        let Some(v) = values_num.get(i).copied().flatten() else {
            continue;
        };
        if v.is_nan() {
            continue;
        }

        let entry = sums.entry((row, col)).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }

    let row_keys = sorted_keys(sums.keys().map(|(r, _)| r.clone()).collect());
    let col_keys = sorted_keys(sums.keys().map(|(_, c)| c.clone()).collect());

    let cells = row_keys
        .iter()
        .map(|r| {
            col_keys
                .iter()
                .map(|c| {
                    sums.get(&(r.clone(), c.clone()))
                        .map(|&(sum, n)| sum / n as f64)
                })
                .collect()
        })
        .collect();

    Ok(PivotTable {
        index_name: index.to_string(),
        columns_name: columns.to_string(),
        values_name: values.to_string(),
        row_keys,
        col_keys,
        cells,
    })
}

/// Deduplicate and sort; numerically when every key is a number.
fn sorted_keys(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys.dedup();

    let numeric: Option<Vec<f64>> = keys.iter().map(|k| k.parse::<f64>().ok()).collect();
    if let Some(nums) = numeric {
        let mut paired: Vec<(f64, String)> = nums.into_iter().zip(keys).collect();
        paired.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        return paired.into_iter().map(|(_, k)| k).collect();
    }

    keys
}
