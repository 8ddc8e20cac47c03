//! Statistics Calculator Module
//! Descriptive statistics over every column, numeric and non-numeric.

use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;
use tracing::debug;

use crate::data::{any_to_text, is_numeric_dtype};

/// Row labels of the summary table, top to bottom.
pub const SUMMARY_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Statistics for a single column. Cells that do not apply are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Text for one of [`SUMMARY_ROWS`]; empty when not applicable.
    pub fn cell(&self, row: &str) -> String {
        let num = |v: Option<f64>| v.map(|x| format!("{:.3}", x)).unwrap_or_default();
        match row {
            "count" => self.count.to_string(),
            "unique" => self.unique.map(|u| u.to_string()).unwrap_or_default(),
            "top" => self.top.clone().unwrap_or_default(),
            "freq" => self.freq.map(|f| f.to_string()).unwrap_or_default(),
            "mean" => num(self.mean),
            "std" => num(self.std),
            "min" => num(self.min),
            "25%" => num(self.p25),
            "50%" => num(self.median),
            "75%" => num(self.p75),
            "max" => num(self.max),
            _ => String::new(),
        }
    }
}

/// Summary of all columns in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub columns: Vec<ColumnSummary>,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Describe every column of the DataFrame; columns are processed in parallel.
    pub fn describe(df: &DataFrame) -> Summary {
        let columns: Vec<ColumnSummary> = df
            .get_columns()
            .par_iter()
            .map(Self::describe_column)
            .collect();

        debug!(columns = columns.len(), rows = df.height(), "computed summary");
        Summary { columns }
    }

    fn describe_column(column: &Column) -> ColumnSummary {
        let name = column.name().to_string();

        if is_numeric_dtype(column.dtype()) {
            let values: Vec<f64> = column
                .cast(&DataType::Float64)
                .ok()
                .and_then(|c| c.f64().ok().map(|ca| ca.into_iter().flatten().collect()))
                .unwrap_or_default();
            let mut summary = Self::compute_numeric_stats(&values);
            summary.name = name;
            return summary;
        }

        let texts: Vec<String> = (0..column.len())
            .filter_map(|i| column.get(i).ok())
            .filter_map(|v| any_to_text(&v))
            .collect();
        let mut summary = Self::compute_categorical_stats(&texts);
        summary.name = name;
        summary
    }

    /// Count, mean, sample std, min, quartiles and max; NaN counts as missing.
    pub fn compute_numeric_stats(values: &[f64]) -> ColumnSummary {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = sorted.len();
        if n == 0 {
            return ColumnSummary::default();
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = sorted.iter().mean();
        let std = if n > 1 {
            Some(sorted.iter().std_dev())
        } else {
            None
        };

        ColumnSummary {
            count: n,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            p25: Some(Self::percentile(&sorted, 25.0)),
            median: Some(Self::percentile(&sorted, 50.0)),
            p75: Some(Self::percentile(&sorted, 75.0)),
            max: sorted.last().copied(),
            ..ColumnSummary::default()
        }
    }

    /// Count, distinct values, most frequent value and its frequency.
    ///
    /// Ties on frequency go to the value seen first.
    pub fn compute_categorical_stats(values: &[String]) -> ColumnSummary {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (i, v) in values.iter().enumerate() {
            counts.entry(v.as_str()).or_insert((0, i)).0 += 1;
        }

        let top = counts
            .iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
            .map(|(value, (freq, _))| (value.to_string(), *freq));

        ColumnSummary {
            count: values.len(),
            unique: Some(counts.len()),
            freq: top.as_ref().map(|(_, f)| *f),
            top: top.map(|(v, _)| v),
            ..ColumnSummary::default()
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
