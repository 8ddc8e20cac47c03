//! Stats module - descriptive statistics

mod describe;

pub use describe::{ColumnSummary, StatsCalculator, Summary, SUMMARY_ROWS};
