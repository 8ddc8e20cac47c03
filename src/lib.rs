//! Population Dashboard - resident registration population & household statistics viewer
//!
//! Loads a CSV (uploaded or the monthly default file), lets the user pick
//! columns and a chart kind, and renders the chart plus a summary table.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod session;
pub mod stats;
pub mod telemetry;
