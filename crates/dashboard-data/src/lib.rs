//! Data layer for the Academy Dashboard.
//!
//! Reads the utilization workbook, validates its columns, filters the
//! activity log by an [`ActivityQuery`](dashboard_core::models::ActivityQuery)
//! and computes the aggregates the dashboard charts.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;
pub mod validator;

pub use dashboard_core as core;
