//! Terminal UI layer for the Academy Dashboard.
//!
//! Provides themes, the header, filter panel and utilization bar
//! components, chart and table views, the error screen and the main
//! application event loop built on top of [`ratatui`].

pub mod app;
pub mod charts_view;
pub mod components;
pub mod error_view;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
