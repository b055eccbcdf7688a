//! Runtime state for the Academy Dashboard.
//!
//! Owns the loaded activity table and the interactive filter state, and
//! turns both into snapshots for the presentation layer.

pub mod data_manager;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
