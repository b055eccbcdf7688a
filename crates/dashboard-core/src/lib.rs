//! Shared building blocks for the Academy Dashboard.
//!
//! Holds the activity data model, the error type, command-line settings and
//! the small formatting / date helpers used by every other crate.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, ErrorKind, Result};
