//! Required-column checks for the loaded activity log.

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::REQUIRED_COLUMNS;

/// Required columns absent from `columns`, in [`REQUIRED_COLUMNS`] order.
///
/// Matching is exact; column names are expected to be trimmed already.
pub fn missing_columns<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|c| c.as_ref() == **required))
        .map(|required| required.to_string())
        .collect()
}

/// `Ok(())` when every required column is present, otherwise
/// [`DashboardError::MissingColumns`] listing the absent ones.
pub fn validate_columns<S: AsRef<str>>(columns: &[S]) -> Result<()> {
    let missing = missing_columns(columns);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::MissingColumns(missing))
    }
}
