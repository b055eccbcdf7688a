use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used by the presentation layer to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The workbook could not be opened or read.
    Load,
    /// The workbook was read but required columns are absent.
    Schema,
    /// Anything else (terminal, configuration, ...).
    Other,
}

/// All errors produced by the Academy Dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The input workbook does not exist.
    #[error("Data file not found: {0}")]
    FileNotFound(PathBuf),

    /// The spreadsheet reader rejected the workbook or a sheet in it.
    #[error("Failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// The requested sheet index is beyond the sheets in the workbook.
    #[error("Sheet index {index} not found in {path} ({available} sheet(s) available)")]
    SheetNotFound {
        path: PathBuf,
        index: usize,
        available: usize,
    },

    /// The sheet has no header row.
    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),

    /// One or more required columns are absent after loading.
    #[error("Missing columns in dataset: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// Map the variant onto the two error kinds the dashboard reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_)
            | Self::Workbook { .. }
            | Self::SheetNotFound { .. }
            | Self::EmptySheet(_)
            | Self::Io(_) => ErrorKind::Load,
            Self::MissingColumns(_) => ErrorKind::Schema,
            Self::Terminal(_) | Self::Config(_) | Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Heading shown above the error message in the UI and on stderr.
    pub fn title(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Load => "Error loading data",
            ErrorKind::Schema => "Invalid dataset",
            ErrorKind::Other => "Error",
        }
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_not_found() {
        let err = DashboardError::FileNotFound(PathBuf::from("/data/log.xlsm"));
        assert_eq!(err.to_string(), "Data file not found: /data/log.xlsm");
    }

    #[test]
    fn test_error_display_workbook() {
        let err = DashboardError::Workbook {
            path: PathBuf::from("broken.xlsx"),
            message: "invalid zip header".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("broken.xlsx"));
        assert!(msg.contains("invalid zip header"));
    }

    #[test]
    fn test_error_display_sheet_not_found() {
        let err = DashboardError::SheetNotFound {
            path: PathBuf::from("log.xlsx"),
            index: 1,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Sheet index 1 not found in log.xlsx (1 sheet(s) available)"
        );
    }

    #[test]
    fn test_error_display_missing_columns() {
        let err = DashboardError::MissingColumns(vec![
            "Date".to_string(),
            "Specific Outcome/s".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing columns in dataset: Date, Specific Outcome/s"
        );
    }

    #[test]
    fn test_error_kind_load() {
        assert_eq!(
            DashboardError::FileNotFound(PathBuf::from("x")).kind(),
            ErrorKind::Load
        );
        assert_eq!(
            DashboardError::EmptySheet("Log".to_string()).kind(),
            ErrorKind::Load
        );
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(DashboardError::from(io_err).kind(), ErrorKind::Load);
    }

    #[test]
    fn test_error_kind_schema() {
        let err = DashboardError::MissingColumns(vec!["Date".to_string()]);
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.title(), "Invalid dataset");
    }

    #[test]
    fn test_error_kind_other() {
        let err = DashboardError::Config("capacity must be positive".to_string());
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.to_string(), "Configuration error: capacity must be positive");
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: DashboardError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
