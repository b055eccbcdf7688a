//! Load-once holder for the activity table.
//!
//! [`ActivityLoader`] is constructed once with the workbook path and sheet
//! index. [`ActivityLoader::load`] reads the workbook on first use and hands
//! back the cached table afterwards; [`ActivityLoader::reload`] re-reads on
//! demand and keeps the previous table when the new read fails.

use std::path::{Path, PathBuf};
use std::time::Instant;

use dashboard_core::error::{DashboardError, ErrorKind, Result};
use dashboard_core::models::ActivityTable;
use dashboard_data::reader::load_activity_table;

// ── LoadFailure ───────────────────────────────────────────────────────────────

/// What the last failed read reported, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: ErrorKind,
    pub title: &'static str,
    pub message: String,
}

impl From<&DashboardError> for LoadFailure {
    fn from(err: &DashboardError) -> Self {
        Self {
            kind: err.kind(),
            title: err.title(),
            message: err.to_string(),
        }
    }
}

// ── ActivityLoader ────────────────────────────────────────────────────────────

/// Cached wrapper around [`load_activity_table`].
///
/// # Example
/// ```no_run
/// use dashboard_runtime::data_manager::ActivityLoader;
///
/// let mut loader = ActivityLoader::new("utilization.xlsx", 1);
/// match loader.load() {
///     Ok(table) => println!("{} activities", table.len()),
///     Err(e) => eprintln!("{}: {}", e.title(), e),
/// }
/// ```
pub struct ActivityLoader {
    path: PathBuf,
    sheet_index: usize,
    /// Most recently loaded table.
    table: Option<ActivityTable>,
    /// When `table` was populated.
    loaded_at: Option<Instant>,
    /// The last read failure, cleared by a successful read.
    last_error: Option<LoadFailure>,
}

impl ActivityLoader {
    pub fn new(path: impl Into<PathBuf>, sheet_index: usize) -> Self {
        Self {
            path: path.into(),
            sheet_index,
            table: None,
            loaded_at: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// The loaded table, reading the workbook only on the first call.
    ///
    /// A failed first read is not cached; the next call tries again.
    pub fn load(&mut self) -> Result<&ActivityTable> {
        if self.table.is_none() {
            tracing::debug!(path = %self.path.display(), "loading activity table");
            let table = self.read()?;
            return Ok(self.store(table));
        }
        tracing::debug!("returning cached activity table");
        self.table
            .as_ref()
            .ok_or_else(|| DashboardError::Other(anyhow::anyhow!("activity table not loaded")))
    }

    /// Re-read the workbook.
    ///
    /// On failure the previously loaded table (if any) stays in place and the
    /// error is available from [`last_error`](Self::last_error).
    pub fn reload(&mut self) -> Result<&ActivityTable> {
        tracing::info!(path = %self.path.display(), "reloading activity table");
        match self.read() {
            Ok(table) => Ok(self.store(table)),
            Err(e) => {
                if self.table.is_some() {
                    tracing::warn!(error = %e, "reload failed; keeping previous table");
                }
                Err(e)
            }
        }
    }

    /// The cached table without touching the disk.
    pub fn table(&self) -> Option<&ActivityTable> {
        self.table.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn last_error(&self) -> Option<&LoadFailure> {
        self.last_error.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_index(&self) -> usize {
        self.sheet_index
    }

    /// Seconds since the table was last loaded.
    pub fn age_secs(&self) -> Option<u64> {
        self.loaded_at.map(|ts| ts.elapsed().as_secs())
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn read(&mut self) -> Result<ActivityTable> {
        let started = Instant::now();
        match load_activity_table(&self.path, self.sheet_index) {
            Ok(table) => {
                tracing::debug!(
                    rows = table.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "workbook read"
                );
                Ok(table)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load activity table");
                self.last_error = Some(LoadFailure::from(&e));
                Err(e)
            }
        }
    }

    fn store(&mut self, table: ActivityTable) -> &ActivityTable {
        self.loaded_at = Some(Instant::now());
        self.last_error = None;
        self.table.insert(table)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
