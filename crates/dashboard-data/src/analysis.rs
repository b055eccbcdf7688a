//! Filter-then-aggregate pipeline feeding every view.
//!
//! [`build_snapshot`] is recomputed on each user interaction; it never
//! touches the loaded table beyond borrowing it.

use serde::Serialize;

use dashboard_core::models::{
    ActivityQuery, ActivityTable, DEFAULT_TOP_N, DEFAULT_WEEKLY_CAPACITY,
};

use crate::aggregator::{
    ActivityAggregator, CategoryTotal, DailyTotal, TopActivity, WeeklyUtilization,
};
use crate::filter::filter_records;

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs that shape the aggregates but not the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotOptions {
    /// Weekly capacity in hours.
    pub capacity: f64,
    /// Rows in the top-activities table.
    pub top_n: usize,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WEEKLY_CAPACITY,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Everything the presenter needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// The query these aggregates were computed for.
    pub query: ActivityQuery,
    /// Rows in the loaded table.
    pub total_records: usize,
    /// Rows passing the query.
    pub matched_records: usize,
    pub total_hours: f64,
    pub category_totals: Vec<CategoryTotal>,
    pub daily_totals: Vec<DailyTotal>,
    pub utilization: WeeklyUtilization,
    pub top_activities: Vec<TopActivity>,
}

impl DashboardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.matched_records == 0
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Filter `table` by `query` and compute all aggregates over the result.
pub fn build_snapshot(
    table: &ActivityTable,
    query: &ActivityQuery,
    options: SnapshotOptions,
) -> DashboardSnapshot {
    let rows = filter_records(table, query);
    tracing::debug!(
        matched = rows.len(),
        total = table.len(),
        categories = query.categories.len(),
        "Built dashboard snapshot"
    );

    DashboardSnapshot {
        query: query.clone(),
        total_records: table.len(),
        matched_records: rows.len(),
        total_hours: ActivityAggregator::total_hours(&rows),
        category_totals: ActivityAggregator::category_totals(&rows),
        daily_totals: ActivityAggregator::daily_totals(&rows),
        utilization: ActivityAggregator::weekly_utilization(&rows, options.capacity),
        top_activities: ActivityAggregator::top_activities(&rows, options.top_n),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
