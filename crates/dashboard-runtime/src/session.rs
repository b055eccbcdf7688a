//! Interactive filter state.
//!
//! A [`FilterSession`] is the category checklist and the date range the
//! user edits from the keyboard. It never holds the table itself; every
//! edit produces a fresh [`ActivityQuery`] for the snapshot pipeline.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use dashboard_core::models::{ActivityQuery, ActivityTable, DateRange};
use dashboard_core::time_utils::shift_days;

/// Which end of the date range an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEdge {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSession {
    /// Checklist entries in first-appearance order.
    categories: Vec<String>,
    selected: BTreeSet<String>,
    cursor: usize,
    /// Observed `[min, max]` dates of the table.
    bounds: Option<DateRange>,
    range: Option<DateRange>,
}

impl FilterSession {
    /// Every category selected, full observed date range.
    pub fn new(table: &ActivityTable) -> Self {
        let categories = table.categories();
        let bounds = table.date_bounds();
        Self {
            selected: categories.iter().cloned().collect(),
            categories,
            cursor: 0,
            bounds,
            range: bounds,
        }
    }

    /// Start from a command-line selection.
    ///
    /// An empty `categories` list selects everything; names not present in
    /// the table are ignored. Missing dates default to the observed bounds.
    pub fn with_initial(
        table: &ActivityTable,
        categories: &[String],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        let mut session = Self::new(table);
        if !categories.is_empty() {
            for unknown in categories.iter().filter(|c| !session.categories.contains(c)) {
                tracing::warn!(category = %unknown, "ignoring unknown category");
            }
            session.selected = categories
                .iter()
                .filter(|c| session.categories.contains(c))
                .cloned()
                .collect();
        }
        if let Some(bounds) = session.bounds {
            session.range = Some(DateRange::new(
                start.unwrap_or(bounds.start),
                end.unwrap_or(bounds.end),
            ));
        }
        session
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The current selection as an immutable query.
    pub fn query(&self) -> ActivityQuery {
        ActivityQuery::new(self.selected.clone(), self.range)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.selected.contains(category)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    pub fn bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    // ── Category checklist ────────────────────────────────────────────────

    pub fn cursor_up(&mut self) -> ActivityQuery {
        self.cursor = self.cursor.saturating_sub(1);
        self.query()
    }

    pub fn cursor_down(&mut self) -> ActivityQuery {
        if self.cursor + 1 < self.categories.len() {
            self.cursor += 1;
        }
        self.query()
    }

    /// Flip the category under the cursor.
    pub fn toggle_current(&mut self) -> ActivityQuery {
        if let Some(category) = self.categories.get(self.cursor).cloned() {
            self.toggle(&category);
        }
        self.query()
    }

    /// Flip `category`; unknown names are ignored.
    pub fn toggle(&mut self, category: &str) -> ActivityQuery {
        if self.categories.iter().any(|c| c == category) && !self.selected.remove(category) {
            self.selected.insert(category.to_string());
        }
        self.query()
    }

    pub fn select_all(&mut self) -> ActivityQuery {
        self.selected = self.categories.iter().cloned().collect();
        self.query()
    }

    pub fn clear_all(&mut self) -> ActivityQuery {
        self.selected.clear();
        self.query()
    }

    // ── Date range ────────────────────────────────────────────────────────

    /// Move one end of the range by `days`, clamped to the observed bounds.
    ///
    /// The other end is left alone, so pushing the start past the end gives
    /// an inverted range that matches nothing.
    pub fn shift(&mut self, edge: DateEdge, days: i64) -> ActivityQuery {
        if let (Some(bounds), Some(range)) = (self.bounds, self.range.as_mut()) {
            let date = match edge {
                DateEdge::Start => &mut range.start,
                DateEdge::End => &mut range.end,
            };
            *date = shift_days(*date, days).clamp(bounds.start, bounds.end);
        }
        self.query()
    }

    /// Set the range from date-picker values.
    ///
    /// One value gives a single-day range; none leaves the range unchanged.
    /// Picked dates are not clamped to the bounds.
    pub fn pick_dates(&mut self, values: &[NaiveDate]) -> ActivityQuery {
        if let Some(range) = DateRange::from_picker(values) {
            self.range = Some(range);
        }
        self.query()
    }

    pub fn shift_start(&mut self, days: i64) -> ActivityQuery {
        self.shift(DateEdge::Start, days)
    }

    pub fn shift_end(&mut self, days: i64) -> ActivityQuery {
        self.shift(DateEdge::End, days)
    }

    /// Every category selected and the full observed range.
    pub fn reset(&mut self) -> ActivityQuery {
        self.selected = self.categories.iter().cloned().collect();
        self.range = self.bounds;
        self.cursor = 0;
        self.query()
    }

    /// Carry the session over to a freshly loaded table.
    ///
    /// Deselected categories stay deselected and new categories start
    /// selected. A range still covering the full bounds follows the new
    /// bounds; a narrowed range is clamped into them.
    pub fn rebase(&mut self, table: &ActivityTable) -> ActivityQuery {
        let was_full = self.range == self.bounds;

        let deselected: BTreeSet<String> = self
            .categories
            .iter()
            .filter(|c| !self.selected.contains(*c))
            .cloned()
            .collect();

        self.categories = table.categories();
        self.selected = self
            .categories
            .iter()
            .filter(|c| !deselected.contains(*c))
            .cloned()
            .collect();
        self.cursor = self.cursor.min(self.categories.len().saturating_sub(1));

        self.bounds = table.date_bounds();
        self.range = match (self.bounds, self.range) {
            (bounds, _) if was_full => bounds,
            (Some(b), Some(r)) => Some(DateRange::new(
                r.start.clamp(b.start, b.end),
                r.end.clamp(b.start, b.end),
            )),
            (bounds, _) => bounds,
        };
        self.query()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
