use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ── Column names ──────────────────────────────────────────────────────────────

/// Raw timestamp column in the source sheet.
pub const COL_TIMESTAMP: &str = "TimeStamp";
/// Day-granularity column derived from [`COL_TIMESTAMP`] at load time.
pub const COL_DATE: &str = "Date";
pub const COL_CATEGORY: &str = "Activity Category";
pub const COL_HOURS: &str = "Working Hrs Spent";
pub const COL_OUTCOME: &str = "Specific Outcome/s";

/// Columns that must exist after loading, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_CATEGORY, COL_DATE, COL_HOURS, COL_OUTCOME];

/// Default weekly capacity in hours.
pub const DEFAULT_WEEKLY_CAPACITY: f64 = 37.5;

/// Default number of rows in the top-activities table.
pub const DEFAULT_TOP_N: usize = 5;

// ── CellValue ─────────────────────────────────────────────────────────────────

/// A spreadsheet cell carried through unchanged for columns the dashboard
/// does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text content with surrounding whitespace removed, `None` for blanks.
    ///
    /// Numbers and booleans are rendered, so a category typed as `2024` in
    /// the sheet is still usable as a label.
    pub fn as_label(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(self.to_string().trim().to_string())
    }

    /// Numeric content. Text cells are parsed leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

// ── ActivityRecord ────────────────────────────────────────────────────────────

/// One retained row of the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Parsed timestamp of the log entry.
    pub timestamp: NaiveDateTime,
    /// `timestamp` truncated to the day.
    pub date: NaiveDate,
    pub activity_category: String,
    pub working_hours_spent: f64,
    /// Free-text outcome; blank cells become `None`.
    pub specific_outcome: Option<String>,
    /// Remaining columns, aligned with [`ActivityTable::extra_columns`].
    #[serde(default)]
    pub extras: Vec<CellValue>,
}

impl ActivityRecord {
    /// Build a record, deriving `date` from `timestamp`.
    pub fn new(
        timestamp: NaiveDateTime,
        activity_category: impl Into<String>,
        working_hours_spent: f64,
        specific_outcome: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            date: timestamp.date(),
            activity_category: activity_category.into(),
            working_hours_spent,
            specific_outcome,
            extras: Vec::new(),
        }
    }

    pub fn with_extras(mut self, extras: Vec<CellValue>) -> Self {
        self.extras = extras;
        self
    }

    pub fn outcome(&self) -> &str {
        self.specific_outcome.as_deref().unwrap_or("")
    }
}

// ── ActivityTable ─────────────────────────────────────────────────────────────

/// The loaded activity log. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTable {
    columns: Vec<String>,
    extra_columns: Vec<String>,
    records: Vec<ActivityRecord>,
}

impl ActivityTable {
    pub fn new(
        columns: Vec<String>,
        extra_columns: Vec<String>,
        records: Vec<ActivityRecord>,
    ) -> Self {
        Self {
            columns,
            extra_columns,
            records,
        }
    }

    /// Build a table holding only the required columns, mostly for tests and
    /// programmatic callers.
    pub fn from_records(records: Vec<ActivityRecord>) -> Self {
        let columns = [COL_TIMESTAMP, COL_CATEGORY, COL_HOURS, COL_OUTCOME, COL_DATE]
            .iter()
            .map(|c| c.to_string())
            .collect();
        Self::new(columns, Vec::new(), records)
    }

    /// All column names (trimmed, sheet order, derived `Date` last).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Columns passed through without interpretation.
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.activity_category.as_str()))
            .map(|r| r.activity_category.clone())
            .collect()
    }

    /// `[min(date), max(date)]` over all records, `None` when empty.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some(DateRange::new(min, max))
    }
}

// ── DateRange ─────────────────────────────────────────────────────────────────

/// Inclusive date interval. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Interpret the values produced by a date picker.
    ///
    /// A picker can hand back zero, one or two dates while the user is still
    /// choosing. One date means a single-day range; extra values are ignored.
    pub fn from_picker(values: &[NaiveDate]) -> Option<Self> {
        match values {
            [] => None,
            [day] => Some(Self::single(*day)),
            [start, end, ..] => Some(Self::new(*start, *end)),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of days covered, zero for an inverted range.
    pub fn days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

// ── ActivityQuery ─────────────────────────────────────────────────────────────

/// Immutable description of what the user wants to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityQuery {
    /// Selected category labels. Empty selects nothing.
    pub categories: BTreeSet<String>,
    /// Inclusive date bounds; `None` leaves dates unconstrained.
    pub date_range: Option<DateRange>,
}

impl ActivityQuery {
    pub fn new(categories: BTreeSet<String>, date_range: Option<DateRange>) -> Self {
        Self {
            categories,
            date_range,
        }
    }

    /// Every category in `table` and its full observed date range.
    pub fn for_table(table: &ActivityTable) -> Self {
        Self::new(
            table.categories().into_iter().collect(),
            table.date_bounds(),
        )
    }

    /// Does `record` pass both the category and the date constraint?
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        self.categories.contains(&record.activity_category)
            && self
                .date_range
                .map(|range| range.contains(record.date))
                .unwrap_or(true)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
