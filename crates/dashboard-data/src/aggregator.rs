//! Hour totals over a filtered view of the activity log.
//!
//! Every aggregate is a pure function of the records it is handed: empty
//! input produces empty totals and zero utilization.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use dashboard_core::formatting::percentage;
use dashboard_core::models::ActivityRecord;

/// Slice labels for the utilization chart.
pub const UTILIZED_LABEL: &str = "Utilized Hours";
pub const REMAINING_LABEL: &str = "Remaining Capacity";

// ── Aggregate types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Logged hours against a fixed weekly capacity.
///
/// `utilized` is capped at `capacity`, so `utilized + remaining == capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyUtilization {
    pub capacity: f64,
    pub utilized: f64,
    pub remaining: f64,
}

impl WeeklyUtilization {
    /// Labelled chart slices, utilized first.
    pub fn slices(&self) -> [(&'static str, f64); 2] {
        [
            (UTILIZED_LABEL, self.utilized),
            (REMAINING_LABEL, self.remaining),
        ]
    }

    /// Utilized share of capacity, one decimal place.
    pub fn percentage(&self) -> f64 {
        percentage(self.utilized, self.capacity, 1)
    }
}

/// One row of the top-activities table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopActivity {
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub outcome: String,
    pub hours: f64,
}

impl From<&ActivityRecord> for TopActivity {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            category: record.activity_category.clone(),
            outcome: record.outcome().to_string(),
            hours: record.working_hours_spent,
        }
    }
}

// ── ActivityAggregator ────────────────────────────────────────────────────────

/// Stateless helper that sums hours by category, by day and overall.
pub struct ActivityAggregator;

impl ActivityAggregator {
    /// Hours per category, ordered by category name.
    pub fn category_totals(records: &[&ActivityRecord]) -> Vec<CategoryTotal> {
        let mut map: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            *map.entry(record.activity_category.as_str()).or_default() +=
                record.working_hours_spent;
        }
        map.into_iter()
            .map(|(category, hours)| CategoryTotal {
                category: category.to_string(),
                hours,
            })
            .collect()
    }

    /// Hours per calendar day, ascending by date.
    pub fn daily_totals(records: &[&ActivityRecord]) -> Vec<DailyTotal> {
        let mut map: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            *map.entry(record.date).or_default() += record.working_hours_spent;
        }
        map.into_iter()
            .map(|(date, hours)| DailyTotal { date, hours })
            .collect()
    }

    pub fn total_hours(records: &[&ActivityRecord]) -> f64 {
        records.iter().map(|r| r.working_hours_spent).sum()
    }

    /// Hours logged across `records` measured against `capacity`.
    pub fn weekly_utilization(records: &[&ActivityRecord], capacity: f64) -> WeeklyUtilization {
        let logged: f64 = Self::daily_totals(records).iter().map(|d| d.hours).sum();
        let utilized = logged.min(capacity);
        WeeklyUtilization {
            capacity,
            utilized,
            remaining: (capacity - utilized).max(0.0),
        }
    }

    /// The `n` records with the most hours, largest first.
    ///
    /// Ties keep their original row order.
    pub fn top_activities(records: &[&ActivityRecord], n: usize) -> Vec<TopActivity> {
        let mut ranked: Vec<&ActivityRecord> = records.to_vec();
        ranked.sort_by(|a, b| b.working_hours_spent.total_cmp(&a.working_hours_spent));
        ranked.into_iter().take(n).map(TopActivity::from).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str, category: &str, hours: f64, outcome: &str) -> ActivityRecord {
        let timestamp = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap();
        let outcome = (!outcome.is_empty()).then(|| outcome.to_string());
        ActivityRecord::new(timestamp, category, hours, outcome)
    }

    fn example() -> Vec<ActivityRecord> {
        vec![
            record("2025-08-04 09:00", "A", 2.0, "Deck"),
            record("2025-08-05 09:00", "B", 5.0, "Workshop"),
            record("2025-08-05 14:00", "A", 1.0, ""),
        ]
    }

    fn refs(records: &[ActivityRecord]) -> Vec<&ActivityRecord> {
        records.iter().collect()
    }

    // ── category_totals ───────────────────────────────────────────────────────

    #[test]
    fn test_category_totals_example() {
        let records = example();
        let totals = ActivityAggregator::category_totals(&refs(&records));
        assert_eq!(
            totals,
            vec![
                CategoryTotal { category: "A".into(), hours: 3.0 },
                CategoryTotal { category: "B".into(), hours: 5.0 },
            ]
        );
    }

    #[test]
    fn test_category_totals_partition_total() {
        let records = example();
        let rows = refs(&records);
        let sum: f64 = ActivityAggregator::category_totals(&rows)
            .iter()
            .map(|c| c.hours)
            .sum();
        assert_eq!(sum, ActivityAggregator::total_hours(&rows));
    }

    #[test]
    fn test_category_totals_sorted_by_name() {
        let records = vec![
            record("2025-08-04 09:00", "Zeta", 1.0, ""),
            record("2025-08-04 10:00", "Alpha", 1.0, ""),
        ];
        let names: Vec<String> = ActivityAggregator::category_totals(&refs(&records))
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    // ── daily_totals ──────────────────────────────────────────────────────────

    #[test]
    fn test_daily_totals_ascending() {
        let records = vec![
            record("2025-08-06 09:00", "A", 1.0, ""),
            record("2025-08-04 09:00", "A", 2.0, ""),
            record("2025-08-06 17:00", "B", 0.5, ""),
        ];
        let daily = ActivityAggregator::daily_totals(&refs(&records));
        assert_eq!(daily.len(), 2);
        assert!(daily[0].date < daily[1].date);
        assert_eq!(daily[1].hours, 1.5);
    }

    // ── weekly_utilization ────────────────────────────────────────────────────

    #[test]
    fn test_utilization_example() {
        let records = example();
        let util = ActivityAggregator::weekly_utilization(&refs(&records), 37.5);
        assert_eq!(util.utilized, 8.0);
        assert_eq!(util.remaining, 29.5);
        assert_eq!(
            util.slices(),
            [(UTILIZED_LABEL, 8.0), (REMAINING_LABEL, 29.5)]
        );
        assert!((util.percentage() - 21.3).abs() < 1e-9);
    }

    #[test]
    fn test_utilization_capped_at_capacity() {
        let records = vec![
            record("2025-08-04 09:00", "A", 30.0, ""),
            record("2025-08-05 09:00", "A", 12.0, ""),
        ];
        let util = ActivityAggregator::weekly_utilization(&refs(&records), 37.5);
        assert_eq!(util.utilized, 37.5);
        assert_eq!(util.remaining, 0.0);
        assert_eq!(util.percentage(), 100.0);
    }

    #[test]
    fn test_utilization_empty_input() {
        let util = ActivityAggregator::weekly_utilization(&[], 37.5);
        assert_eq!(util.utilized, 0.0);
        assert_eq!(util.remaining, 37.5);
        assert_eq!(util.utilized + util.remaining, util.capacity);
    }

    // ── top_activities ────────────────────────────────────────────────────────

    #[test]
    fn test_top_activities_descending_and_limited() {
        let records = example();
        let top = ActivityAggregator::top_activities(&refs(&records), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].hours, 5.0);
        assert_eq!(top[0].outcome, "Workshop");
        assert_eq!(top[1].hours, 2.0);
    }

    #[test]
    fn test_top_activities_ties_keep_order() {
        let records = vec![
            record("2025-08-04 09:00", "First", 2.0, ""),
            record("2025-08-04 10:00", "Second", 2.0, ""),
            record("2025-08-04 11:00", "Third", 3.0, ""),
        ];
        let top = ActivityAggregator::top_activities(&refs(&records), 5);
        let order: Vec<&str> = top.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(order, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_top_activities_idempotent() {
        let records = example();
        let first = ActivityAggregator::top_activities(&refs(&records), 5);
        let second = ActivityAggregator::top_activities(&refs(&records), 5);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_empty_input_gives_empty_aggregates() {
        assert!(ActivityAggregator::category_totals(&[]).is_empty());
        assert!(ActivityAggregator::daily_totals(&[]).is_empty());
        assert!(ActivityAggregator::top_activities(&[], 5).is_empty());
        assert_eq!(ActivityAggregator::total_hours(&[]), 0.0);
    }
}
