//! Narrowing the activity log to the user's selection.

use dashboard_core::models::{ActivityQuery, ActivityRecord, ActivityTable};

/// Records of `table` matching `query`, in original row order.
///
/// The table is borrowed, never copied or mutated. An empty category
/// selection or an inverted date range yields an empty view.
pub fn filter_records<'a>(table: &'a ActivityTable, query: &ActivityQuery) -> Vec<&'a ActivityRecord> {
    if query.categories.is_empty() || query.date_range.is_some_and(|r| r.is_empty()) {
        return Vec::new();
    }
    table.records().iter().filter(|r| query.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dashboard_core::models::DateRange;
    use std::collections::BTreeSet;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn table() -> ActivityTable {
        ActivityTable::from_records(vec![
            ActivityRecord::new(ts("2025-08-01 09:00"), "Training", 2.0, None),
            ActivityRecord::new(ts("2025-08-02 09:00"), "Coaching", 5.0, None),
            ActivityRecord::new(ts("2025-08-03 23:59"), "Training", 1.0, None),
            ActivityRecord::new(ts("2025-08-04 08:00"), "Admin", 0.5, None),
        ])
    }

    #[test]
    fn test_default_query_keeps_everything() {
        let table = table();
        let query = ActivityQuery::for_table(&table);
        assert_eq!(filter_records(&table, &query).len(), table.len());
    }

    #[test]
    fn test_category_subset_with_full_range() {
        let table = table();
        let query = ActivityQuery::new(set(&["Training", "Admin"]), table.date_bounds());
        let rows = filter_records(&table, &query);
        assert_eq!(rows.len(), 3);
        assert!(rows
            .iter()
            .all(|r| r.activity_category == "Training" || r.activity_category == "Admin"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let table = table();
        let query = ActivityQuery::new(
            set(&["Training", "Coaching", "Admin"]),
            Some(DateRange::new(day("2025-08-02"), day("2025-08-03"))),
        );
        let hours: Vec<f64> = filter_records(&table, &query)
            .iter()
            .map(|r| r.working_hours_spent)
            .collect();
        assert_eq!(hours, vec![5.0, 1.0]);
    }

    #[test]
    fn test_single_day_range() {
        let table = table();
        let range = DateRange::from_picker(&[day("2025-08-04")]);
        let query = ActivityQuery::new(set(&["Admin", "Training"]), range);
        let rows = filter_records(&table, &query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].activity_category, "Admin");
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let table = table();
        let query = ActivityQuery::new(
            set(&["Training", "Coaching", "Admin"]),
            Some(DateRange::new(day("2025-08-04"), day("2025-08-01"))),
        );
        assert!(filter_records(&table, &query).is_empty());
    }

    #[test]
    fn test_empty_selection_is_empty() {
        let table = table();
        let query = ActivityQuery::new(BTreeSet::new(), table.date_bounds());
        assert!(filter_records(&table, &query).is_empty());
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let table = table();
        let query = ActivityQuery::new(set(&["Research"]), None);
        assert!(filter_records(&table, &query).is_empty());
    }

    #[test]
    fn test_filter_preserves_source_table() {
        let table = table();
        let before = table.clone();
        let query = ActivityQuery::new(set(&["Coaching"]), None);
        let _ = filter_records(&table, &query);
        assert_eq!(table, before);
    }
}
