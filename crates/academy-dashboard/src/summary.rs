//! Plain-text summary printed by `--view summary`.

use std::fmt;

use dashboard_core::formatting::{count_label, format_hours, format_number};
use dashboard_data::analysis::DashboardSnapshot;

const RULE_WIDTH: usize = 60;
const CATEGORY_WIDTH: usize = 28;

/// Text rendering of one [`DashboardSnapshot`].
pub struct SummaryReport<'a> {
    snapshot: &'a DashboardSnapshot,
    file_name: &'a str,
    /// Categories present in the workbook, selected or not.
    total_categories: usize,
}

impl<'a> SummaryReport<'a> {
    pub fn new(snapshot: &'a DashboardSnapshot, file_name: &'a str, total_categories: usize) -> Self {
        Self {
            snapshot,
            file_name,
            total_categories,
        }
    }

    fn write_overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        let categories: Vec<&str> = s.query.categories.iter().map(String::as_str).collect();
        let range = s
            .query
            .date_range
            .map(|r| r.to_string())
            .unwrap_or_else(|| "no dates".to_string());

        writeln!(f, "ACADEMY UTILIZATION SUMMARY")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "File:        {}", self.file_name)?;
        writeln!(
            f,
            "Categories:  {} ({} of {})",
            if categories.is_empty() { "none".to_string() } else { categories.join(", ") },
            categories.len(),
            self.total_categories
        )?;
        writeln!(f, "Date range:  {}", range)?;
        writeln!(
            f,
            "Activities:  {} of {}",
            count_label(s.matched_records, "activity", "activities"),
            format_number(s.total_records as f64, 0)
        )?;
        writeln!(f, "Total hours: {}", format_hours(s.total_hours))
    }

    fn write_categories(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hours by Category")?;
        for total in &self.snapshot.category_totals {
            writeln!(
                f,
                "  {:<width$} {:>9}",
                total.category,
                format_number(total.hours, 1),
                width = CATEGORY_WIDTH
            )?;
        }
        Ok(())
    }

    fn write_utilization(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = &self.snapshot.utilization;
        writeln!(f, "Weekly Utilization (capacity {})", format_hours(u.capacity))?;
        for (label, hours) in u.slices() {
            writeln!(
                f,
                "  {:<width$} {:>9}",
                label,
                format_hours(hours),
                width = CATEGORY_WIDTH
            )?;
        }
        writeln!(f, "  {:<width$} {:>8}%", "Utilization", format_number(u.percentage(), 1), width = CATEGORY_WIDTH)
    }

    fn write_daily(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Daily Hours")?;
        for day in &self.snapshot.daily_totals {
            writeln!(f, "  {}  {:>9}", day.date.format("%Y-%m-%d"), format_number(day.hours, 1))?;
        }
        Ok(())
    }

    fn write_top(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = &self.snapshot.top_activities;
        writeln!(f, "Top {} Activities", top.len())?;
        writeln!(f, "  {:>2}  {:<16}  {:<20}  {:>6}  Outcome", "#", "Timestamp", "Category", "Hours")?;
        for (i, activity) in top.iter().enumerate() {
            writeln!(
                f,
                "  {:>2}  {:<16}  {:<20}  {:>6}  {}",
                i + 1,
                activity.timestamp.format("%Y-%m-%d %H:%M"),
                activity.category,
                format_number(activity.hours, 1),
                activity.outcome
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_overview(f)?;
        writeln!(f)?;

        if self.snapshot.is_empty() {
            writeln!(f, "No matching activities")?;
            writeln!(f)?;
            return self.write_utilization(f);
        }

        self.write_categories(f)?;
        writeln!(f)?;
        self.write_utilization(f)?;
        writeln!(f)?;
        self.write_daily(f)?;
        writeln!(f)?;
        self.write_top(f)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
