//! Workbook loading for the Academy Dashboard.
//!
//! Reads one sheet of the utilization workbook with [`calamine`] and turns
//! it into an [`ActivityTable`]: trimmed column names, parsed timestamps, a
//! derived `Date` column and only the rows that carry every required field.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{
    ActivityRecord, ActivityTable, CellValue, COL_CATEGORY, COL_DATE, COL_HOURS, COL_OUTCOME,
    COL_TIMESTAMP,
};
use dashboard_core::time_utils::{parse_timestamp, serial_to_datetime};
use tracing::{debug, info, trace};

use crate::validator;

/// Sheet holding the activity log when no index is configured.
pub const DEFAULT_SHEET_INDEX: usize = 1;

// ── RawSheet ──────────────────────────────────────────────────────────────────

/// A sheet as read from disk: trimmed header names and untyped cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    /// Sheet name from the workbook.
    pub name: String,
    /// Header row, whitespace-trimmed, blanks and duplicates disambiguated.
    pub columns: Vec<String>,
    /// Data rows, each padded to `columns.len()`.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Build a sheet from a header row and data rows, trimming the header
    /// names exactly once.
    pub fn new(name: impl Into<String>, header: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        let columns = normalize_headers(&header);
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read, validate and type the activity log at `path`.
///
/// This is the whole loader: [`read_sheet`] followed by [`build_table`].
pub fn load_activity_table(path: &Path, sheet_index: usize) -> Result<ActivityTable> {
    let sheet = read_sheet(path, sheet_index)?;
    let table = build_table(sheet)?;
    info!(
        "Loaded {} activities from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Read the sheet at `sheet_index` (zero-based) from the workbook at `path`.
///
/// The first row of the sheet is the header row.
pub fn read_sheet(path: &Path, sheet_index: usize) -> Result<RawSheet> {
    if !path.is_file() {
        return Err(DashboardError::FileNotFound(path.to_path_buf()));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| workbook_error(path, e.to_string()))?;

    let names = workbook.sheet_names();
    let name = names
        .get(sheet_index)
        .cloned()
        .ok_or_else(|| DashboardError::SheetNotFound {
            path: path.to_path_buf(),
            index: sheet_index,
            available: names.len(),
        })?;

    debug!("Reading sheet '{}' (index {}) of {}", name, sheet_index, path.display());

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| workbook_error(path, e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<CellValue> = rows
        .next()
        .ok_or_else(|| DashboardError::EmptySheet(name.clone()))?
        .iter()
        .map(to_cell)
        .collect();
    let data: Vec<Vec<CellValue>> = rows.map(|row| row.iter().map(to_cell).collect()).collect();

    Ok(RawSheet::new(name, header, data))
}

/// Validate the columns of `sheet` and convert its rows into records.
///
/// Rows whose timestamp cannot be parsed, whose category is blank, or whose
/// hours are blank, non-numeric, negative or non-finite are dropped.
pub fn build_table(sheet: RawSheet) -> Result<ActivityTable> {
    let columns = table_columns(&sheet.columns);
    validator::validate_columns(&columns)?;

    let (Some(ts_idx), Some(cat_idx), Some(hours_idx), Some(outcome_idx)) = (
        sheet.position(COL_TIMESTAMP),
        sheet.position(COL_CATEGORY),
        sheet.position(COL_HOURS),
        sheet.position(COL_OUTCOME),
    ) else {
        return Err(DashboardError::MissingColumns(validator::missing_columns(
            &columns,
        )));
    };

    let extra_idx: Vec<usize> = sheet
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !is_interpreted(c))
        .map(|(i, _)| i)
        .collect();
    let extra_columns: Vec<String> = extra_idx.iter().map(|&i| sheet.columns[i].clone()).collect();

    let total_rows = sheet.rows.len();
    let mut records = Vec::with_capacity(total_rows);

    for (row_no, row) in sheet.rows.into_iter().enumerate() {
        let Some(timestamp) = cell_timestamp(cell(&row, ts_idx)) else {
            trace!("row {}: no usable timestamp", row_no + 2);
            continue;
        };
        let Some(category) = cell(&row, cat_idx).as_label() else {
            trace!("row {}: no activity category", row_no + 2);
            continue;
        };
        let Some(hours) = cell(&row, hours_idx)
            .as_f64()
            .filter(|h| h.is_finite() && *h >= 0.0)
        else {
            trace!("row {}: no usable working hours", row_no + 2);
            continue;
        };
        let outcome = cell(&row, outcome_idx).as_label();
        let extras = extra_idx.iter().map(|&i| cell(&row, i).clone()).collect();

        records.push(ActivityRecord::new(timestamp, category, hours, outcome).with_extras(extras));
    }

    debug!(
        "Sheet '{}': kept {} of {} rows ({} dropped)",
        sheet.name,
        records.len(),
        total_rows,
        total_rows - records.len()
    );

    Ok(ActivityTable::new(columns, extra_columns, records))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

static EMPTY: CellValue = CellValue::Empty;

fn cell(row: &[CellValue], idx: usize) -> &CellValue {
    row.get(idx).unwrap_or(&EMPTY)
}

fn workbook_error(path: &Path, message: String) -> DashboardError {
    DashboardError::Workbook {
        path: PathBuf::from(path),
        message,
    }
}

/// Convert a calamine cell into the dashboard's pass-through value.
fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        // `as_datetime` honours the workbook's 1900/1904 date system.
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_timestamp(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            trace!("cell error {:?} treated as blank", e);
            CellValue::Empty
        }
    }
}

/// Timestamp of a cell: native date-times, serial numbers or text.
fn cell_timestamp(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Number(n) => serial_to_datetime(*n),
        CellValue::Text(s) => parse_timestamp(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Trim header names; blank headers become `Unnamed: N` and repeated
/// names get a `.1`, `.2`, ... suffix so every column stays addressable.
fn normalize_headers(header: &[CellValue]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let trimmed = cell.to_string().trim().to_string();
            let base = if trimmed.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                trimmed
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// Columns of the loaded table: the sheet's own columns (minus any `Date`
/// column, which is always derived) plus `Date` when a timestamp exists.
fn table_columns(sheet_columns: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = sheet_columns
        .iter()
        .filter(|c| c.as_str() != COL_DATE)
        .cloned()
        .collect();
    if sheet_columns.iter().any(|c| c == COL_TIMESTAMP) {
        columns.push(COL_DATE.to_string());
    }
    columns
}

fn is_interpreted(column: &str) -> bool {
    [COL_TIMESTAMP, COL_DATE, COL_CATEGORY, COL_HOURS, COL_OUTCOME].contains(&column)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::error::ErrorKind;
    use dashboard_core::time_utils::datetime_to_serial;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use rust_xlsxwriter::{Format, Workbook};
    use tempfile::TempDir;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn header() -> Vec<CellValue> {
        vec![
            text(" TimeStamp "),
            text("Activity Category  "),
            text("Working Hrs Spent"),
            text("\tSpecific Outcome/s"),
            text("Trainer"),
        ]
    }

    /// Write a two-sheet workbook whose second sheet is the activity log.
    fn write_workbook(dir: &TempDir, name: &str, include_outcome: bool) -> PathBuf {
        let path = dir.path().join(name);
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

        let summary = workbook.add_worksheet();
        summary.set_name("Summary").unwrap();
        summary.write_string(0, 0, "Utilization log").unwrap();

        let log = workbook.add_worksheet();
        log.set_name("Log").unwrap();

        let mut headers = vec![" TimeStamp", "Activity Category ", " Working Hrs Spent "];
        if include_outcome {
            headers.push("Specific Outcome/s");
        }
        headers.push("Trainer");
        for (col, h) in headers.iter().enumerate() {
            log.write_string(0, col as u16, *h).unwrap();
        }
        let trainer_col = headers.len() as u16 - 1;

        // Row 1: native date-time cell.
        log.write_number_with_format(1, 0, datetime_to_serial(dt("2025-08-04 09:30:00")), &date_format)
            .unwrap();
        log.write_string(1, 1, "Training").unwrap();
        log.write_number(1, 2, 2.0).unwrap();
        // Row 2: timestamp typed as text.
        log.write_string(2, 0, "2025-08-05 14:00:00").unwrap();
        log.write_string(2, 1, "Coaching").unwrap();
        log.write_number(2, 2, 5.0).unwrap();
        // Row 3: unparsable timestamp, dropped.
        log.write_string(3, 0, "n/a").unwrap();
        log.write_string(3, 1, "Training").unwrap();
        log.write_number(3, 2, 9.0).unwrap();
        // Row 4: blank category, dropped.
        log.write_string(4, 0, "2025-08-06 10:00:00").unwrap();
        log.write_number(4, 2, 1.0).unwrap();
        // Row 5: hours not numeric, dropped.
        log.write_string(5, 0, "2025-08-06 11:00:00").unwrap();
        log.write_string(5, 1, "Training").unwrap();
        log.write_string(5, 2, "lots").unwrap();
        // Row 6: kept, hours as text.
        log.write_string(6, 0, "2025-08-07").unwrap();
        log.write_string(6, 1, "Training").unwrap();
        log.write_string(6, 2, "1.0").unwrap();

        if include_outcome {
            log.write_string(1, 3, "Module 1 delivered").unwrap();
            log.write_string(2, 3, "Two mentees reviewed").unwrap();
        }
        log.write_string(1, trainer_col, "Ana").unwrap();
        log.write_string(2, trainer_col, "Ben").unwrap();

        workbook.save(&path).unwrap();
        path
    }

    // ── load_activity_table ───────────────────────────────────────────────────

    #[test]
    fn test_load_reads_second_sheet_and_trims_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, "log.xlsx", true);

        let table = load_activity_table(&path, DEFAULT_SHEET_INDEX).unwrap();

        assert_eq!(
            table.columns(),
            &[
                "TimeStamp",
                "Activity Category",
                "Working Hrs Spent",
                "Specific Outcome/s",
                "Trainer",
                "Date"
            ]
        );
        assert_eq!(table.extra_columns(), &["Trainer"]);
    }

    #[test]
    fn test_load_drops_incomplete_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, "log.xlsx", true);

        let table = load_activity_table(&path, DEFAULT_SHEET_INDEX).unwrap();
        let records = table.records();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, dt("2025-08-04 09:30:00"));
        assert_eq!(records[0].activity_category, "Training");
        assert_eq!(records[0].outcome(), "Module 1 delivered");
        assert_eq!(records[0].extras, vec![text("Ana")]);

        assert_eq!(records[1].timestamp, dt("2025-08-05 14:00:00"));
        assert_eq!(records[1].working_hours_spent, 5.0);

        assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2025, 8, 7).unwrap());
        assert_eq!(records[2].working_hours_spent, 1.0);
        assert!(records[2].specific_outcome.is_none());
        assert_eq!(records[2].extras, vec![CellValue::Empty]);
    }

    #[test]
    fn test_every_record_date_matches_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, "log.xlsx", true);
        let table = load_activity_table(&path, DEFAULT_SHEET_INDEX).unwrap();
        assert!(table.records().iter().all(|r| r.date == r.timestamp.date()));
    }

    #[test]
    fn test_load_missing_outcome_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, "log.xlsx", false);

        let err = load_activity_table(&path, DEFAULT_SHEET_INDEX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        match err {
            DashboardError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["Specific Outcome/s"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let err = load_activity_table(&dir.path().join("absent.xlsm"), 1).unwrap_err();
        assert!(matches!(err, DashboardError::FileNotFound(_)));
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_load_sheet_index_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, "log.xlsx", true);
        let err = load_activity_table(&path, 5).unwrap_err();
        match err {
            DashboardError::SheetNotFound { index, available, .. } => {
                assert_eq!(index, 5);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_not_a_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.xlsx");
        std::fs::write(&path, "this is not a zip archive").unwrap();
        let err = load_activity_table(&path, 1).unwrap_err();
        assert!(matches!(err, DashboardError::Workbook { .. }));
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_read_sheet_first_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, "log.xlsx", true);
        let sheet = read_sheet(&path, 0).unwrap();
        assert_eq!(sheet.name, "Summary");
        assert_eq!(sheet.columns, vec!["Utilization log"]);
        assert!(sheet.rows.is_empty());
    }

    // ── build_table (in-memory sheets) ────────────────────────────────────────

    #[test]
    fn test_build_table_serial_number_timestamp() {
        let serial = datetime_to_serial(dt("2025-08-12 08:00:00"));
        let sheet = RawSheet::new(
            "Log",
            header(),
            vec![vec![
                CellValue::Number(serial),
                text("Admin"),
                CellValue::Number(0.5),
                text("Inbox zero"),
                CellValue::Empty,
            ]],
        );
        let table = build_table(sheet).unwrap();
        assert_eq!(table.records()[0].timestamp, dt("2025-08-12 08:00:00"));
    }

    #[test]
    fn test_to_cell_honours_1904_date_system() {
        let expected = NaiveDate::from_ymd_opt(2025, 8, 12)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        // The same instant stored under each date system.
        let mac = Data::DateTime(ExcelDateTime::new(44419.375, ExcelDateTimeType::DateTime, true));
        let windows =
            Data::DateTime(ExcelDateTime::new(45881.375, ExcelDateTimeType::DateTime, false));

        assert_eq!(to_cell(&mac), CellValue::DateTime(expected));
        assert_eq!(to_cell(&windows), CellValue::DateTime(expected));
        assert_eq!(cell_timestamp(&to_cell(&mac)).map(|t| t.date()), Some(expected.date()));
    }

    #[test]
    fn test_to_cell_duration_stays_numeric() {
        let duration = Data::DateTime(ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(to_cell(&duration), CellValue::Number(1.5));
    }

    #[test]
    fn test_build_table_rejects_negative_hours() {
        let sheet = RawSheet::new(
            "Log",
            header(),
            vec![vec![
                text("2025-08-12 08:00:00"),
                text("Admin"),
                CellValue::Number(-2.0),
                CellValue::Empty,
                CellValue::Empty,
            ]],
        );
        assert!(build_table(sheet).unwrap().is_empty());
    }

    #[test]
    fn test_build_table_pads_short_rows() {
        let sheet = RawSheet::new(
            "Log",
            header(),
            vec![vec![text("2025-08-12 08:00:00"), text("Admin"), CellValue::Number(1.0)]],
        );
        let table = build_table(sheet).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.records()[0].specific_outcome.is_none());
    }

    #[test]
    fn test_build_table_missing_timestamp_reports_date() {
        let sheet = RawSheet::new(
            "Log",
            vec![
                text("Activity Category"),
                text("Working Hrs Spent"),
                text("Specific Outcome/s"),
            ],
            vec![],
        );
        match build_table(sheet).unwrap_err() {
            DashboardError::MissingColumns(missing) => assert_eq!(missing, vec!["Date"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_table_replaces_sheet_date_column() {
        let mut h = header();
        h.push(text("Date"));
        let sheet = RawSheet::new(
            "Log",
            h,
            vec![vec![
                text("2025-08-12 08:00:00"),
                text("Admin"),
                CellValue::Number(1.0),
                CellValue::Empty,
                CellValue::Empty,
                text("1999-01-01"),
            ]],
        );
        let table = build_table(sheet).unwrap();
        assert_eq!(table.columns().iter().filter(|c| *c == "Date").count(), 1);
        assert_eq!(table.extra_columns(), &["Trainer"]);
        assert_eq!(
            table.records()[0].date,
            NaiveDate::from_ymd_opt(2025, 8, 12).unwrap()
        );
    }

    // ── normalize_headers ─────────────────────────────────────────────────────

    #[test]
    fn test_normalize_headers_blank_and_duplicates() {
        let headers = normalize_headers(&[
            text(" Notes "),
            CellValue::Empty,
            text("Notes"),
            CellValue::Number(2025.0),
        ]);
        assert_eq!(headers, vec!["Notes", "Unnamed: 1", "Notes.1", "2025"]);
    }
}
