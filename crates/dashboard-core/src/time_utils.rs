use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::trace;

// ── Spreadsheet serial dates ──────────────────────────────────────────────────

/// Day zero of the 1900 date system as spreadsheet applications count it.
///
/// Using 1899-12-30 rather than 1900-01-01 absorbs the phantom 1900-02-29,
/// so every serial from 61 (1900-03-01) onwards maps to the right day.
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

/// Convert a spreadsheet serial number (days since the epoch, fractional part
/// is the time of day) into a naive date-time.
///
/// Returns `None` for negative, non-finite or absurdly large values.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465.0 {
        return None;
    }
    // Round to the millisecond so 0.5 / 86400 float noise never shows up as
    // 11:59:59.999.
    let millis = (serial * 86_400_000.0).round() as i64;
    serial_epoch().checked_add_signed(Duration::milliseconds(millis))
}

/// Inverse of [`serial_to_datetime`].
pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    let delta = dt - serial_epoch();
    delta.num_milliseconds() as f64 / 86_400_000.0
}

// ── Text timestamps ───────────────────────────────────────────────────────────

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%b-%Y", "%d%b%Y"];

/// Parse a timestamp typed into a text cell.
///
/// RFC 3339 strings keep their wall-clock time (the offset is dropped, the
/// way the sheet's author wrote it). Month-first is tried before day-first
/// for ambiguous slash dates. Date-only strings land on midnight.
///
/// Returns `None` for blanks and unrecognised text; callers treat that as a
/// missing value rather than an error.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    trace!("unparsable timestamp {:?}", s);
    None
}

// ── Command-line dates ────────────────────────────────────────────────────────

/// `clap` value parser for `YYYY-MM-DD` arguments.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", s, e))
}

/// Move `date` by `days`, saturating at the calendar limits.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
