//! Table views: the top-activities table and the scrollable activity log.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use dashboard_core::formatting::format_number;
use dashboard_core::models::{
    ActivityRecord, COL_CATEGORY, COL_DATE, COL_HOURS, COL_OUTCOME, COL_TIMESTAMP,
};
use dashboard_data::aggregator::TopActivity;

use crate::themes::Theme;

/// Widest outcome cell before truncation, in display columns.
const OUTCOME_WIDTH: usize = 48;
/// Widest pass-through cell before truncation, in display columns.
const EXTRA_WIDTH: usize = 20;

/// Cut `s` to at most `max_width` display columns, ending in `…` when cut.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn bordered<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(title)
}

/// Render the N largest activities into `area`.
pub fn render_top_activities(frame: &mut Frame, area: Rect, top: &[TopActivity], theme: &Theme) {
    let title = format!(" Top {} Activities ", top.len());
    if top.is_empty() {
        render_no_data(frame, area, " Top Activities ", theme);
        return;
    }

    let header = Row::new(
        ["#", "Timestamp", "Category", "Outcome", "Hours"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = top
        .iter()
        .enumerate()
        .map(|(i, activity)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(activity.timestamp.format("%Y-%m-%d %H:%M").to_string()),
                Cell::from(activity.category.clone()),
                Cell::from(truncate(&activity.outcome, OUTCOME_WIDTH)),
                Cell::from(format_number(activity.hours, 1)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(17),
        Constraint::Length(22),
        Constraint::Min(12),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, theme))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Render the filtered records with every column, extras last.
///
/// `selected` is the highlighted row; the table scrolls to keep it visible.
pub fn render_activity_log(
    frame: &mut Frame,
    area: Rect,
    extra_columns: &[String],
    records: &[&ActivityRecord],
    selected: usize,
    theme: &Theme,
) {
    if records.is_empty() {
        render_no_data(frame, area, " Activity Log ", theme);
        return;
    }

    let header = Row::new(
        [COL_TIMESTAMP, COL_DATE, COL_CATEGORY, COL_HOURS, COL_OUTCOME]
            .iter()
            .map(|h| h.to_string())
            .chain(extra_columns.iter().cloned())
            .map(|h| Cell::from(h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut cells = vec![
                Cell::from(record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                Cell::from(record.date.format("%Y-%m-%d").to_string()),
                Cell::from(record.activity_category.clone()),
                Cell::from(format_number(record.working_hours_spent, 2)),
                Cell::from(truncate(record.outcome(), OUTCOME_WIDTH)),
            ];
            cells.extend(
                record
                    .extras
                    .iter()
                    .map(|v| Cell::from(truncate(&v.to_string(), EXTRA_WIDTH))),
            );
            Row::new(cells).style(theme.row_style(i))
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(19),
        Constraint::Length(10),
        Constraint::Length(22),
        Constraint::Length(9),
        Constraint::Min(16),
    ];
    widths.extend(extra_columns.iter().map(|_| Constraint::Length(EXTRA_WIDTH as u16)));

    let selected = selected.min(records.len() - 1);
    let title = format!(" Activity Log ({} of {}) ", selected + 1, records.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, theme))
        .style(theme.text)
        .row_highlight_style(theme.table_selected);

    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Placeholder shown when the filters match nothing.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No matching activities", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Adjust the category or date filters.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'x' to reset filters", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(bordered(title.to_string(), theme)),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
