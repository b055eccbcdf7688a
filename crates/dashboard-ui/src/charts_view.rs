//! Hour charts: per-category bars and the daily bar and line charts.
//!
//! [`BarChart`] works in integer units, so hours are scaled by
//! [`HOURS_SCALE`] and each bar carries its own formatted text value.

use ratatui::{
    layout::{Direction, Rect},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use dashboard_core::formatting::format_number;
use dashboard_data::aggregator::{CategoryTotal, DailyTotal};

use crate::table_view::{render_no_data, truncate};
use crate::themes::Theme;

/// Bar units per hour.
pub const HOURS_SCALE: f64 = 10.0;

/// Longest category label on the horizontal chart, in display columns.
const CATEGORY_LABEL_WIDTH: usize = 18;

/// Hours as integer bar units, never negative.
pub fn scaled(hours: f64) -> u64 {
    (hours * HOURS_SCALE).round().max(0.0) as u64
}

/// Column width for `count` vertical bars across `width` columns, between
/// 3 and 9 columns each with a one-column gap.
pub fn bar_width_for(width: u16, count: usize) -> u16 {
    if count == 0 {
        return 3;
    }
    let per_bar = (width as usize / count).saturating_sub(1);
    per_bar.clamp(3, 9) as u16
}

fn chart_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(title)
}

/// Horizontal bar per category, in category-name order.
pub fn render_category_chart(
    frame: &mut Frame,
    area: Rect,
    totals: &[CategoryTotal],
    theme: &Theme,
) {
    const TITLE: &str = " Hours by Category ";
    if totals.is_empty() {
        render_no_data(frame, area, TITLE, theme);
        return;
    }

    let bars: Vec<Bar> = totals
        .iter()
        .map(|t| {
            Bar::default()
                .value(scaled(t.hours))
                .label(Line::from(truncate(&t.category, CATEGORY_LABEL_WIDTH)))
                .text_value(format_number(t.hours, 1))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(TITLE, theme))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1)
        .bar_style(theme.chart_bar)
        .value_style(theme.chart_value)
        .label_style(theme.chart_label);

    frame.render_widget(chart, area);
}

/// Vertical bar per day, ascending by date.
pub fn render_daily_bars(frame: &mut Frame, area: Rect, daily: &[DailyTotal], theme: &Theme) {
    const TITLE: &str = " Daily Hours ";
    if daily.is_empty() {
        render_no_data(frame, area, TITLE, theme);
        return;
    }

    let bars: Vec<Bar> = daily
        .iter()
        .map(|d| {
            Bar::default()
                .value(scaled(d.hours))
                .label(Line::from(d.date.format("%m-%d").to_string()))
                .text_value(format_number(d.hours, 1))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let chart = BarChart::default()
        .block(chart_block(TITLE, theme))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width_for(inner_width, daily.len()))
        .bar_gap(1)
        .bar_style(theme.chart_bar)
        .value_style(theme.chart_value)
        .label_style(theme.chart_label);

    frame.render_widget(chart, area);
}

/// Line chart of daily totals, one point per day with data.
pub fn render_daily_line(frame: &mut Frame, area: Rect, daily: &[DailyTotal], theme: &Theme) {
    const TITLE: &str = " Daily Trend ";
    if daily.is_empty() {
        render_no_data(frame, area, TITLE, theme);
        return;
    }

    let points: Vec<(f64, f64)> = daily
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.hours))
        .collect();

    let x_max = (daily.len().saturating_sub(1)).max(1) as f64;
    let peak = daily.iter().map(|d| d.hours).fold(0.0_f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let first = daily[0].date.format("%m-%d").to_string();
    let mid = daily[daily.len() / 2].date.format("%m-%d").to_string();
    let last = daily[daily.len() - 1].date.format("%m-%d").to_string();

    let dataset = Dataset::default()
        .name("Hours")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(TITLE, theme))
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(vec![first, mid, last]),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    format_number(y_max / 2.0, 1),
                    format_number(y_max, 1),
                ]),
        );

    frame.render_widget(chart, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn totals() -> Vec<CategoryTotal> {
        vec![
            CategoryTotal { category: "Coaching".into(), hours: 5.0 },
            CategoryTotal { category: "Training".into(), hours: 3.0 },
        ]
    }

    fn daily() -> Vec<DailyTotal> {
        (1..=5)
            .map(|d| DailyTotal {
                date: NaiveDate::from_ymd_opt(2025, 8, d).unwrap(),
                hours: d as f64 * 1.5,
            })
            .collect()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_scaled() {
        assert_eq!(scaled(8.25), 83);
        assert_eq!(scaled(0.0), 0);
        assert_eq!(scaled(-1.0), 0);
    }

    #[test]
    fn test_bar_width_for() {
        assert_eq!(bar_width_for(100, 5), 9);
        assert_eq!(bar_width_for(40, 5), 7);
        assert_eq!(bar_width_for(20, 30), 3);
        assert_eq!(bar_width_for(20, 0), 3);
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_category_chart_shows_labels() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let theme = Theme::dark();
        let totals = totals();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_category_chart(frame, area, &totals, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Hours by Category"));
        assert!(text.contains("Coaching"));
        assert!(text.contains("Training"));
    }

    #[test]
    fn test_render_daily_charts_do_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let theme = Theme::light();
        let daily = daily();

        terminal
            .draw(|frame| {
                let area = frame.area();
                let top = Rect { height: area.height / 2, ..area };
                let bottom = Rect {
                    y: area.y + area.height / 2,
                    height: area.height - area.height / 2,
                    ..area
                };
                render_daily_bars(frame, top, &daily, &theme);
                render_daily_line(frame, bottom, &daily, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Daily Hours"));
        assert!(text.contains("Daily Trend"));
    }

    #[test]
    fn test_single_day_line_chart_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        let theme = Theme::dark();
        let one = vec![DailyTotal {
            date: NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
            hours: 0.0,
        }];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_daily_line(frame, area, &one, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_empty_inputs_show_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                let third = area.height / 3;
                render_category_chart(frame, Rect { height: third, ..area }, &[], &theme);
                render_daily_bars(
                    frame,
                    Rect { y: third, height: third, ..area },
                    &[],
                    &theme,
                );
                render_daily_line(
                    frame,
                    Rect { y: third * 2, height: third, ..area },
                    &[],
                    &theme,
                );
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No matching activities"));
    }
}
