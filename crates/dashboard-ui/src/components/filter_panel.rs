//! Sidebar with the category checklist and the date range.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use dashboard_runtime::session::FilterSession;

use crate::themes::Theme;

/// Checklist entry text, e.g. `"[x] Training"`.
pub fn checklist_label(category: &str, selected: bool) -> String {
    format!("[{}] {}", if selected { 'x' } else { ' ' }, category)
}

/// Render the sidebar into `area`.
pub fn render_filter_panel(frame: &mut Frame, area: Rect, session: &FilterSession, theme: &Theme) {
    let [list_area, dates_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(6)]).areas(area);

    let items: Vec<ListItem> = session
        .categories()
        .iter()
        .map(|category| {
            let selected = session.is_selected(category);
            let style = if selected { theme.checked } else { theme.unchecked };
            ListItem::new(Line::from(Span::styled(
                checklist_label(category, selected),
                style,
            )))
        })
        .collect();

    let title = format!(
        " Categories {}/{} ",
        session.selected_count(),
        session.categories().len()
    );
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        )
        .highlight_style(theme.cursor)
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !session.categories().is_empty() {
        state.select(Some(session.cursor()));
    }
    frame.render_stateful_widget(list, list_area, &mut state);

    frame.render_widget(
        Paragraph::new(date_lines(session, theme)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Date Range "),
        ),
        dates_area,
    );
}

fn date_lines<'a>(session: &FilterSession, theme: &'a Theme) -> Vec<Line<'a>> {
    let Some(range) = session.range() else {
        return vec![Line::from(Span::styled("No dates available", theme.dim))];
    };
    let range_style = if range.is_empty() { theme.warning } else { theme.value };
    vec![
        Line::from(vec![
            Span::styled("Start  ", theme.label),
            Span::styled(range.start.format("%Y-%m-%d").to_string(), range_style),
        ]),
        Line::from(vec![
            Span::styled("End    ", theme.label),
            Span::styled(range.end.format("%Y-%m-%d").to_string(), range_style),
        ]),
        Line::from(Span::styled(
            format!("{} day(s)", range.days()),
            theme.dim,
        )),
        Line::from(Span::styled("[ ] start  { } end", theme.dim)),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
