//! Full-screen error display for load and schema failures.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use dashboard_core::error::ErrorKind;
use dashboard_runtime::data_manager::LoadFailure;

use crate::themes::Theme;

/// Build the lines of the error screen (extracted for testability).
pub fn error_lines<'a>(failure: &LoadFailure, theme: &'a Theme) -> Vec<Line<'a>> {
    let hint = match failure.kind {
        ErrorKind::Schema => "Check the sheet's header row, then press 'r' to reload.",
        _ => "Check the file path and sheet index, then press 'r' to reload.",
    };
    vec![
        Line::from(""),
        Line::from(Span::styled(failure.title, theme.error)),
        Line::from(""),
        Line::from(Span::styled(failure.message.clone(), theme.text)),
        Line::from(""),
        Line::from(Span::styled(hint, theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ]
}

/// Render the error screen. Nothing else is drawn alongside it.
pub fn render_error(frame: &mut Frame, area: Rect, failure: &LoadFailure, theme: &Theme) {
    let paragraph = Paragraph::new(Text::from(error_lines(failure, theme)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.error)
                .title(" Academy Dashboard "),
        );
    frame.render_widget(paragraph, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
