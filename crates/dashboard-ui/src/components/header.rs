use crate::themes::Theme;
use dashboard_core::models::DateRange;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the dashboard title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Dashboard header rendering four lines:
///
/// 1. Title with accent decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. `[ file | selected/total categories | date range ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// Workbook file name shown to the user.
    pub file_name: &'a str,
    pub selected_categories: usize,
    pub total_categories: usize,
    /// Active date range, `None` when the table is empty.
    pub range: Option<DateRange>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        file_name: &'a str,
        selected_categories: usize,
        total_categories: usize,
        range: Option<DateRange>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            file_name,
            selected_categories,
            total_categories,
            range,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let range = self
            .range
            .map(|r| r.to_string())
            .unwrap_or_else(|| "no dates".to_string());

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" ACADEMY UTILIZATION DASHBOARD ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.file_name.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!(
                        "{}/{} categories",
                        self.selected_categories, self.total_categories
                    ),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(range, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
