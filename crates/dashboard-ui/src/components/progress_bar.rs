use crate::themes::Theme;
use dashboard_core::formatting::format_hours;
use dashboard_data::aggregator::WeeklyUtilization;
use ratatui::text::{Line, Span};

/// Visual settings for a horizontal bar.
pub struct ProgressBarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── UtilizationBar ───────────────────────────────────────────────────────────

/// Two-slice bar: utilized hours filled, remaining capacity shaded.
///
/// Followed by a label with the utilized percentage and
/// `utilized / capacity` in hours.
pub struct UtilizationBar<'a> {
    pub utilization: WeeklyUtilization,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> UtilizationBar<'a> {
    pub fn new(utilization: WeeklyUtilization, theme: &'a Theme) -> Self {
        Self {
            utilization,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Columns given to the utilized slice.
    fn filled_width(&self) -> u16 {
        let share = if self.utilization.capacity > 0.0 {
            (self.utilization.utilized / self.utilization.capacity).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (share * self.config.width as f64).round() as u16
    }

    /// The bar and its label as one [`Line`] of three spans.
    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_width();
        let empty = self.config.width.saturating_sub(filled);
        let pct = self.utilization.percentage();

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        let label = format!(
            " {:.1}% ({} / {})",
            pct,
            format_hours(self.utilization.utilized),
            format_hours(self.utilization.capacity),
        );

        Line::from(vec![
            Span::styled(filled_str, self.theme.utilization_style(pct)),
            Span::styled(empty_str, self.theme.progress_empty),
            Span::styled(label, self.theme.progress_label),
        ])
    }

    /// One legend line per slice: `█ Utilized Hours  8.0h`.
    pub fn legend(&self) -> Vec<Line<'a>> {
        let pct = self.utilization.percentage();
        let [(used_label, used), (rest_label, rest)] = self.utilization.slices();
        vec![
            Line::from(vec![
                Span::styled(
                    format!("{} ", self.config.filled_char),
                    self.theme.utilization_style(pct),
                ),
                Span::styled(format!("{:<20}", used_label), self.theme.label),
                Span::styled(format_hours(used), self.theme.value),
            ]),
            Line::from(vec![
                Span::styled(
                    format!("{} ", self.config.empty_char),
                    self.theme.progress_empty,
                ),
                Span::styled(format!("{:<20}", rest_label), self.theme.label),
                Span::styled(format_hours(rest), self.theme.value),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
