//! Main application state and TUI event loop for the Academy Dashboard.
//!
//! [`App`] owns the loader, the filter session and the last computed
//! snapshot. Key handling is a plain state transition in
//! [`App::handle_key`]; [`App::run`] only wires it to the terminal.

use std::io::{self, Write};
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use dashboard_core::formatting::{count_label, format_hours};
use dashboard_core::models::{ActivityQuery, ActivityRecord};
use dashboard_data::analysis::{build_snapshot, DashboardSnapshot, SnapshotOptions};
use dashboard_data::filter::filter_records;
use dashboard_runtime::data_manager::{ActivityLoader, LoadFailure};
use dashboard_runtime::session::FilterSession;

use crate::charts_view;
use crate::components::filter_panel::render_filter_panel;
use crate::components::header::Header;
use crate::components::progress_bar::UtilizationBar;
use crate::error_view;
use crate::table_view;
use crate::themes::Theme;

/// Rows moved by PgUp / PgDn in the activity log.
const PAGE: usize = 10;
/// Days moved by the coarse date keys.
const WEEK: i64 = 7;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which main panel is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    ActivityLog,
    Daily,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::ActivityLog, Tab::Daily];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::ActivityLog => "Activity Log",
            Tab::Daily => "Daily",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::ActivityLog => 1,
            Tab::Daily => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── InitialFilters ────────────────────────────────────────────────────────────

/// Filter values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct InitialFilters {
    /// Categories to select; empty selects all.
    pub categories: Vec<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

// ── TerminalGuard ─────────────────────────────────────────────────────────────

/// Leaves raw mode and the alternate screen when dropped.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("could not leave raw mode: {}", e);
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            tracing::warn!("could not restore the main screen: {}", e);
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    pub tab: Tab,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    loader: ActivityLoader,
    options: SnapshotOptions,
    initial: InitialFilters,
    session: Option<FilterSession>,
    snapshot: Option<DashboardSnapshot>,
    /// Set when no table could be loaded at all.
    failure: Option<LoadFailure>,
    /// One-line message for the footer, e.g. the outcome of a reload.
    status: Option<String>,
    /// Highlighted row in the activity log.
    log_selected: usize,
}

impl App {
    /// Construct the application. Nothing is read until [`App::load`].
    pub fn new(
        loader: ActivityLoader,
        theme_name: &str,
        options: SnapshotOptions,
        initial: InitialFilters,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab: Tab::Overview,
            should_quit: false,
            loader,
            options,
            initial,
            session: None,
            snapshot: None,
            failure: None,
            status: None,
            log_selected: 0,
        }
    }

    // ── State accessors ───────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn session(&self) -> Option<&FilterSession> {
        self.session.as_ref()
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.failure.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn log_selected(&self) -> usize {
        self.log_selected
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    /// Read the workbook and build the first snapshot.
    ///
    /// On failure the error screen is shown instead of the dashboard.
    pub fn load(&mut self) {
        match self.loader.load() {
            Ok(table) => {
                let session = FilterSession::with_initial(
                    table,
                    &self.initial.categories,
                    self.initial.start,
                    self.initial.end,
                );
                self.snapshot = Some(build_snapshot(table, &session.query(), self.options));
                self.session = Some(session);
                self.failure = None;
            }
            Err(e) => {
                self.failure = Some(LoadFailure::from(&e));
                self.snapshot = None;
                self.session = None;
            }
        }
    }

    /// Re-read the workbook, keeping the current table if that fails.
    pub fn reload(&mut self) {
        match self.loader.reload() {
            Ok(table) => {
                let query = match self.session.as_mut() {
                    Some(session) => session.rebase(table),
                    None => {
                        let session = FilterSession::with_initial(
                            table,
                            &self.initial.categories,
                            self.initial.start,
                            self.initial.end,
                        );
                        let query = session.query();
                        self.session = Some(session);
                        query
                    }
                };
                tracing::info!(records = table.len(), "Reloaded activity log");
                self.status = Some(format!(
                    "Reloaded {}",
                    count_label(table.len(), "activity", "activities")
                ));
                self.failure = None;
                self.apply(query);
            }
            Err(e) => {
                tracing::warn!("Reload failed: {}", e);
                if self.session.is_some() {
                    self.status = Some(format!("Reload failed: {}", e));
                } else {
                    self.failure = Some(LoadFailure::from(&e));
                }
            }
        }
    }

    /// Recompute the snapshot for `query`.
    fn apply(&mut self, query: ActivityQuery) {
        let Some(table) = self.loader.table() else {
            return;
        };
        let snapshot = build_snapshot(table, &query, self.options);
        self.log_selected = self
            .log_selected
            .min(snapshot.matched_records.saturating_sub(1));
        self.snapshot = Some(snapshot);
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') => {
                self.reload();
                return;
            }
            _ => {}
        }

        if self.failure.is_some() {
            return;
        }

        match key.code {
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.previous(),
            KeyCode::PageDown => self.scroll_log(PAGE as isize),
            KeyCode::PageUp => self.scroll_log(-(PAGE as isize)),
            KeyCode::Enter if self.tab == Tab::ActivityLog => self.focus_selected_day(),
            _ => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                let query = match key.code {
                    KeyCode::Up => session.cursor_up(),
                    KeyCode::Down => session.cursor_down(),
                    KeyCode::Char(' ') => session.toggle_current(),
                    KeyCode::Char('a') => session.select_all(),
                    KeyCode::Char('n') => session.clear_all(),
                    KeyCode::Char('[') => session.shift_start(-1),
                    KeyCode::Char(']') => session.shift_start(1),
                    KeyCode::Char('{') => session.shift_end(-1),
                    KeyCode::Char('}') => session.shift_end(1),
                    KeyCode::Char(',') => session.shift_start(-WEEK),
                    KeyCode::Char('.') => session.shift_start(WEEK),
                    KeyCode::Char('<') => session.shift_end(-WEEK),
                    KeyCode::Char('>') => session.shift_end(WEEK),
                    KeyCode::Char('x') => {
                        self.log_selected = 0;
                        session.reset()
                    }
                    _ => return,
                };
                self.status = None;
                self.apply(query);
            }
        }
    }

    fn scroll_log(&mut self, delta: isize) {
        let matched = self.snapshot.as_ref().map_or(0, |s| s.matched_records);
        let last = matched.saturating_sub(1);
        self.log_selected = self.log_selected.saturating_add_signed(delta).min(last);
    }

    /// Narrow the date range to the day of the highlighted log row.
    fn focus_selected_day(&mut self) {
        let (Some(table), Some(snapshot)) = (self.loader.table(), self.snapshot.as_ref()) else {
            return;
        };
        let Some(day) = filter_records(table, &snapshot.query)
            .get(self.log_selected)
            .map(|r| r.date)
        else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let query = session.pick_dates(&[day]);
        self.log_selected = 0;
        self.status = None;
        self.apply(query);
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread.
    pub async fn run(mut self) -> io::Result<()> {
        if self.snapshot.is_none() && self.failure.is_none() {
            self.load();
        }

        enable_raw_mode()?;
        // Restores the terminal on every exit path, including cancellation
        // of this future by the caller.
        let _guard = TerminalGuard::new(io::stdout());
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }

            // Give the runtime a chance to deliver Ctrl+C between polls.
            tokio::task::yield_now().await;
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if let Some(failure) = &self.failure {
            error_view::render_error(frame, area, failure, &self.theme);
            return;
        }
        let (Some(session), Some(snapshot)) = (&self.session, &self.snapshot) else {
            return;
        };

        let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(area);

        let file_name = self
            .loader
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let header = Header::new(
            &file_name,
            session.selected_count(),
            session.categories().len(),
            session.range(),
            &self.theme,
        );
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border),
            )
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active);
        frame.render_widget(tabs, tabs_area);

        let [sidebar_area, main_area] =
            Layout::horizontal([Constraint::Length(32), Constraint::Min(20)]).areas(body_area);
        render_filter_panel(frame, sidebar_area, session, &self.theme);

        match self.tab {
            Tab::Overview => self.render_overview(frame, main_area, snapshot),
            Tab::ActivityLog => self.render_log(frame, main_area, snapshot),
            Tab::Daily => {
                let [bars, line] =
                    Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .areas(main_area);
                charts_view::render_daily_bars(frame, bars, &snapshot.daily_totals, &self.theme);
                charts_view::render_daily_line(frame, line, &snapshot.daily_totals, &self.theme);
            }
        }

        frame.render_widget(Paragraph::new(self.footer_line(snapshot)), footer_area);
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let top_rows = snapshot.top_activities.len().max(1) as u16;
        let [chart_area, util_area, top_area] = Layout::vertical([
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(top_rows + 3),
        ])
        .areas(area);

        charts_view::render_category_chart(
            frame,
            chart_area,
            &snapshot.category_totals,
            &self.theme,
        );

        let bar_width = util_area.width.saturating_sub(30).clamp(10, 50);
        let bar = UtilizationBar::new(snapshot.utilization, &self.theme).with_width(bar_width);
        let mut lines = vec![bar.to_line()];
        lines.extend(bar.legend());
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(" Weekly Utilization "),
            ),
            util_area,
        );

        table_view::render_top_activities(frame, top_area, &snapshot.top_activities, &self.theme);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let Some(table) = self.loader.table() else {
            return;
        };
        let records: Vec<&ActivityRecord> = filter_records(table, &snapshot.query);
        table_view::render_activity_log(
            frame,
            area,
            table.extra_columns(),
            &records,
            self.log_selected,
            &self.theme,
        );
    }

    fn footer_line(&self, snapshot: &DashboardSnapshot) -> Line<'_> {
        if let Some(status) = &self.status {
            return Line::from(Span::styled(status.clone(), self.theme.info));
        }
        Line::from(vec![
            Span::styled(
                format!(
                    "{} of {} · {} ",
                    count_label(snapshot.matched_records, "activity", "activities"),
                    snapshot.total_records,
                    format_hours(snapshot.total_hours),
                ),
                self.theme.value,
            ),
            Span::styled(
                "q quit  Tab view  ↑↓ move  Space toggle  a/n all/none  [ ] , . start  { } < > end  PgUp/PgDn scroll  Enter day  r reload  x reset",
                self.theme.dim,
            ),
        ])
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
