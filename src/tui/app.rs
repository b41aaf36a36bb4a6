//! Application state and event loop

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::services::{breakdown, Aggregator, InsightsService, MockFeed, RecordFeed, Settings};
use crate::tui::theme::Theme;
use crate::types::{
    AggregationLevel, BreakdownSlice, CampaignRecord, DateRange, PeriodBucket, SummaryMetrics,
};

use super::widgets::{
    breakdown::BreakdownView,
    cards::{grid_height, CardGrid},
    help::HelpPopup,
    insights::{InsightsPopup, InsightsState},
    spinner::{LoadingStage, Spinner},
    tabs::{SourceTab, TabBar},
    timeline::{self, TimelineView},
};

/// Default fetch window in days
const DEFAULT_RANGE_DAYS: i64 = 30;

/// Maximum content width (keeps layout clean on wide terminals)
const MAX_CONTENT_WIDTH: u16 = 150;

/// Application state
pub enum AppState {
    /// Fetching records with spinner animation
    Loading {
        spinner_frame: usize,
        stage: LoadingStage,
    },
    /// Ready with fetched records
    Ready { data: Box<DashboardData> },
    /// Error state
    Error { message: String },
}

/// Records fetched for the active range
pub struct DashboardData {
    pub records: Vec<CampaignRecord>,
    pub range: DateRange,
}

/// Everything the dashboard renders for one tab at one level.
///
/// Rebuilt whenever the tab, level, or data changes, so `contacts_today`
/// is always re-evaluated against the current calendar date.
pub struct ViewData {
    pub metrics: SummaryMetrics,
    pub buckets: Vec<PeriodBucket>,
    pub slices: Vec<BreakdownSlice>,
    pub slices_title: &'static str,
    pub campaigns: Vec<BreakdownSlice>,
    /// Filtered snapshot handed to the insights prompt
    pub records: Vec<CampaignRecord>,
}

impl ViewData {
    pub fn build(
        data: &DashboardData,
        tab: SourceTab,
        level: AggregationLevel,
        today: NaiveDate,
    ) -> Self {
        let records = tab.filter().apply(&data.records);
        let metrics = Aggregator::summarize(&records, today);
        let buckets = Aggregator::bucketize(&records, level);
        // Consolidated view breaks contacts down by channel; channel tabs
        // break down by placement instead
        let (slices, slices_title) = match tab {
            SourceTab::Consolidated => (breakdown::by_source(&records), "Contact Sources"),
            _ => (
                breakdown::by_placement(&records),
                "Contacts by Placement",
            ),
        };
        let campaigns = breakdown::qualified_by_campaign(&records);

        Self {
            metrics,
            buckets,
            slices,
            slices_title,
            campaigns,
            records,
        }
    }
}

type LoadResult = Result<Box<DashboardData>, String>;

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    tab: SourceTab,
    level: AggregationLevel,
    scroll: usize,
    show_help: bool,
    insights: InsightsState,
    view: Option<ViewData>,
    theme: Theme,
    settings: Settings,
    range: DateRange,
    insights_rx: Option<mpsc::Receiver<Result<String, String>>>,
    load_rx: Option<mpsc::Receiver<LoadResult>>,
}

impl App {
    /// Create a new app in loading state
    pub fn new(settings: Settings, theme: Theme) -> Self {
        let range = DateRange::last_days(Local::now().date_naive(), DEFAULT_RANGE_DAYS);
        Self {
            state: AppState::Loading {
                spinner_frame: 0,
                stage: LoadingStage::Fetching,
            },
            should_quit: false,
            tab: SourceTab::default(),
            level: AggregationLevel::for_span_days(range.span_days()),
            scroll: 0,
            show_help: false,
            insights: InsightsState::Hidden,
            view: None,
            theme,
            settings,
            range,
            insights_rx: None,
            load_rx: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Kick off a background fetch for the active range
    fn start_load(&mut self) {
        self.state = AppState::Loading {
            spinner_frame: 0,
            stage: LoadingStage::Fetching,
        };
        self.view = None;

        let range = self.range;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(load_data_sync(range));
        });
        self.load_rx = Some(rx);
    }

    /// Apply data loading result to app state
    fn apply_data_result(&mut self, result: LoadResult) {
        match result {
            Ok(data) => {
                self.state = AppState::Ready { data };
                self.rebuild_view();
            }
            Err(message) => self.state = AppState::Error { message },
        }
    }

    /// Recompute the rendered view for the current tab and level
    fn rebuild_view(&mut self) {
        if let AppState::Ready { data } = &self.state {
            let today = Local::now().date_naive();
            let view = ViewData::build(data, self.tab, self.level, today);
            self.scroll = self.scroll.min(timeline::max_scroll_offset(view.buckets.len()));
            self.view = Some(view);
        }
    }

    /// Kick off background narrative generation for the current view
    fn start_insights(&mut self) {
        let Some(view) = &self.view else {
            return;
        };

        let api_key = self.settings.resolve_api_key().unwrap_or_default();
        let records = view.records.clone();
        let metrics = view.metrics.clone();
        let range = self.range;

        self.insights = InsightsState::Loading { frame: 0 };
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = InsightsService::new(&api_key)
                .and_then(|service| service.generate(&records, &metrics, &range))
                .map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
        self.insights_rx = Some(rx);
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Overlays swallow keys before the dashboard sees them
        if self.insights.shows_overlay() {
            self.handle_insights_event(key.code);
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.rebuild_view();
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                self.rebuild_view();
            }
            KeyCode::Char(c @ '1'..='3') => {
                if let Some(tab) = SourceTab::from_number(c as u8 - b'0') {
                    if tab != self.tab {
                        self.tab = tab;
                        self.rebuild_view();
                    }
                }
            }
            KeyCode::Char('d') => self.set_level(AggregationLevel::Daily),
            KeyCode::Char('w') => self.set_level(AggregationLevel::Weekly),
            KeyCode::Char('m') => self.set_level(AggregationLevel::Monthly),
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self
                    .view
                    .as_ref()
                    .map(|v| timeline::max_scroll_offset(v.buckets.len()))
                    .unwrap_or(0);
                self.scroll = (self.scroll + 1).min(max);
            }
            // Quick range presets, ending today
            KeyCode::Char('7') => self.set_range_days(7),
            KeyCode::Char('0') => self.set_range_days(30),
            KeyCode::Char('9') => self.set_range_days(90),
            KeyCode::Char('g') => self.start_insights(),
            KeyCode::Char('r') => self.start_load(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    /// Switch to a window of the last `days` days and refetch.
    /// The bucketing level follows the new span.
    fn set_range_days(&mut self, days: i64) {
        self.range = DateRange::last_days(Local::now().date_naive(), days);
        self.level = AggregationLevel::for_span_days(self.range.span_days());
        self.scroll = 0;
        self.start_load();
    }

    /// Keys while the insights popup is displayed
    fn handle_insights_event(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
            self.insights = InsightsState::Hidden;
            self.insights_rx = None;
            return;
        }

        if let InsightsState::Ready { scroll, .. } = &mut self.insights {
            match code {
                KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
                _ => {}
            }
        }
    }

    fn set_level(&mut self, level: AggregationLevel) {
        if self.level != level {
            self.level = level;
            self.scroll = 0;
            self.rebuild_view();
        }
    }

    /// Update spinner animations
    pub fn tick(&mut self) {
        if let AppState::Loading {
            spinner_frame,
            stage,
        } = &self.state
        {
            self.state = AppState::Loading {
                spinner_frame: Spinner::next_frame(*spinner_frame),
                stage: *stage,
            };
        }
        if let InsightsState::Loading { frame } = &self.insights {
            self.insights = InsightsState::Loading {
                frame: Spinner::next_frame(*frame),
            };
        }
    }

    /// Drain background channels (non-blocking)
    fn poll_background(&mut self) {
        if matches!(self.state, AppState::Loading { .. }) {
            let result = self.load_rx.as_ref().and_then(|rx| rx.try_recv().ok());
            if let Some(result) = result {
                self.load_rx = None;
                self.apply_data_result(result);
            }
        }

        if matches!(self.insights, InsightsState::Loading { .. }) {
            let result = self.insights_rx.as_ref().and_then(|rx| rx.try_recv().ok());
            if let Some(result) = result {
                self.insights_rx = None;
                self.insights = match result {
                    Ok(text) => InsightsState::Ready { text, scroll: 0 },
                    Err(message) => InsightsState::Failed { message },
                };
            }
        }
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_dashboard(&self, view: &ViewData, area: Rect, buf: &mut Buffer) {
        // Apply max width constraint and center the content
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let cards_height = grid_height(centered_area.width);

        let chunks = Layout::vertical([
            Constraint::Length(1),            // Tab bar
            Constraint::Length(1),            // Separator
            Constraint::Length(cards_height), // Metric cards
            Constraint::Fill(1),              // Timeline + breakdown
            Constraint::Length(1),            // Separator
            Constraint::Length(1),            // Keybindings
        ])
        .split(centered_area);

        TabBar::new(self.tab, self.theme).render(chunks[0], buf);
        self.render_separator(chunks[1], buf);
        CardGrid::new(&view.metrics, self.theme).render(chunks[2], buf);

        // Timeline on the left, breakdown bars on the right
        let columns = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(chunks[3]);
        TimelineView::new(&view.buckets, self.level, self.scroll, self.theme)
            .render(columns[0], buf);
        BreakdownView::new(&view.slices, view.slices_title, &view.campaigns, self.theme)
            .render(columns[1], buf);

        self.render_separator(chunks[4], buf);
        self.render_keybindings(chunks[5], buf);
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(
            area.x,
            area.y,
            &line,
            Style::default().fg(self.theme.muted()),
        );
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let bindings = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().fg(self.theme.accent())),
            Span::styled(": Channel", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("d/w/m", Style::default().fg(self.theme.accent())),
            Span::styled(": Level", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("g", Style::default().fg(self.theme.accent())),
            Span::styled(": AI analysis", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("r", Style::default().fg(self.theme.accent())),
            Span::styled(": Reload", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("?", Style::default().fg(self.theme.accent())),
            Span::styled(": Help", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("q", Style::default().fg(self.theme.accent())),
            Span::styled(": Quit", Style::default().fg(self.theme.muted())),
        ]))
        .alignment(ratatui::layout::Alignment::Center);

        bindings.render(area, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading {
                spinner_frame,
                stage,
            } => {
                Spinner::new(*spinner_frame, *stage).render(area, buf);
            }
            AppState::Ready { .. } => {
                if let Some(view) = &self.view {
                    self.render_dashboard(view, area, buf);
                }

                if self.show_help {
                    let popup_area = HelpPopup::centered_area(area);
                    HelpPopup::new(self.theme).render(popup_area, buf);
                }
            }
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", message);
                let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(Color::Red));
            }
        }

        // Insights popup overlays everything, in any state
        if self.insights.shows_overlay() {
            let popup_area = InsightsPopup::centered_area(area);
            InsightsPopup::new(&self.insights, self.theme).render(popup_area, buf);
        }
    }
}

/// Fetch records synchronously (runs on the background thread)
fn load_data_sync(range: DateRange) -> LoadResult {
    let feed = MockFeed::new();
    let records = feed
        .fetch(&range)
        .map_err(|_| "Failed to load campaign data.".to_string())?;

    if records.is_empty() {
        return Err("No campaign data for the selected period.".to_string());
    }

    Ok(Box::new(DashboardData { records, range }))
}

/// Run the TUI application
pub fn run() -> anyhow::Result<()> {
    let settings = Settings::load();
    // Theme detection reads the terminal background and must happen
    // before entering raw mode
    let theme = Theme::from_preference(settings.theme);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, settings, theme);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, settings: Settings, theme: Theme) -> anyhow::Result<()> {
    let mut app = App::new(settings, theme);
    app.start_load();

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        app.poll_background();

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn make_record(date: &str, source: &str, contacts: u64) -> CampaignRecord {
        CampaignRecord {
            date: date.parse().unwrap(),
            campaign: "Campanha de Verão".into(),
            source: source.into(),
            placement: if source == "Google" {
                None
            } else {
                Some("Feed".into())
            },
            contacts,
            qualified: contacts / 2,
            disqualified: contacts - contacts / 2,
            cost: contacts as f64 * 4.0,
            cpl: 4.0,
        }
    }

    fn make_ready_app() -> App {
        let records = vec![
            make_record("2024-01-01", "Facebook", 10),
            make_record("2024-01-02", "Instagram", 20),
            make_record("2024-01-03", "Google", 30),
        ];
        let range = DateRange::new("2024-01-01".parse().unwrap(), "2024-01-31".parse().unwrap());

        let mut app = App::new(Settings::default(), Theme::Dark);
        app.apply_data_result(Ok(Box::new(DashboardData { records, range })));
        app
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    // ========== ViewData tests ==========

    #[test]
    fn test_view_data_consolidated_breaks_down_by_source() {
        let app = make_ready_app();
        let view = app.view.as_ref().unwrap();

        assert_eq!(view.slices_title, "Contact Sources");
        assert_eq!(view.slices.len(), 3);
        assert_eq!(view.metrics.total_contacts, 60);
    }

    #[test]
    fn test_view_data_channel_tab_filters_and_uses_placements() {
        let mut app = make_ready_app();
        app.handle_event(press(KeyCode::Char('2')));

        let view = app.view.as_ref().unwrap();
        assert_eq!(view.slices_title, "Contacts by Placement");
        assert_eq!(view.metrics.total_contacts, 10);
        assert_eq!(view.records.len(), 1);
    }

    // ========== event handling tests ==========

    #[test]
    fn test_quit_on_q() {
        let mut app = make_ready_app();
        app.handle_event(press(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_tab_cycles_and_rebuilds_view() {
        let mut app = make_ready_app();

        app.handle_event(press(KeyCode::Tab));
        assert_eq!(app.tab, SourceTab::Facebook);
        assert_eq!(app.view.as_ref().unwrap().metrics.total_contacts, 10);

        app.handle_event(press(KeyCode::BackTab));
        assert_eq!(app.tab, SourceTab::Consolidated);
        assert_eq!(app.view.as_ref().unwrap().metrics.total_contacts, 60);
    }

    #[test]
    fn test_level_keys_rebucket() {
        let mut app = make_ready_app();
        // All three records fall in the same Sun-Sat week
        app.handle_event(press(KeyCode::Char('w')));
        assert_eq!(app.level, AggregationLevel::Weekly);
        assert_eq!(app.view.as_ref().unwrap().buckets.len(), 1);

        app.handle_event(press(KeyCode::Char('d')));
        assert_eq!(app.view.as_ref().unwrap().buckets.len(), 3);
    }

    #[test]
    fn test_scroll_clamps_at_zero() {
        let mut app = make_ready_app();
        app.handle_event(press(KeyCode::Up));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_scroll_down_clamped_to_bucket_count() {
        let mut app = make_ready_app();
        for _ in 0..50 {
            app.handle_event(press(KeyCode::Down));
        }
        // 3 buckets all fit on screen, so scroll stays pinned
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_help_toggles() {
        let mut app = make_ready_app();
        app.handle_event(press(KeyCode::Char('?')));
        assert!(app.show_help);
        // While help is open, q closes it instead of quitting
        app.handle_event(press(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_insights_popup_esc_closes() {
        let mut app = make_ready_app();
        app.insights = InsightsState::Failed {
            message: "insights error: API key not configured".into(),
        };

        app.handle_event(press(KeyCode::Esc));
        assert_eq!(app.insights, InsightsState::Hidden);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_insights_ready_scrolls() {
        let mut app = make_ready_app();
        app.insights = InsightsState::Ready {
            text: "## Resumo\nlinha".into(),
            scroll: 0,
        };

        app.handle_event(press(KeyCode::Down));
        app.handle_event(press(KeyCode::Down));
        app.handle_event(press(KeyCode::Up));

        match &app.insights {
            InsightsState::Ready { scroll, .. } => assert_eq!(*scroll, 1),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_range_preset_switches_window_and_reloads() {
        let mut app = make_ready_app();
        app.handle_event(press(KeyCode::Char('9')));

        assert_eq!(app.range.span_days(), 90);
        assert_eq!(app.level, AggregationLevel::Weekly);
        assert!(matches!(app.state, AppState::Loading { .. }));
    }

    #[test]
    fn test_error_state_on_failed_load() {
        let mut app = App::new(Settings::default(), Theme::Dark);
        app.apply_data_result(Err("Failed to load campaign data.".into()));
        assert!(matches!(app.state, AppState::Error { .. }));
        assert!(app.view.is_none());
    }

    #[test]
    fn test_tick_advances_loading_spinner() {
        let mut app = App::new(Settings::default(), Theme::Dark);
        app.tick();
        match app.state {
            AppState::Loading { spinner_frame, .. } => assert_eq!(spinner_frame, 1),
            _ => panic!("expected loading state"),
        }
    }
}
