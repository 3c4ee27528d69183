//! The interactive terminal UI: one input box, four view states.
//!
//! The event loop owns the single `SearchState` and is its only mutator.
//! Searches run as tasks on the app's tokio runtime; outcomes come back over
//! a channel tagged with the request's sequence token and are fed through the
//! reducer, which discards anything stale.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::config::Config;
use crate::history::QueryHistory;
use crate::search_client::StockSearch;
use crate::state::{reduce, Command, SearchEvent, SearchOutcome, SearchState, ViewState};
use crate::utils::logging;
use crate::widgets;

const POLL_INTERVAL_MS: u64 = 100;
const ANALYSIS_SCROLL_STEP: u16 = 3;

#[derive(Clone, Copy, PartialEq)]
enum Focus {
    Query,
    Sources,
}

pub struct TuiApp {
    config: Config,
    client: Arc<dyn StockSearch>,
    runtime: tokio::runtime::Runtime,
    tx: UnboundedSender<(u64, SearchOutcome)>,
    rx: UnboundedReceiver<(u64, SearchOutcome)>,

    state: SearchState,
    input: Input,
    history: QueryHistory,
    focus: Focus,
    sources_state: ListState,
    analysis_scroll: u16,
    show_help: bool,
    show_log: bool,
    status_message: String,
    tick: usize,
}

impl TuiApp {
    pub fn new(config: Config, client: Arc<dyn StockSearch>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            client,
            runtime,
            tx,
            rx,
            state: SearchState::new(),
            input: Input::default(),
            history: QueryHistory::new(),
            focus: Focus::Query,
            sources_state: ListState::default(),
            analysis_scroll: 0,
            show_help: false,
            show_log: false,
            status_message: "Type a ticker or company name and press Enter".to_string(),
            tick: 0,
        })
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.drain_outcomes();
            terminal.draw(|f| self.ui(f))?;

            if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
            self.tick = self.tick.wrapping_add(1);
        }
        Ok(())
    }

    /// Feed an event through the reducer and execute whatever it asked for.
    fn apply(&mut self, event: SearchEvent) {
        let previous_view = self.state.view;
        let reduction = reduce(&self.state, &event);
        self.state = reduction.next;

        if previous_view != self.state.view {
            match self.state.view {
                ViewState::Success => {
                    self.status_message = format!("Results for {}", self.state.query);
                }
                ViewState::Error => {
                    self.status_message = "Search failed".to_string();
                }
                ViewState::Idle => {
                    self.status_message =
                        "Type a ticker or company name and press Enter".to_string();
                }
                ViewState::Loading => {}
            }
        }

        // Handled outside the view-change check so a resubmit while already
        // Loading still resets the result accessories.
        if let Some(Command::StartSearch { seq, query }) = reduction.command {
            self.focus = Focus::Query;
            self.sources_state.select(None);
            self.analysis_scroll = 0;
            self.status_message = format!("Searching for {}", query);
            self.start_search(seq, query);
        }
    }

    fn start_search(&mut self, seq: u64, query: String) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = match client.search(&query).await {
                Ok(result) => SearchOutcome::Resolved(result),
                Err(err) => {
                    error!(target: "search", "Search #{} for '{}' failed: {}", seq, query, err);
                    SearchOutcome::Rejected(err)
                }
            };
            // Receiver gone means the app is shutting down.
            let _ = tx.send((seq, outcome));
        });
    }

    fn drain_outcomes(&mut self) {
        while let Ok((seq, outcome)) = self.rx.try_recv() {
            self.apply(SearchEvent::SearchFinished { seq, outcome });
        }
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return false;
        }
        if self.show_log {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(12)) {
                self.show_log = false;
            }
            return false;
        }

        match key.code {
            KeyCode::F(1) => self.show_help = true,
            KeyCode::F(12) => self.show_log = true,

            // Ctrl+H arrives as Backspace in many terminals, so home is Ctrl+L.
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.go_home();
            }

            KeyCode::Enter => self.submit(),

            KeyCode::Esc => match self.state.view {
                ViewState::Error => self.apply(SearchEvent::ErrorDismissed),
                _ if self.focus == Focus::Sources => self.focus = Focus::Query,
                ViewState::Success => self.go_home(),
                ViewState::Loading => {}
                ViewState::Idle => return true,
            },

            KeyCode::Tab => self.toggle_focus(),

            KeyCode::Up | KeyCode::Down => self.handle_up_down(key.code),

            KeyCode::PageUp => {
                self.analysis_scroll = self.analysis_scroll.saturating_sub(ANALYSIS_SCROLL_STEP)
            }
            KeyCode::PageDown => {
                self.analysis_scroll = self.analysis_scroll.saturating_add(ANALYSIS_SCROLL_STEP)
            }

            KeyCode::Char('y') if self.focus == Focus::Sources => self.yank_selected_source(),

            KeyCode::Char(c @ '1'..='9')
                if self.state.view == ViewState::Idle && self.input.value().is_empty() =>
            {
                let index = (c as usize) - ('1' as usize);
                if let Some(ticker) = self.config.display.hot_tickers.get(index) {
                    self.input = Input::from(ticker.clone());
                }
            }

            _ => {
                if self.focus == Focus::Query {
                    self.input.handle_event(&Event::Key(key));
                }
            }
        }
        false
    }

    fn submit(&mut self) {
        let query = self.input.value().to_string();
        if query.trim().is_empty() {
            // Reducer would ignore it anyway; skip the round trip.
            return;
        }
        if self.config.behavior.enable_history {
            self.history.push(&query);
        }
        self.focus = Focus::Query;
        self.apply(SearchEvent::QuerySubmitted { query });
    }

    fn go_home(&mut self) {
        self.apply(SearchEvent::HomeRequested);
        self.input = Input::default();
        self.focus = Focus::Query;
        self.sources_state.select(None);
        self.analysis_scroll = 0;
        self.history.reset_cursor();
    }

    fn toggle_focus(&mut self) {
        let has_sources = self
            .state
            .result
            .as_ref()
            .map(|r| !r.sources.is_empty())
            .unwrap_or(false);
        if self.state.view != ViewState::Success || !has_sources {
            return;
        }

        self.focus = match self.focus {
            Focus::Query => {
                if self.sources_state.selected().is_none() {
                    self.sources_state.select(Some(0));
                }
                Focus::Sources
            }
            Focus::Sources => Focus::Query,
        };
    }

    fn handle_up_down(&mut self, code: KeyCode) {
        if self.focus == Focus::Sources {
            let count = self.visible_source_count();
            if count == 0 {
                return;
            }
            let current = self.sources_state.selected().unwrap_or(0);
            let next = match code {
                KeyCode::Up => {
                    if current > 0 {
                        current - 1
                    } else {
                        count - 1
                    }
                }
                _ => {
                    if current + 1 < count {
                        current + 1
                    } else {
                        0
                    }
                }
            };
            self.sources_state.select(Some(next));
            return;
        }

        if !self.config.behavior.enable_history {
            return;
        }
        match code {
            KeyCode::Up => {
                if let Some(entry) = self.history.previous() {
                    self.input = Input::from(entry.to_string());
                }
            }
            _ => match self.history.next() {
                Some(entry) => self.input = Input::from(entry.to_string()),
                None => self.input = Input::default(),
            },
        }
    }

    fn visible_source_count(&self) -> usize {
        self.state
            .result
            .as_ref()
            .map(|r| r.sources.len().min(self.config.display.max_sources))
            .unwrap_or(0)
    }

    fn yank_selected_source(&mut self) {
        let Some(index) = self.sources_state.selected() else {
            return;
        };
        let Some(source) = self
            .state
            .result
            .as_ref()
            .and_then(|r| r.sources.get(index))
        else {
            return;
        };

        match arboard::Clipboard::new().and_then(|mut c| c.set_text(source.uri.clone())) {
            Ok(()) => {
                info!(target: "yank", "Copied source uri: {}", source.uri);
                self.status_message = format!("Copied {}", source.uri);
            }
            Err(err) => {
                warn!(target: "yank", "Clipboard unavailable: {}", err);
                self.status_message = "Clipboard unavailable".to_string();
            }
        }
    }

    // ========================================
    // Rendering
    // ========================================

    fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // query input
                Constraint::Min(5),    // body
                Constraint::Length(1), // status bar
            ])
            .split(f.area());

        self.render_input(f, chunks[0]);

        match self.state.view {
            ViewState::Idle => self.render_idle(f, chunks[1]),
            ViewState::Loading => {
                widgets::spinner::render_loading(f, chunks[1], &self.state.query, self.tick)
            }
            ViewState::Error => self.render_error(f, chunks[1]),
            ViewState::Success => self.render_success(f, chunks[1]),
        }

        self.render_status(f, chunks[2]);

        if self.show_help {
            widgets::help::render_help(f, centered_rect(64, 60, f.area()));
        }
        if self.show_log {
            if let Some(buffer) = logging::get_log_buffer() {
                widgets::log_overlay::render_log_overlay(f, centered_rect(90, 70, f.area()), &buffer);
            }
        }

        if self.focus == Focus::Query && !self.show_help && !self.show_log {
            f.set_cursor_position((
                chunks[0].x + self.input.visual_cursor() as u16 + 1,
                chunks[0].y + 1,
            ));
        }
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let style = match (self.state.view, self.focus) {
            (ViewState::Loading, _) => Style::default().fg(Color::DarkGray),
            (_, Focus::Query) => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::Gray),
        };

        let input_block = Block::default().borders(Borders::ALL).title(" Query ");
        let paragraph = Paragraph::new(self.input.value())
            .block(input_block)
            .style(style);
        f.render_widget(paragraph, area);
    }

    fn render_idle(&self, f: &mut Frame, area: Rect) {
        let mut hot = vec![Span::styled("Popular: ", Style::default().fg(Color::DarkGray))];
        for (i, ticker) in self.config.display.hot_tickers.iter().enumerate() {
            if i > 0 {
                hot.push(Span::raw("  "));
            }
            hot.push(Span::styled(
                format!("[{}] ", i + 1),
                Style::default().fg(Color::DarkGray),
            ));
            hot.push(Span::styled(
                ticker.clone(),
                Style::default().fg(Color::Cyan),
            ));
        }

        let lines = vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "MarketInsight",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::raw(self.config.display.tagline.clone())),
            Line::from(""),
            Line::from(hot),
            Line::from(""),
            Line::from(Span::styled(
                "Enter a stock ticker or company name above, e.g. NVDA or Apple",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        f.render_widget(Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center), area);
    }

    fn render_error(&self, f: &mut Frame, area: Rect) {
        let message = self.state.error.as_deref().unwrap_or_default();
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Search failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::raw(message.to_string())),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to go back",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center), area);
    }

    fn render_success(&mut self, f: &mut Frame, area: Rect) {
        let Some(result) = self.state.result.clone() else {
            // Success without a stored result cannot happen via the reducer.
            return;
        };

        let max_sources = self.config.display.max_sources;
        let sources_focused = self.focus == Focus::Sources;

        match &result.data {
            Some(data) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(7),  // overview
                        Constraint::Length(10), // chart
                        Constraint::Min(6),     // analysis + sources
                    ])
                    .split(area);

                widgets::overview::render_overview(f, rows[0], data);
                widgets::price_chart::render_price_chart(
                    f,
                    rows[1],
                    &data.chart_data,
                    data.is_losing(),
                );
                self.render_analysis_and_sources(
                    f,
                    rows[2],
                    &result,
                    sources_focused,
                    max_sources,
                );
            }
            None => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(2), Constraint::Min(6)])
                    .split(area);

                let notice = Paragraph::new(Span::styled(
                    "No concrete instrument matched this query; see the analysis below.",
                    Style::default().fg(Color::Yellow),
                ));
                f.render_widget(notice, rows[0]);
                self.render_analysis_and_sources(
                    f,
                    rows[1],
                    &result,
                    sources_focused,
                    max_sources,
                );
            }
        }
    }

    fn render_analysis_and_sources(
        &mut self,
        f: &mut Frame,
        area: Rect,
        result: &crate::models::SearchResult,
        sources_focused: bool,
        max_sources: usize,
    ) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        widgets::analysis::render_analysis(f, columns[0], &result.analysis, self.analysis_scroll);
        widgets::sources::render_sources(
            f,
            columns[1],
            &result.sources,
            &mut self.sources_state,
            sources_focused,
            max_sources,
        );
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let state_tag = match self.state.view {
            ViewState::Idle => "IDLE",
            ViewState::Loading => "LOADING",
            ViewState::Success => "RESULT",
            ViewState::Error => "ERROR",
        };

        let status_line = Line::from(vec![
            Span::styled(self.status_message.as_str(), Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(
                state_tag,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::raw(self.config.api.model.clone()),
            Span::raw(" | F1=Help F12=Log Ctrl+L=Home"),
        ]);

        let status = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));
        f.render_widget(status, area);
    }
}

/// Helper to create a centered rect using a percentage of the available area
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn run_tui(config: Config, client: Arc<dyn StockSearch>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(config, client)?;
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
