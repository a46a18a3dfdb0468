//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Loads run on a tokio
//! runtime owned by the [`App`]; their outcomes are drained once per frame
//! and applied to the [`Store`] on this thread.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        detail::DetailPopup,
        header::{Header, Message},
        help::HelpPopup,
        query_bar::{QueryBar, QueryBarState},
        result_list::{ResultList, ResultListState},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{io, time::Duration};
use stockbin_core::{
    config::Config, search::normalize, Applied, ErrorKind, LoadError, LoadTicket, Row, Store,
};
use stockbin_feeds::{LoadOrigin, LoadOutcome, Loader, Source};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    QueryBar,
    Results,
    /// Vim-style `:` command line is active.
    Command,
}

/// A load requested by the UI that has not been handed to the runtime yet.
#[derive(Debug)]
pub struct PendingLoad {
    pub ticket: LoadTicket,
    pub source: Source,
    pub origin: LoadOrigin,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub theme: Theme,
    pub message: Message,
    pub query: QueryBarState,
    pub results: ResultListState,
    /// Card shown in the detail popup.
    pub detail: Option<Row>,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub quit: bool,
    pending: Vec<PendingLoad>,
}

impl AppState {
    pub fn new(config: Config, theme: Theme) -> Self {
        Self {
            store: Store::new(),
            config,
            theme,
            message: Message::default(),
            query: QueryBarState::default(),
            results: ResultListState::default(),
            detail: None,
            focus: Focus::Results,
            prev_focus: Focus::Results,
            show_help: false,
            command_bar: CommandBarState::default(),
            quit: false,
            pending: Vec::new(),
        }
    }

    /// Start loading from a location string. A location that cannot even be
    /// interpreted fails the load right away, with the same store effects as
    /// a failed fetch.
    pub fn request_location(&mut self, location: &str, origin: LoadOrigin) {
        match Source::parse(location) {
            Ok(source) => self.request_load(source, origin),
            Err(err) => {
                let ticket = self.store.begin_load();
                self.apply(LoadOutcome {
                    ticket,
                    origin,
                    location: location.to_string(),
                    result: Err(err.into()),
                });
            }
        }
    }

    /// Start a load from `source`. Any load already in flight is superseded.
    pub fn request_load(&mut self, source: Source, origin: LoadOrigin) {
        let ticket = self.store.begin_load();
        tracing::debug!(location = %source.location(), ?origin, "load requested");
        self.detail = None;
        self.message = Message::info("데이터 로딩 중…");
        self.pending.push(PendingLoad { ticket, source, origin });
        self.refresh_results();
    }

    /// Loads requested since the last call, in request order.
    pub fn take_pending(&mut self) -> Vec<PendingLoad> {
        std::mem::take(&mut self.pending)
    }

    /// Apply a finished load. Superseded outcomes change nothing.
    pub fn apply(&mut self, outcome: LoadOutcome) {
        let LoadOutcome { ticket, origin, location, result } = outcome;
        let failure = result
            .as_ref()
            .err()
            .map(|err| failure_message(origin, &location, err));

        match self.store.complete(ticket, result, origin.on_error()) {
            Applied::Superseded => return,
            Applied::Replaced { count } => {
                self.message = Message::info(format!("데이터 {count}건 로딩 완료"));
                if self.focus != Focus::Command {
                    self.focus = Focus::QueryBar;
                }
            }
            Applied::Failed { retained } => {
                tracing::debug!(retained, "load failure shown");
                self.message = Message::error(failure.unwrap_or_default());
            }
        }
        self.refresh_results();
    }

    /// Drop data, query and selection.
    pub fn reset(&mut self) {
        self.store.reset();
        self.pending.clear();
        self.query.clear();
        self.detail = None;
        self.message = Message::info("초기화했어요.");
        self.refresh_results();
    }

    /// Re-run the current query against the store.
    pub fn refresh_results(&mut self) {
        let options = self.config.search_options();
        let has_query = self.store.search_enabled()
            && !normalize(&self.query.query, options.whitespace).is_empty();

        if has_query {
            let rows = self
                .store
                .search(&self.query.query, &options)
                .into_iter()
                .cloned()
                .collect();
            self.results.set(rows, true);
        } else {
            self.results.clear();
        }
        tracing::debug!(query = %self.query.query, results = self.results.rows.len(), "results refreshed");
    }

    /// Handle one semantic event.
    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        if self.detail.is_some() {
            if matches!(event, AppEvent::Escape | AppEvent::Enter | AppEvent::Quit) {
                tracing::debug!("detail popup closed");
                self.detail = None;
            }
            return;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            match event {
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                }
                AppEvent::Enter => {
                    let input = self.command_bar.input.clone();
                    match Command::parse(&input) {
                        Ok(cmd) => {
                            tracing::debug!(command = ?cmd, "executing command");
                            self.command_bar.clear();
                            self.focus = self.prev_focus;
                            execute_command(self, cmd);
                        }
                        Err(msg) if msg.is_empty() => {
                            // Empty input, just close
                            self.command_bar.clear();
                            self.focus = self.prev_focus;
                        }
                        Err(msg) => {
                            // Show the error; bar stays open
                            self.command_bar.error = Some(msg);
                        }
                    }
                }
                AppEvent::Quit => self.quit = true,
                other => self.command_bar.handle(&other),
            }
            return;
        }

        match event {
            AppEvent::Char('?') if self.focus != Focus::QueryBar => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }

            AppEvent::Char(':') if self.focus != Focus::QueryBar => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }

            AppEvent::Escape if self.focus == Focus::QueryBar => {
                tracing::debug!("focus: QueryBar -> Results");
                self.focus = Focus::Results;
            }

            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::QueryBar => Focus::Results,
                    Focus::Results | Focus::Command => Focus::QueryBar,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
            }

            AppEvent::QueryFocus => {
                tracing::debug!("focus -> QueryBar");
                self.focus = Focus::QueryBar;
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => self.dispatch_to_focused(other),
        }
    }

    /// Route an event to the widget that owns the current focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) {
        match self.focus {
            Focus::QueryBar => match event {
                AppEvent::Enter | AppEvent::Nav(Direction::Down) => {
                    if !self.results.rows.is_empty() {
                        self.focus = Focus::Results;
                    }
                }
                AppEvent::PageUp | AppEvent::PageDown => self.results.handle(&event),
                other => {
                    if !self.store.search_enabled() {
                        return;
                    }
                    if self.query.handle(&other) {
                        self.detail = None;
                        self.refresh_results();
                    }
                }
            },
            Focus::Results => match event {
                AppEvent::Enter => {
                    self.detail = self.results.selected().cloned();
                    tracing::debug!(open = self.detail.is_some(), "detail popup");
                }
                other => self.results.handle(&other),
            },
            Focus::Command => {} // handled before dispatch
        }
    }
}

fn failure_message(origin: LoadOrigin, location: &str, err: &LoadError) -> String {
    match (err.kind(), origin) {
        (ErrorKind::Fetch, LoadOrigin::Startup | LoadOrigin::Reload) => {
            format!("자동 로딩 실패: {location} 파일명/위치를 확인해 주세요.")
        }
        (ErrorKind::Fetch, LoadOrigin::Upload) => format!("파일을 열 수 없어요: {err}"),
        (ErrorKind::Parse, _) => format!("엑셀 파일을 읽지 못했어요: {err}"),
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    runtime: tokio::runtime::Runtime,
    loader: Loader,
}

impl App {
    pub fn new(config: Config, theme: Theme) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("stockbin-load")
            .build()?;
        let loader = Loader::new(runtime.handle().clone());

        let mut state = AppState::new(config, theme);
        if state.config.source.autoload {
            let location = state.config.source.location.clone();
            state.request_location(&location, LoadOrigin::Startup);
        }

        Ok(App { state, runtime, loader })
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        // In-flight loads are abandoned.
        self.runtime.shutdown_background();
        result
    }

    /// Hand new load requests to the runtime and apply finished ones.
    fn pump_loads(&mut self) {
        let options = self.state.config.ingest_options();
        for load in self.state.take_pending() {
            self.loader.spawn(load.ticket, load.source, options, load.origin);
        }
        while let Some(outcome) = self.loader.try_recv() {
            self.state.apply(outcome);
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.pump_loads();

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(&self.state) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// True when printable keys should produce characters rather than trigger
/// shortcuts.
fn is_insert_mode(s: &AppState) -> bool {
    s.detail.is_none()
        && !s.show_help
        && matches!(s.focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 4-line header | 3-line query bar | results
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Fill(1)])
        .split(area);

    let search_enabled = state.store.search_enabled();
    let query_bar = QueryBar::new(
        &state.query,
        state.focus == Focus::QueryBar,
        search_enabled,
        &state.theme,
    );

    frame.render_widget(Header::new(&state.store, &state.message, &state.theme), vert[0]);
    let query_cursor = query_bar.cursor_position(vert[1]);
    frame.render_widget(query_bar, vert[1]);
    frame.render_widget(
        ResultList::new(&state.results, state.focus == Focus::Results, &state.theme),
        vert[2],
    );

    if let Some(row) = &state.detail {
        frame.render_widget(DetailPopup::new(row, &state.theme), area);
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if state.focus == Focus::QueryBar && search_enabled && state.detail.is_none() {
        frame.set_cursor_position(query_cursor);
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::header::Tone;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use stockbin_core::{FetchError, ParseError, Status};

    fn state() -> AppState {
        AppState::new(Config::defaults(), Theme::load_default())
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                company: "행복상사".into(),
                product: "우유".into(),
                storage_bin: "A-01".into(),
                ..Row::default()
            },
            Row {
                company: "바른식품".into(),
                product: "두부".into(),
                storage_bin: "B-02".into(),
                ..Row::default()
            },
        ]
    }

    fn outcome(load: PendingLoad, result: Result<Vec<Row>, LoadError>) -> LoadOutcome {
        LoadOutcome {
            ticket: load.ticket,
            origin: load.origin,
            location: load.source.location(),
            result,
        }
    }

    fn loaded() -> AppState {
        let mut s = state();
        s.request_load(Source::File("public/data.xlsx".into()), LoadOrigin::Startup);
        let load = s.take_pending().pop().unwrap();
        s.apply(outcome(load, Ok(rows())));
        s
    }

    fn type_text(s: &mut AppState, text: &str) {
        for c in text.chars() {
            s.handle(AppEvent::Char(c));
        }
    }

    #[test]
    fn successful_load_focuses_query_bar() {
        let s = loaded();
        assert_eq!(s.store.status(), &Status::Ready { count: 2 });
        assert_eq!(s.message, Message::info("데이터 2건 로딩 완료"));
        assert_eq!(s.focus, Focus::QueryBar);
    }

    #[test]
    fn typing_searches_and_clears_detail() {
        let mut s = loaded();
        type_text(&mut s, "우유");
        assert_eq!(s.results.rows.len(), 1);
        assert!(s.results.has_query);

        s.handle(AppEvent::Enter);
        assert_eq!(s.focus, Focus::Results);
        s.handle(AppEvent::Enter);
        assert_eq!(s.detail.as_ref().map(|r| r.storage_bin.as_str()), Some("A-01"));

        s.handle(AppEvent::Escape);
        assert!(s.detail.is_none());
        s.handle(AppEvent::QueryFocus);
        s.handle(AppEvent::Backspace);
        assert_eq!(s.query.query, "우");
        assert_eq!(s.results.rows.len(), 1);
        type_text(&mut s, "x");
        assert_eq!(s.results.rows.len(), 0);
        assert!(s.results.has_query);
    }

    #[test]
    fn query_bar_ignores_input_while_disabled() {
        let mut s = state();
        s.handle(AppEvent::QueryFocus);
        type_text(&mut s, "우유");
        assert_eq!(s.query.query, "");
    }

    #[test]
    fn startup_fetch_failure_message() {
        let mut s = state();
        s.request_load(Source::File("public/data.xlsx".into()), LoadOrigin::Startup);
        let load = s.take_pending().pop().unwrap();
        let err = FetchError::Status { location: "public/data.xlsx".into(), status: 404 };
        s.apply(outcome(load, Err(err.into())));

        assert_eq!(s.message.tone, Tone::Error);
        assert_eq!(s.message.text, "자동 로딩 실패: public/data.xlsx 파일명/위치를 확인해 주세요.");
        assert!(!s.store.search_enabled());
    }

    #[test]
    fn https_location_fails_without_spawning() {
        let mut s = state();
        s.request_location("https://example.com/data.xlsx", LoadOrigin::Startup);
        assert!(s.take_pending().is_empty());
        assert!(matches!(s.store.status(), Status::Failed { kind: ErrorKind::Fetch, .. }));
    }

    #[test]
    fn failed_upload_keeps_rows_and_search() {
        let mut s = loaded();
        s.request_load(Source::File("bad.xlsx".into()), LoadOrigin::Upload);
        let load = s.take_pending().pop().unwrap();
        s.apply(outcome(load, Err(ParseError::NoSheet.into())));

        assert!(s.message.text.starts_with("엑셀 파일을 읽지 못했어요: "));
        assert_eq!(s.store.len(), 2);
        assert!(s.store.search_enabled());
    }

    #[test]
    fn superseded_load_is_ignored() {
        let mut s = state();
        s.request_load(Source::File("first.xlsx".into()), LoadOrigin::Startup);
        s.request_load(Source::File("second.xlsx".into()), LoadOrigin::Upload);
        let mut loads = s.take_pending();
        let second = loads.pop().unwrap();
        let first = loads.pop().unwrap();

        s.apply(outcome(first, Ok(rows())));
        assert!(s.store.is_loading());
        s.apply(outcome(second, Ok(rows()[..1].to_vec())));
        assert_eq!(s.store.len(), 1);
    }

    #[test]
    fn reset_command_clears_everything() {
        let mut s = loaded();
        type_text(&mut s, "두부");
        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char(':'));
        type_text(&mut s, "reset");
        s.handle(AppEvent::Enter);

        assert_eq!(s.store.status(), &Status::Idle);
        assert_eq!(s.query.query, "");
        assert!(s.results.rows.is_empty());
    }

    #[test]
    fn open_command_rejects_other_extensions() {
        let mut s = loaded();
        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char(':'));
        type_text(&mut s, "open notes.txt");
        s.handle(AppEvent::Enter);

        assert_eq!(s.focus, Focus::Command);
        assert!(s.command_bar.error.is_some());
        assert!(s.take_pending().is_empty());
    }

    #[test]
    fn open_command_queues_upload() {
        let mut s = loaded();
        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char(':'));
        type_text(&mut s, "open 재고.xlsx");
        s.handle(AppEvent::Enter);

        let loads = s.take_pending();
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].origin, LoadOrigin::Upload);
        assert!(s.store.is_loading());
    }

    #[test]
    fn draw_shows_title_and_placeholder() {
        let s = state();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| draw(frame, &s)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
            .split_whitespace()
            .collect();
        assert!(text.contains("물품보관장"));
        assert!(text.contains("업체명또는상품명검색"));
    }

    #[test]
    fn draw_places_cursor_after_typed_query() {
        let mut s = loaded();
        type_text(&mut s, "우");
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| draw(frame, &s)).unwrap();

        // Header is four rows tall; the query text sits inside the bar border.
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            ratatui::layout::Position::new(3, 5)
        );
        assert_eq!(terminal.backend().buffer()[(1, 5)].symbol(), "우");
    }
}
