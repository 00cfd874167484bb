//! Top-level application: the menu/session owner.
//!
//! Runs a single cooperative `tokio::select!` loop over terminal events,
//! the simulation tick timer, a render timer and results coming back from
//! background leaderboard tasks. All network I/O happens on spawned
//! tasks; nothing in this loop blocks on the database.

use std::io::{stderr, Stderr};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, timeout, Instant, Interval};
use tracing::{info, warn};

use crate::game::{Difficulty, Direction, GameConfig, Session, SessionOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::leaderboard::{Leaderboard, Phase, ScoreRecord};
use crate::render::Renderer;

const MENU_OPTION_COUNT: usize = 5;
const MENU_NEW_GAME: usize = 0;
const MENU_DIFFICULTY: usize = 1;
const MENU_LEADERBOARD: usize = 2;
const MENU_HELP: usize = 3;
const MENU_QUIT: usize = 4;

const MAX_USERNAME_LEN: usize = 15;
const LEADERBOARD_LIMIT: i64 = 10;

/// How long a final score write may hold up shutdown
const QUIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// An interval whose first tick fires a full `period` from now, unlike
/// [`interval`] which fires immediately. Used when the tick rate changes
/// mid-game so the switch does not inject an extra simulation step.
fn interval_after(period: Duration) -> Interval {
    interval_at(Instant::now() + period, period)
}

/// UI phase. Each variant owns only the data relevant to that phase.
enum AppState {
    Connecting,
    ConnectionError,
    Login { buffer: String },
    Menu { selected: usize },
    Playing { session: Session },
    Leaderboard { scores: Option<Vec<ScoreRecord>> },
    Help,
}

/// Results delivered from background tasks back into the loop
enum AppEvent {
    ScoresLoaded(Vec<ScoreRecord>),
}

pub struct App {
    config: GameConfig,
    leaderboard: Leaderboard,
    renderer: Renderer,
    input_handler: InputHandler,
    state: AppState,
    username: String,
    difficulty: Difficulty,
    should_quit: bool,
    /// Score write started on the quit path, awaited before teardown
    pending_flush: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: GameConfig, leaderboard: Leaderboard) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            config,
            leaderboard,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            state: AppState::Connecting,
            username: String::new(),
            difficulty: Difficulty::default(),
            should_quit: false,
            pending_flush: None,
            events_tx,
            events_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        // Cleanup terminal even if the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_period = self.desired_tick_period();
        let mut tick_timer = interval(tick_period);

        // Render at 30 FPS; at least once per simulation tick
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Simulation tick
                _ = tick_timer.tick() => {
                    self.on_tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.poll_connection();
                    terminal.draw(|frame| self.render(frame))
                        .context("Failed to draw frame")?;
                }

                // Background task results
                Some(app_event) = self.events_rx.recv() => {
                    self.on_app_event(app_event);
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            // The tick rate follows the active session's difficulty
            let desired = self.desired_tick_period();
            if desired != tick_period {
                tick_period = desired;
                tick_timer = interval_after(tick_period);
            }

            if self.should_quit {
                break;
            }
        }

        // A score submitted on the way out is racing runtime teardown;
        // give it a bounded window to land.
        if let Some(flush) = self.pending_flush.take() {
            if timeout(QUIT_FLUSH_TIMEOUT, flush).await.is_err() {
                warn!("final score write did not finish before shutdown");
            }
        }

        Ok(())
    }

    fn desired_tick_period(&self) -> Duration {
        match &self.state {
            AppState::Playing { session } => session.difficulty.tick_interval(),
            _ => Difficulty::default().tick_interval(),
        }
    }

    /// Observe the gateway phase while on the splash screen
    fn poll_connection(&mut self) {
        if matches!(self.state, AppState::Connecting) {
            match self.leaderboard.phase() {
                Phase::Online => {
                    self.state = AppState::Login {
                        buffer: String::new(),
                    };
                }
                Phase::Offline => self.state = AppState::ConnectionError,
                Phase::Connecting => {}
            }
        }
    }

    fn on_tick(&mut self) {
        let outcome = match &mut self.state {
            AppState::Playing { session } => session.tick(),
            _ => None,
        };
        if let Some(outcome) = outcome {
            self.finish_session(outcome);
        }
    }

    fn on_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ScoresLoaded(records) => {
                // Ignored if the user already left the leaderboard screen
                if let AppState::Leaderboard { scores } = &mut self.state {
                    *scores = Some(records);
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            let action = self.input_handler.handle_key_event(key);
            self.handle_key_action(action);
        }
    }

    fn handle_key_action(&mut self, action: KeyAction) {
        // Deferred effects that need `&mut self` after the state borrow ends
        let mut confirm_menu = false;
        let mut cycle_difficulty = false;
        let mut session_outcome = None;

        match &mut self.state {
            AppState::Connecting => {
                if action == KeyAction::Quit {
                    self.should_quit = true;
                }
            }

            AppState::ConnectionError => {
                if matches!(action, KeyAction::Escape | KeyAction::Quit) {
                    self.should_quit = true;
                }
            }

            AppState::Login { buffer } => match action {
                KeyAction::Confirm => {
                    if !buffer.trim().is_empty() {
                        self.username = std::mem::take(buffer);
                        info!(username = %self.username, "user logged in");
                        self.state = AppState::Menu { selected: 0 };
                    }
                }
                KeyAction::Backspace => {
                    buffer.pop();
                }
                KeyAction::Char(c) => {
                    if c.is_alphanumeric() && buffer.len() < MAX_USERNAME_LEN {
                        buffer.push(c);
                    }
                }
                KeyAction::Escape | KeyAction::Quit => self.should_quit = true,
                _ => {}
            },

            AppState::Menu { selected } => match action {
                KeyAction::Direction(Direction::North) => {
                    *selected = (*selected + MENU_OPTION_COUNT - 1) % MENU_OPTION_COUNT;
                }
                KeyAction::Direction(Direction::South) => {
                    *selected = (*selected + 1) % MENU_OPTION_COUNT;
                }
                KeyAction::Direction(Direction::East | Direction::West) => {
                    cycle_difficulty = *selected == MENU_DIFFICULTY;
                }
                KeyAction::Confirm => confirm_menu = true,
                KeyAction::Quit => self.should_quit = true,
                _ => {}
            },

            AppState::Playing { session } => {
                if let Some(input) = action.to_session_input() {
                    session_outcome = session.handle_input(input);
                }
            }

            AppState::Leaderboard { .. } | AppState::Help => match action {
                KeyAction::Escape => self.state = AppState::Menu { selected: 0 },
                KeyAction::Quit => self.should_quit = true,
                _ => {}
            },
        }

        if cycle_difficulty {
            self.difficulty = self.difficulty.next();
        }
        if confirm_menu {
            self.select_menu_option();
        }
        if let Some(outcome) = session_outcome {
            self.finish_session(outcome);
        }
    }

    fn select_menu_option(&mut self) {
        let AppState::Menu { selected } = &self.state else {
            return;
        };
        match *selected {
            MENU_NEW_GAME => {
                self.state = AppState::Playing {
                    session: Session::new(self.config, self.difficulty),
                };
            }
            MENU_DIFFICULTY => self.difficulty = self.difficulty.next(),
            MENU_LEADERBOARD => {
                self.state = AppState::Leaderboard { scores: None };
                // Fetch on a background task; the result arrives over the
                // app event channel and the screen shows a loading row
                // until then.
                let leaderboard = self.leaderboard.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let scores = leaderboard.top_scores(LEADERBOARD_LIMIT).await;
                    if tx.send(AppEvent::ScoresLoaded(scores)).is_err() {
                        warn!("app loop gone before scores arrived");
                    }
                });
            }
            MENU_HELP => self.state = AppState::Help,
            MENU_QUIT => self.should_quit = true,
            _ => {}
        }
    }

    /// A session reported a terminal outcome: flush the score and move on
    fn finish_session(&mut self, outcome: SessionOutcome) {
        let AppState::Playing { session } = &self.state else {
            return;
        };
        let score = session.score();
        let difficulty = session.difficulty;

        match outcome {
            SessionOutcome::GameOver => {
                info!(score, "session over, submitting score");
                self.leaderboard.submit(&self.username, score, difficulty);
                self.state = AppState::Menu { selected: 0 };
            }
            SessionOutcome::Menu => {
                if score > 0 {
                    self.leaderboard.submit(&self.username, score, difficulty);
                }
                self.state = AppState::Menu { selected: 0 };
            }
            SessionOutcome::QuitApp => {
                if score > 0 {
                    self.pending_flush =
                        self.leaderboard.submit(&self.username, score, difficulty);
                }
                self.should_quit = true;
            }
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        match &self.state {
            AppState::Connecting => self.renderer.render_connecting(frame),
            AppState::ConnectionError => self.renderer.render_offline(frame),
            AppState::Login { buffer } => self.renderer.render_login(frame, buffer),
            AppState::Menu { selected } => {
                self.renderer
                    .render_menu(frame, &self.username, *selected, self.difficulty)
            }
            AppState::Playing { session } => self.renderer.render_game(frame, session),
            AppState::Leaderboard { scores } => self
                .renderer
                .render_leaderboard(frame, scores.as_deref()),
            AppState::Help => self.renderer.render_help(frame),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
