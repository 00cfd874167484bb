use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::game::{Cell, Difficulty, Session};
use crate::leaderboard::ScoreRecord;

const TITLE: &str = "Maze Runner";

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Splash screen shown while the leaderboard connects
    pub fn render_connecting(&self, frame: &mut Frame) {
        let text = vec![
            Line::from(""),
            title_line(),
            Line::from(""),
            Line::from(Span::styled(
                "Connecting to leaderboard...",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            centered(frame.area(), 40, 8),
        );
    }

    /// Connectivity gate: play is not permitted while offline
    pub fn render_offline(&self, frame: &mut Frame) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "You are offline.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::raw("App cannot run without internet.")),
            Line::from(""),
            Line::from(Span::styled(
                "Press ESC to Quit",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(
                    Style::default().fg(Color::Red),
                )),
            centered(frame.area(), 44, 8),
        );
    }

    /// Username entry screen
    pub fn render_login(&self, frame: &mut Frame, buffer: &str) {
        let hint = if buffer.is_empty() {
            Span::styled("Type your name...", Style::default().fg(Color::Gray))
        } else {
            Span::styled("Press ENTER to Start", Style::default().fg(Color::Green))
        };

        let text = vec![
            title_line(),
            Line::from(""),
            Line::from(Span::raw("Enter Username:")),
            Line::from(Span::styled(
                "(Alphanumeric only, max 15 chars)",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("[ {buffer}_ ]"),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(hint),
        ];
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            centered(frame.area(), 44, 12),
        );
    }

    /// Main menu with wraparound selection
    pub fn render_menu(
        &self,
        frame: &mut Frame,
        username: &str,
        selected: usize,
        difficulty: Difficulty,
    ) {
        let options = [
            "New Game".to_string(),
            format!("Difficulty: {difficulty}"),
            "Leaderboard".to_string(),
            "Help".to_string(),
            "Quit".to_string(),
        ];

        let mut text = vec![
            Line::from(Span::styled(
                format!("Welcome, {username}!"),
                Style::default().fg(Color::Blue),
            )),
            Line::from(""),
            title_line(),
            Line::from(""),
        ];

        for (i, option) in options.iter().enumerate() {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            text.push(Line::from(Span::styled(format!("  {option}  "), style)));
            text.push(Line::from(""));
        }

        text.push(Line::from(Span::styled(
            "Use Arrow Keys to Navigate, Enter to Select",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            centered(frame.area(), 48, 18),
        );
    }

    /// The running game: HUD header, grid, controls footer, pause overlay
    pub fn render_game(&self, frame: &mut Frame, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // HUD
                Constraint::Min(0),    // Grid
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        frame.render_widget(self.hud(session), chunks[0]);

        let grid_area = centered(
            chunks[1],
            (session.grid().width * 2 + 2) as u16,
            (session.grid().height + 2) as u16,
        );
        frame.render_widget(self.grid(session), grid_area);

        if session.paused {
            let overlay = centered(chunks[1], 16, 3);
            frame.render_widget(Clear, overlay);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "PAUSED",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
                overlay,
            );
        }

        frame.render_widget(self.controls(), chunks[2]);
    }

    fn hud(&self, session: &Session) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Lives: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.lives.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.format_elapsed(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(
                session.difficulty.to_string(),
                Style::default().fg(Color::Cyan),
            ),
        ])];
        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn grid(&self, session: &Session) -> Paragraph<'_> {
        let mut lines = Vec::new();

        for row in 0..session.grid().height {
            let mut spans = Vec::new();
            for col in 0..session.grid().width {
                let cell = Cell::new(col, row);

                let span = if cell == session.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if session.snake.occupies(cell) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if cell == session.food.cell {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(format!(" {TITLE} ")),
        )
    }

    fn controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→/WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" move | "),
            Span::styled("P/Tab", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("ESC", Style::default().fg(Color::Red)),
            Span::raw(" menu"),
        ])];
        Paragraph::new(text).alignment(Alignment::Center)
    }

    /// Leaderboard table; `None` means the fetch is still in flight
    pub fn render_leaderboard(&self, frame: &mut Frame, scores: Option<&[ScoreRecord]>) {
        let mut text = vec![
            Line::from(Span::styled(
                "Leaderboard",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "{:<6} {:<16} {:<12} {:>6}",
                    "Rank", "Player", "Difficulty", "Score"
                ),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "─".repeat(44),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        match scores {
            None => text.push(Line::from(Span::styled(
                "Loading scores...",
                Style::default().fg(Color::Gray),
            ))),
            Some([]) => text.push(Line::from(Span::raw("No scores yet!"))),
            Some(records) => {
                for (i, record) in records.iter().enumerate() {
                    // Highlight the top player
                    let color = if i == 0 { Color::Green } else { Color::White };
                    text.push(Line::from(Span::styled(
                        format!(
                            "{:<6} {:<16} {:<12} {:>6}",
                            i + 1,
                            record.username,
                            record.difficulty,
                            record.score
                        ),
                        Style::default().fg(color),
                    )));
                }
            }
        }

        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Press ESC to return",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            centered(frame.area(), 50, 20),
        );
    }

    pub fn render_help(&self, frame: &mut Frame) {
        let key = Style::default().fg(Color::Yellow);
        let text = vec![
            Line::from(Span::styled(
                "Help",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Controls", Style::default().fg(Color::Green))),
            Line::from(vec![
                Span::styled("Arrow Keys / WASD", key),
                Span::raw("  Move Snake"),
            ]),
            Line::from(vec![Span::styled("P / TAB", key), Span::raw("  Pause / Resume")]),
            Line::from(vec![Span::styled("ESC", key), Span::raw("  Back / Quit")]),
            Line::from(vec![Span::styled("ENTER", key), Span::raw("  Select Item")]),
            Line::from(""),
            Line::from(Span::styled("Rules", Style::default().fg(Color::Green))),
            Line::from(Span::raw("Eat Red Food to Grow")),
            Line::from(Span::raw("Avoid Hitting Your Tail")),
            Line::from(Span::raw("Walls Wrap Around")),
            Line::from(Span::raw("3 Lives Per Game")),
            Line::from(""),
            Line::from(Span::styled(
                "Press ESC to return",
                Style::default().fg(Color::Gray),
            )),
        ];

        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            ),
            centered(frame.area(), 46, 20),
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn title_line() -> Line<'static> {
    Line::from(Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
}

/// A rect of at most `width` x `height` centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
