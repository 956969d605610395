//! TUI (Terminal User Interface) for the guessing game
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `GameView`: everything the screen shows plus key handling, no terminal access
//! - `TuiInterface`: owns the terminal, draws a `GameView` and implements `GameInterface`
//!
//! # State Machine
//! - `EnteringGuess` → (`R`) → `EnteringRange` → back to `EnteringGuess`
//! - `EnteringGuess` → correct guess → `GameOver` → (`N`) → `EnteringGuess`

use crate::engine::GuessOutcome;
use crate::error::{GuessError, RangeError};
use crate::game_state::{GameInterface, UserAction};
use crate::range::Range;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::io;

const MAX_INPUT_DIGITS: usize = 4;
const MAX_HISTORY_DISPLAY: usize = 12;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum GuessMark {
    TooLow,
    TooHigh,
    Correct,
}

impl GuessMark {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::TooLow => (Color::Yellow, Color::Black),
            Self::TooHigh => (Color::LightRed, Color::Black),
            Self::Correct => (Color::Green, Color::Black),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::TooLow => "too low",
            Self::TooHigh => "too high",
            Self::Correct => "correct!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GuessRow {
    value: u32,
    mark: GuessMark,
    range_after: Range,
}

impl GuessRow {
    fn from_outcome(outcome: &GuessOutcome) -> Self {
        let mark = match outcome {
            GuessOutcome::TooLow { .. } => GuessMark::TooLow,
            GuessOutcome::TooHigh { .. } => GuessMark::TooHigh,
            GuessOutcome::Correct { .. } => GuessMark::Correct,
        };
        Self {
            value: outcome.guessed(),
            mark,
            range_after: outcome.range(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeField {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    EnteringRange { field: RangeField },
    /// Game won - waiting for a new game, a range change or quit
    GameOver,
}

/// Screen contents and key handling, independent of the terminal.
#[derive(Debug)]
struct GameView {
    state: TuiState,
    history: Vec<GuessRow>,
    current_input: String,
    range_min_input: String,
    range_max_input: String,
    configured: Range,
    range: Range,
    attempts: u32,
    message: String,
    error_message: String,
    status: String,
}

impl GameView {
    fn new() -> Self {
        Self {
            state: TuiState::EnteringGuess,
            history: Vec::new(),
            current_input: String::new(),
            range_min_input: String::new(),
            range_max_input: String::new(),
            configured: Range::default(),
            range: Range::default(),
            attempts: 0,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        }
    }

    /// State to go back to after leaving range entry.
    fn resume_state(&self) -> TuiState {
        if self.history.last().is_some_and(|row| row.mark == GuessMark::Correct) {
            TuiState::GameOver
        } else {
            TuiState::EnteringGuess
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        if key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL) {
            debug_log!("handle_key() - Ignoring key with modifier: {:?}", key.modifiers);
            return None;
        }
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_key() - Ignoring invalid character: {:?}", c);
            return None;
        }

        match self.state {
            TuiState::EnteringGuess => self.handle_guess_key(key),
            TuiState::EnteringRange { field } => self.handle_range_key(key, field),
            TuiState::GameOver => self.handle_game_over_key(key),
        }
    }

    fn handle_guess_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.current_input.len() < MAX_INPUT_DIGITS {
                    self.current_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.current_input.pop();
            }
            KeyCode::Enter if !self.current_input.is_empty() => {
                let guess = std::mem::take(&mut self.current_input);
                info_log!("handle_guess_key() - Submitting guess '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            KeyCode::Enter => {
                self.error_message = "Type a number first!".to_string();
            }
            KeyCode::Char('n' | 'N') => return Some(UserAction::NewGame),
            KeyCode::Char('r' | 'R') => self.begin_range_entry(),
            KeyCode::Esc => return Some(UserAction::Exit),
            KeyCode::Char(c) => {
                self.error_message = format!("Only digits are allowed! ('{c}' is not a digit)");
            }
            _ => {
                debug_log!("handle_guess_key() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn handle_range_key(&mut self, key: KeyEvent, field: RangeField) -> Option<UserAction> {
        self.error_message.clear();
        let buffer = match field {
            RangeField::Min => &mut self.range_min_input,
            RangeField::Max => &mut self.range_max_input,
        };

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if buffer.len() < MAX_INPUT_DIGITS {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if buffer.pop().is_none() && field == RangeField::Max {
                    self.state = TuiState::EnteringRange {
                        field: RangeField::Min,
                    };
                }
            }
            KeyCode::Enter | KeyCode::Tab if field == RangeField::Min => {
                self.state = TuiState::EnteringRange {
                    field: RangeField::Max,
                };
            }
            KeyCode::Enter => {
                self.state = self.resume_state();
                let min = std::mem::take(&mut self.range_min_input);
                let max = std::mem::take(&mut self.range_max_input);
                return Some(UserAction::SetRange(min, max));
            }
            KeyCode::Esc => {
                self.range_min_input.clear();
                self.range_max_input.clear();
                self.state = self.resume_state();
                self.status = "Range change cancelled".to_string();
            }
            KeyCode::Char(c) => {
                self.error_message = format!("Only digits are allowed! ('{c}' is not a digit)");
            }
            _ => {}
        }
        None
    }

    fn handle_game_over_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') => Some(UserAction::NewGame),
            KeyCode::Char('r' | 'R') => {
                self.begin_range_entry();
                None
            }
            KeyCode::Esc => Some(UserAction::Exit),
            _ => None,
        }
    }

    fn begin_range_entry(&mut self) {
        self.current_input.clear();
        self.range_min_input.clear();
        self.range_max_input.clear();
        self.state = TuiState::EnteringRange {
            field: RangeField::Min,
        };
        self.status = "Enter new range: minimum, then maximum".to_string();
    }

    fn reset_for_new_game(&mut self, range: Range) {
        self.history.clear();
        self.current_input.clear();
        self.configured = range;
        self.range = range;
        self.attempts = 0;
        self.state = TuiState::EnteringGuess;
        self.error_message.clear();
    }

    fn record_outcome(&mut self, outcome: &GuessOutcome, attempts: u32) {
        self.history.push(GuessRow::from_outcome(outcome));
        self.range = outcome.range();
        self.attempts = attempts;
        self.message = outcome.to_string();
        if outcome.is_correct() {
            self.state = TuiState::GameOver;
            self.status = format!("Game Over - solved in {attempts} attempts");
        } else {
            self.status = format!("{} candidates left", self.range.span());
        }
    }
}

/// Main TUI interface component.
///
/// Manages terminal rendering and input, and implements `GameInterface`.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    view: GameView,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            view: GameView::new(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let view = &self.view;
        self.terminal.draw(|f| render(f, view))?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            // Only Press events; Release and Repeat would double the input
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                debug_log!("handle_input() - Key: {:?} in {:?}", key.code, self.view.state);
                Ok(self.view.handle_key(key))
            }
            other => {
                debug_log!("handle_input() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

fn render(f: &mut Frame, view: &GameView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Range gauge
            Constraint::Min(6),    // Guess history
            Constraint::Length(5), // Input + messages
            Constraint::Length(3), // Status line
            Constraint::Length(3), // Instructions
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_range(f, chunks[1], view);
    render_history(f, chunks[2], &view.history);
    render_info(f, chunks[3], view);
    render_status(f, chunks[4], &view.status);
    render_instructions(f, chunks[5], view.state);
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("NUMBER GUESSING GAME")
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_range(f: &mut Frame, area: Rect, view: &GameView) {
    let ratio = f64::from(view.range.span()) / f64::from(view.configured.span());
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!("Candidates (configured {})", view.configured))
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "{} - {}  ({} left, attempts: {})",
            view.range.min(),
            view.range.max(),
            view.range.span(),
            view.attempts
        ));
    f.render_widget(gauge, area);
}

fn render_history(f: &mut Frame, area: Rect, history: &[GuessRow]) {
    let skip = history.len().saturating_sub(MAX_HISTORY_DISPLAY);
    let lines: Vec<Line> = history
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, row)| {
            let (bg, fg) = row.mark.colors();
            Line::from(vec![
                Span::raw(format!("  {:>2}. ", i + 1)),
                Span::styled(format!(" {:>4} ", row.value), Style::default().fg(fg).bg(bg)),
                Span::raw(format!("  {}", row.mark.label())),
                Span::styled(
                    format!("   now {}", row.range_after),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().title("Guesses").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_info(f: &mut Frame, area: Rect, view: &GameView) {
    let mut lines = Vec::new();

    match view.state {
        TuiState::EnteringGuess => lines.push(Line::from(vec![
            Span::styled("Your guess: ", HEADER_STYLE),
            Span::raw(format!("{}_", view.current_input)),
        ])),
        TuiState::EnteringRange { field } => {
            let (min_marker, max_marker) = match field {
                RangeField::Min => ("_", ""),
                RangeField::Max => ("", "_"),
            };
            lines.push(Line::from(vec![
                Span::styled("New range: ", HEADER_STYLE),
                Span::raw(format!(
                    "min {}{}  max {}{}",
                    view.range_min_input, min_marker, view.range_max_input, max_marker
                )),
            ]));
        }
        TuiState::GameOver => {}
    }

    if !view.message.is_empty() {
        let style = if view.state == TuiState::GameOver {
            SUCCESS_STYLE
        } else {
            MESSAGE_STYLE
        };
        lines.push(Line::from(vec![Span::styled(view.message.as_str(), style)]));
    }
    if !view.error_message.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            view.error_message.as_str(),
            ERROR_STYLE,
        )]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Information").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, area: Rect, status: &str) {
    let status_text = if status.is_empty() { "Ready" } else { status };
    let paragraph = Paragraph::new(status_text)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
    let text = match state {
        TuiState::EnteringGuess => "Type a number | ENTER: Guess | N: New game | R: Set range | ESC: Quit",
        TuiState::EnteringRange { .. } => "Digits | ENTER/TAB: Next field | ENTER on max: Apply | ESC: Cancel",
        TuiState::GameOver => "N: New Game | R: Set range | ESC: Quit",
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

impl GameInterface for TuiInterface {
    fn display_new_game(&mut self, range: Range) {
        self.view.reset_for_new_game(range);
        self.view.message = format!(
            "I'm thinking of a number between {} and {}. Can you guess it?",
            range.min(),
            range.max()
        );
        self.view.status = "New game - enter your first guess".to_string();
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Input error: {}, returning Exit", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_outcome(&mut self, outcome: &GuessOutcome, attempts: u32) {
        self.view.record_outcome(outcome, attempts);
        self.draw_or_log();
    }

    fn display_guess_error(&mut self, error: &GuessError) {
        self.view.error_message = error.to_string();
        self.draw_or_log();
    }

    fn display_range_set(&mut self, range: Range) {
        self.view.reset_for_new_game(range);
        self.view.message = format!("Range set to {range}. New game started!");
        self.view.status = "New game - enter your first guess".to_string();
        self.draw_or_log();
    }

    fn display_range_error(&mut self, error: &RangeError) {
        self.view.error_message = format!("Invalid range: {error}");
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.view.message = "Exiting...".to_string();
        self.view.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
