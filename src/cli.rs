use crate::chat::{self, Intent};
use crate::engine::{GuessOutcome, GuessingGame, TargetSource};
use crate::error::{GuessError, RangeError};
use crate::game_state::{GameInterface, UserAction, game_loop};
use crate::info_log;
use crate::input::InputChannel;
use crate::range::Range;
use crate::timer::{self, Countdown};
use chrono::Local;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::{Duration, Instant};

/// Chat bot with a countdown timer and a number guessing game
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Lowest number the game may pick
    #[arg(long, default_value_t = 1)]
    pub min: i64,

    /// Highest number the game may pick
    #[arg(long, default_value_t = 100)]
    pub max: i64,

    /// Seed for the number picker, for reproducible games
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Play the guessing game in a full-screen terminal UI
    #[arg(long)]
    pub tui: bool,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

/// Reads one trimmed line. `None` at end of input or on a read error.
fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input.trim().to_string()),
        Err(e) => {
            info_log!("Failed to read input: {}", e);
            None
        }
    }
}

/// Maps one line typed during a game onto an action.
fn parse_game_command(input: &str) -> Option<UserAction> {
    let mut words = input.split_whitespace();
    let first = words.next().unwrap_or_default().to_lowercase();
    match first.as_str() {
        "exit" | "quit" | "back" => Some(UserAction::Exit),
        "new" | "next" => Some(UserAction::NewGame),
        "range" => match (words.next(), words.next(), words.next()) {
            (Some(min), Some(max), None) => {
                Some(UserAction::SetRange(min.to_string(), max.to_string()))
            }
            _ => None,
        },
        _ => Some(UserAction::Guess(input.to_string())),
    }
}

pub fn read_action<R: BufRead>(reader: &mut R, range: Range) -> Option<UserAction> {
    println!(
        "\nEnter a number ({}-{}), 'new' for a new game, 'range <min> <max>', or 'exit':",
        range.min(),
        range.max()
    );
    let Some(input) = read_trimmed_line(reader) else {
        return Some(UserAction::Exit);
    };
    let action = parse_game_command(&input);
    if action.is_none() {
        println!("Usage: range <min> <max>");
    }
    action
}

pub fn display_new_game(range: Range) {
    println!("{}", chat::game_intro(range));
}

/// Lines shown after a guess. A win is also announced in the chat.
fn outcome_lines(outcome: &GuessOutcome, attempts: u32) -> Vec<String> {
    let mut lines = vec![outcome.to_string(), format!("Attempts: {attempts}")];
    if let Some(announcement) = chat::win_announcement(outcome) {
        lines.push(announcement);
        lines.push("Type 'new' to play again or 'exit' to go back to the chat.".to_string());
    }
    lines
}

pub fn display_outcome(outcome: &GuessOutcome, attempts: u32) {
    for line in outcome_lines(outcome, attempts) {
        println!("{line}");
    }
}

pub fn display_guess_error(error: &GuessError) {
    match error {
        GuessError::InvalidGuess { range, .. } => println!(
            "Please enter a valid number between {} and {}!",
            range.min(),
            range.max()
        ),
        GuessError::GameNotActive => println!("This game is over. Type 'new' to play again."),
    }
}

pub fn display_range_set(range: Range) {
    println!("Range set to {range}. New game started!");
}

pub fn display_range_error(error: &RangeError) {
    println!("Invalid range: {error}.");
}

pub fn display_exit_message() {
    println!("Leaving the game.");
}

/// CLI implementation of the `GameInterface` trait.
/// Wraps a `BufRead` reader; end of input counts as leaving the game.
pub struct CliInterface<R: BufRead> {
    reader: R,
    range: Range,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            range: Range::default(),
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_new_game(&mut self, range: Range) {
        self.range = range;
        display_new_game(range);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        read_action(&mut self.reader, self.range)
    }

    fn display_outcome(&mut self, outcome: &GuessOutcome, attempts: u32) {
        self.range = outcome.range();
        display_outcome(outcome, attempts);
    }

    fn display_guess_error(&mut self, error: &GuessError) {
        display_guess_error(error);
    }

    fn display_range_set(&mut self, range: Range) {
        self.range = range;
        display_range_set(range);
    }

    fn display_range_error(&mut self, error: &RangeError) {
        display_range_error(error);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

/// Prompts for `hours minutes seconds` and builds a countdown from them.
fn read_countdown<R: BufRead>(reader: &mut R) -> Option<Countdown> {
    println!("Enter time as hours, minutes and seconds (e.g. '0 1 30'):");
    let input = read_trimmed_line(reader)?;
    let mut parts = input.split_whitespace();
    let hours = parts.next().unwrap_or_default();
    let minutes = parts.next().unwrap_or_default();
    let seconds = parts.next().unwrap_or_default();

    match Countdown::from_parts(hours, minutes, seconds) {
        Ok(countdown) => Some(countdown),
        Err(e) => {
            println!("Please enter a valid time: {e}.");
            None
        }
    }
}

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEnd {
    Completed,
    /// Cancelled with this many seconds still to go.
    Stopped { remaining: u64 },
}

fn is_stop(line: &str) -> bool {
    line.eq_ignore_ascii_case("stop")
}

/// Waits out one tick, taking at most one line of input meanwhile.
/// Returns `true` if that line was `stop`.
fn wait_tick(input: &mut InputChannel, tick: Duration, input_open: &mut bool) -> bool {
    let deadline = Instant::now() + tick;
    if *input_open {
        match input.line_within(tick) {
            Ok(line) if is_stop(&line) => return true,
            Ok(line) => {
                if !line.is_empty() {
                    println!("Timer running. Type 'stop' to cancel it.");
                }
            }
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => *input_open = false,
        }
    }
    thread::sleep(deadline.saturating_duration_since(Instant::now()));
    false
}

/// Runs the countdown in the foreground, printing the clock once per tick.
/// Typing `stop` cancels it.
pub fn run_countdown(mut countdown: Countdown, tick: Duration, input: &mut InputChannel) -> CountdownEnd {
    println!("Timer set for {}", timer::describe_set(countdown.total()));
    println!("Type 'stop' to cancel it.");
    info_log!("Countdown started: {}s", countdown.total());
    println!("{}", timer::format_clock(countdown.remaining()));

    let mut input_open = true;
    loop {
        if wait_tick(input, tick, &mut input_open) {
            let remaining = countdown.remaining();
            info_log!("Countdown stopped with {}s left", remaining);
            println!(
                "Timer stopped with {} remaining",
                timer::describe_remaining(remaining)
            );
            return CountdownEnd::Stopped { remaining };
        }
        let finished = countdown.tick();
        println!("{}", timer::format_clock(countdown.remaining()));
        if finished {
            break;
        }
    }
    println!("Timer completed! Time's up!");
    CountdownEnd::Completed
}

/// Line-oriented chat. Returns every game won during the conversation.
pub fn chat_loop<S>(mut input: InputChannel, game: &mut GuessingGame<S>, tick: Duration) -> Vec<GuessOutcome>
where
    S: TargetSource,
{
    let mut wins = Vec::new();
    println!("{}", chat::GREETING);

    loop {
        println!("\nYou:");
        let Some(line) = read_trimmed_line(&mut input) else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        match chat::classify(&line) {
            Intent::Exit => {
                println!("Goodbye!");
                break;
            }
            Intent::Time => println!("{}", chat::current_time_reply(&Local::now())),
            Intent::Timer => {
                if let Some(countdown) = read_countdown(&mut input) {
                    run_countdown(countdown, tick, &mut input);
                }
            }
            Intent::Game => {
                let mut interface = CliInterface::new(&mut input);
                wins.extend(game_loop(game, &mut interface));
            }
            intent @ (Intent::Canned(_) | Intent::Unknown) => {
                if let Some(reply) = intent.reply() {
                    println!("{reply}");
                }
            }
        }
    }

    wins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FixedTarget;
    use std::io::Cursor;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["guessing-game"]);
        assert_eq!(cli.min, 1);
        assert_eq!(cli.max, 100);
        assert_eq!(cli.seed, None);
        assert!(!cli.tui);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::parse_from([
            "guessing-game",
            "--min",
            "5",
            "--max",
            "50",
            "-s",
            "9",
            "--tui",
            "--log-file",
            "/tmp/game.log",
        ]);
        assert_eq!(cli.min, 5);
        assert_eq!(cli.max, 50);
        assert_eq!(cli.seed, Some(9));
        assert!(cli.tui);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/game.log")));
    }

    #[test]
    fn test_parse_game_command() {
        assert_eq!(parse_game_command("exit"), Some(UserAction::Exit));
        assert_eq!(parse_game_command("BACK"), Some(UserAction::Exit));
        assert_eq!(parse_game_command("new"), Some(UserAction::NewGame));
        assert_eq!(
            parse_game_command("range 5 20"),
            Some(UserAction::SetRange("5".into(), "20".into()))
        );
        assert_eq!(parse_game_command("range 5"), None);
        assert_eq!(parse_game_command("range 1 2 3"), None);
        assert_eq!(
            parse_game_command("42"),
            Some(UserAction::Guess("42".into()))
        );
        assert_eq!(
            parse_game_command("forty"),
            Some(UserAction::Guess("forty".into()))
        );
    }

    #[test]
    fn test_read_action_end_of_input_exits() {
        let mut reader = Cursor::new("");
        assert_eq!(
            read_action(&mut reader, Range::default()),
            Some(UserAction::Exit)
        );
    }

    #[test]
    fn test_read_action_trims_input() {
        let mut reader = Cursor::new("  17  \n");
        assert_eq!(
            read_action(&mut reader, Range::default()),
            Some(UserAction::Guess("17".into()))
        );
    }

    #[test]
    fn test_read_countdown() {
        let mut reader = Cursor::new("0 1 30\n");
        assert_eq!(read_countdown(&mut reader).unwrap().total(), 90);

        let mut reader = Cursor::new("0 0 0\n");
        assert!(read_countdown(&mut reader).is_none());

        let mut reader = Cursor::new("\n");
        assert!(read_countdown(&mut reader).is_none());
    }

    #[test]
    fn test_cli_interface_plays_a_game() {
        let mut game = GuessingGame::new(FixedTarget(7));
        let mut interface = CliInterface::new(Cursor::new("range 1 10\n5\n9\n7\n"));
        let wins = game_loop(&mut game, &mut interface);
        assert_eq!(wins.len(), 1);
        assert_eq!(interface.range, Range::new(6, 8).unwrap());
    }

    #[test]
    fn test_win_is_announced_with_the_outcome() {
        let mut game = GuessingGame::new(FixedTarget(7));
        game.configure_range(1, 10).unwrap();

        let miss = game.guess("5").unwrap();
        let lines = outcome_lines(&miss, 1);
        assert_eq!(lines, vec!["Too low! Try between 6 and 10.", "Attempts: 1"]);

        let win = game.guess("7").unwrap();
        let lines = outcome_lines(&win, 2);
        assert_eq!(
            lines[2],
            "I won the guess game in 2 attempts! The number was 7 (range: 6-10)."
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_countdown_runs_to_completion() {
        let countdown = Countdown::new(3).unwrap();
        let mut input = InputChannel::preloaded("");
        assert_eq!(
            run_countdown(countdown, Duration::ZERO, &mut input),
            CountdownEnd::Completed
        );
    }

    #[test]
    fn test_countdown_stops_mid_way() {
        let countdown = Countdown::new(5).unwrap();
        // Each line typed while the timer runs takes up one tick
        let mut input = InputChannel::preloaded("hello\n\nSTOP\nafter\n");
        assert_eq!(
            run_countdown(countdown, Duration::ZERO, &mut input),
            CountdownEnd::Stopped { remaining: 3 }
        );
        assert_eq!(input.line_within(Duration::ZERO), Ok("after".to_string()));
    }

    #[test]
    fn test_countdown_ignores_lines_after_it_finishes() {
        let countdown = Countdown::new(2).unwrap();
        let mut input = InputChannel::preloaded("a\nb\nstop\n");
        assert_eq!(
            run_countdown(countdown, Duration::ZERO, &mut input),
            CountdownEnd::Completed
        );
        assert_eq!(input.line_within(Duration::ZERO), Ok("stop".to_string()));
    }

    #[test]
    fn test_chat_loop_exit() {
        let mut game = GuessingGame::new(FixedTarget(7));
        let wins = chat_loop(InputChannel::preloaded("hello\nexit\n"), &mut game, Duration::ZERO);
        assert!(wins.is_empty());
    }

    #[test]
    fn test_chat_loop_game_then_back_to_chat() {
        let mut game = GuessingGame::new(FixedTarget(30));
        let input = "let's play a game\n50\n30\nback\nthanks\nexit\n";
        let wins = chat_loop(InputChannel::preloaded(input), &mut game, Duration::ZERO);
        assert_eq!(
            wins,
            vec![GuessOutcome::Correct {
                target: 30,
                attempts: 2,
                range: Range::new(1, 49).unwrap()
            }]
        );
    }

    #[test]
    fn test_chat_loop_runs_timer_to_the_end() {
        let mut game = GuessingGame::new(FixedTarget(1));
        let input = "set a timer\n0 0 3\n";
        let wins = chat_loop(InputChannel::preloaded(input), &mut game, Duration::ZERO);
        assert!(wins.is_empty());
    }

    #[test]
    fn test_chat_loop_stop_ends_timer_early() {
        let mut game = GuessingGame::new(FixedTarget(3));
        // Without `stop` the five-second timer would swallow every line up
        // to the first `exit` and no game would be played.
        let input = "timer\n0 0 5\nhello\nstop\ngame\n3\nexit\nexit\n";
        let wins = chat_loop(InputChannel::preloaded(input), &mut game, Duration::ZERO);
        assert_eq!(wins.len(), 1);
        assert!(wins[0].is_correct());
        assert_eq!(game.attempts(), 1);
    }
}
