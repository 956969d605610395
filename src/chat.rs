//! Keyword routing for the chat prompt.

use crate::engine::GuessOutcome;
use crate::range::Range;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const GREETING: &str = "Hello! I can run a countdown timer, tell you the time, or play a number guessing game.";

const UNKNOWN_REPLY: &str =
    "I'm sorry, I don't understand that. Try asking about the timer, the time, or a game!";

/// Canned replies, checked in order after the skill keywords.
const CANNED_REPLIES: [(&str, &str); 5] = [
    ("hello", "Hello! How can I help you today?"),
    ("hi", "Hi there! What can I do for you?"),
    (
        "help",
        "I can set timers, tell you the time, and play games! Type 'timer', 'time' or 'game'.",
    ),
    ("thanks", "You're welcome!"),
    ("bye", "Goodbye! Have a great day!"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Timer,
    Time,
    Game,
    Exit,
    Canned(&'static str),
    Unknown,
}

impl Intent {
    /// The bot's reply for intents that are answered with fixed text.
    #[must_use]
    pub const fn reply(&self) -> Option<&'static str> {
        match self {
            Self::Canned(reply) => Some(*reply),
            Self::Unknown => Some(UNKNOWN_REPLY),
            _ => None,
        }
    }
}

/// Substring match, case-insensitive. "timer" is checked before "time".
/// `exit` and `quit` only count as the whole input.
#[must_use]
pub fn classify(input: &str) -> Intent {
    let input = input.trim().to_lowercase();

    if input.contains("timer") {
        return Intent::Timer;
    }
    if input.contains("time") {
        return Intent::Time;
    }
    if input.contains("game") || input.contains("guess") {
        return Intent::Game;
    }
    if input == "exit" || input == "quit" {
        return Intent::Exit;
    }

    CANNED_REPLIES
        .iter()
        .find(|(keyword, _)| input.contains(keyword))
        .map_or(Intent::Unknown, |(_, reply)| Intent::Canned(*reply))
}

#[must_use]
pub fn current_time_reply<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("Current time: {}", now.format("%H:%M:%S"))
}

#[must_use]
pub fn game_intro(range: Range) -> String {
    format!(
        "Let's play a guessing game! I'm thinking of a number between {} and {}.",
        range.min(),
        range.max()
    )
}

/// Chat line posted on the player's behalf after a win.
#[must_use]
pub fn win_announcement(outcome: &GuessOutcome) -> Option<String> {
    match outcome {
        GuessOutcome::Correct {
            target,
            attempts,
            range,
        } => Some(format!(
            "I won the guess game in {attempts} attempts! The number was {target} (range: {range})."
        )),
        _ => None,
    }
}
