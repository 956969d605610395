use crate::range::Range;
use thiserror::Error;

/// Rejected bounds passed to `GuessingGame::configure_range`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("minimum {min} must be less than maximum {max}")]
    NotAscending { min: i64, max: i64 },

    #[error("bounds {min}-{max} must lie between {floor} and {ceiling}")]
    OutOfBounds {
        min: i64,
        max: i64,
        floor: u32,
        ceiling: u32,
    },
}

/// Rejected guess. Neither variant mutates the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("'{input}' is not a number between {} and {}", .range.min(), .range.max())]
    InvalidGuess { input: String, range: Range },

    #[error("no game in progress, start a new one first")]
    GameNotActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer needs at least 1 second")]
    Empty,

    #[error("timer cannot be set for more than {max_hours} hours")]
    TooLong { max_hours: u64 },
}
