//! Number guessing engine with adaptive range narrowing.
//!
//! Every wrong guess shrinks the candidate interval: a low guess raises the
//! lower bound to just above it, a high guess lowers the upper bound to just
//! below it. The target never leaves the interval, so the game always ends.

use crate::error::{GuessError, RangeError};
use crate::range::Range;
use crate::{debug_log, info_log};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Strategy for picking the number to be guessed.
pub trait TargetSource {
    /// Returns a value within `range`, bounds included.
    fn draw(&mut self, range: Range) -> u32;
}

/// Uniform draw from a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomTarget<R: Rng = StdRng> {
    rng: R,
}

impl RandomTarget<StdRng> {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomTarget<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TargetSource for RandomTarget<R> {
    fn draw(&mut self, range: Range) -> u32 {
        self.rng.random_range(range.min()..=range.max())
    }
}

/// Always picks the same number, clamped into whatever range is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTarget(pub u32);

impl TargetSource for FixedTarget {
    fn draw(&mut self, range: Range) -> u32 {
        self.0.clamp(range.min(), range.max())
    }
}

/// Result of a guess that was accepted and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess was below the target; `range` is the narrowed interval.
    TooLow { range: Range },
    /// The guess was above the target; `range` is the narrowed interval.
    TooHigh { range: Range },
    /// The game is won. `range` is the interval as it stood when the winning guess was made.
    Correct {
        target: u32,
        attempts: u32,
        range: Range,
    },
}

impl GuessOutcome {
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::TooLow { range } | Self::TooHigh { range } | Self::Correct { range, .. } => {
                *range
            }
        }
    }

    /// The guess that produced this outcome, recovered from the narrowed bound.
    #[must_use]
    pub const fn guessed(&self) -> u32 {
        match self {
            Self::TooLow { range } => range.min() - 1,
            Self::TooHigh { range } => range.max() + 1,
            Self::Correct { target, .. } => *target,
        }
    }
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLow { range } => write!(
                f,
                "Too low! Try between {} and {}.",
                range.min(),
                range.max()
            ),
            Self::TooHigh { range } => write!(
                f,
                "Too high! Try between {} and {}.",
                range.min(),
                range.max()
            ),
            Self::Correct {
                target, attempts, ..
            } => write!(
                f,
                "Correct! The number was {target}, found in {attempts} attempt{}.",
                if *attempts == 1 { "" } else { "s" }
            ),
        }
    }
}

/// One session's game. Owned by the caller, never shared.
#[derive(Debug)]
pub struct GuessingGame<S: TargetSource = RandomTarget> {
    source: S,
    configured: Range,
    range: Range,
    target: u32,
    attempts: u32,
    active: bool,
}

impl<S: TargetSource> GuessingGame<S> {
    /// Creates a game over the default range and starts it immediately.
    pub fn new(source: S) -> Self {
        Self::with_range(source, Range::default())
    }

    pub fn with_range(source: S, range: Range) -> Self {
        let mut game = Self {
            source,
            configured: range,
            range,
            target: range.min(),
            attempts: 0,
            active: false,
        };
        game.start();
        game
    }

    /// Replaces the configured bounds and starts a new game over them.
    ///
    /// An in-progress game is discarded without confirmation. On error the
    /// game is left exactly as it was.
    pub fn configure_range(&mut self, min: i64, max: i64) -> Result<Range, RangeError> {
        let range = Range::new(min, max)?;
        Ok(self.apply_range(range))
    }

    /// Same as [`configure_range`](Self::configure_range) for raw text input.
    pub fn configure_range_str(&mut self, min: &str, max: &str) -> Result<Range, RangeError> {
        let range = Range::parse(min, max)?;
        Ok(self.apply_range(range))
    }

    fn apply_range(&mut self, range: Range) -> Range {
        info_log!("Range configured: {}", range);
        self.configured = range;
        self.start()
    }

    /// Starts a fresh game over the configured bounds and returns them.
    pub fn start(&mut self) -> Range {
        self.range = self.configured;
        self.target = self.source.draw(self.range);
        debug_assert!(self.range.contains(i64::from(self.target)));
        self.attempts = 0;
        self.active = true;
        info_log!("New game started over {}", self.range);
        debug_log!("Target for this game: {}", self.target);
        self.range
    }

    /// Submits raw user input as a guess.
    pub fn guess(&mut self, input: &str) -> Result<GuessOutcome, GuessError> {
        if !self.active {
            return Err(GuessError::GameNotActive);
        }
        let trimmed = input.trim();
        let value = trimmed.parse::<i64>().map_err(|_| GuessError::InvalidGuess {
            input: trimmed.to_string(),
            range: self.range,
        })?;
        self.guess_value(value)
    }

    pub fn guess_value(&mut self, value: i64) -> Result<GuessOutcome, GuessError> {
        if !self.active {
            return Err(GuessError::GameNotActive);
        }
        if !self.range.contains(value) {
            debug_log!("Rejected guess {} outside {}", value, self.range);
            return Err(GuessError::InvalidGuess {
                input: value.to_string(),
                range: self.range,
            });
        }
        // In range, so it fits in u32.
        let value = value as u32;
        self.attempts += 1;

        let outcome = match value.cmp(&self.target) {
            std::cmp::Ordering::Equal => {
                self.active = false;
                GuessOutcome::Correct {
                    target: self.target,
                    attempts: self.attempts,
                    range: self.range,
                }
            }
            std::cmp::Ordering::Less => {
                self.range = self.range.above(value);
                GuessOutcome::TooLow { range: self.range }
            }
            std::cmp::Ordering::Greater => {
                self.range = self.range.below(value);
                GuessOutcome::TooHigh { range: self.range }
            }
        };
        debug_log!("Guess {} -> {:?}", value, outcome);
        Ok(outcome)
    }

    /// The current, possibly narrowed, candidate interval.
    #[must_use]
    pub const fn range(&self) -> Range {
        self.range
    }

    /// Bounds the next [`start`](Self::start) will use.
    #[must_use]
    pub const fn configured_range(&self) -> Range {
        self.configured
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}
