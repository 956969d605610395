// Library interface for guessing-game
// This allows integration tests to access internal modules

pub mod chat;
pub mod cli;
pub mod engine;
pub mod error;
pub mod game_state;
pub mod input;
pub mod logging;
pub mod range;
pub mod timer;
pub mod tui;

// Re-export commonly used items for easier testing
pub use engine::{FixedTarget, GuessOutcome, GuessingGame, RandomTarget, TargetSource};
pub use error::{GuessError, RangeError, TimerError};
pub use game_state::{GameInterface, UserAction, game_loop};
pub use range::{DEFAULT_RANGE, HIGHEST, LOWEST, Range};
pub use timer::Countdown;
