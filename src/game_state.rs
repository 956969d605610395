use crate::engine::{GuessOutcome, GuessingGame, TargetSource};
use crate::error::{GuessError, RangeError};
use crate::info_log;
use crate::range::Range;

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    NewGame,
    SetRange(String, String),
    Exit,
}

/// Front end driven by [`game_loop`].
///
/// `read_action` returns `None` when the input could not be understood; the
/// implementation is expected to have told the player already.
pub trait GameInterface {
    fn display_new_game(&mut self, range: Range);
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_outcome(&mut self, outcome: &GuessOutcome, attempts: u32);
    fn display_guess_error(&mut self, error: &GuessError);
    fn display_range_set(&mut self, range: Range);
    fn display_range_error(&mut self, error: &RangeError);
    fn display_exit_message(&mut self);
}

/// Runs one game session until the player exits.
///
/// A finished game stays finished until the player asks for a new one or
/// changes the range. Returns every winning outcome, in order.
pub fn game_loop<S, I>(game: &mut GuessingGame<S>, interface: &mut I) -> Vec<GuessOutcome>
where
    S: TargetSource,
    I: GameInterface + ?Sized,
{
    let mut wins = Vec::new();
    if !game.is_active() {
        game.start();
    }
    interface.display_new_game(game.range());

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::NewGame => {
                let range = game.start();
                interface.display_new_game(range);
            }
            UserAction::SetRange(min, max) => match game.configure_range_str(&min, &max) {
                Ok(range) => interface.display_range_set(range),
                Err(e) => {
                    info_log!("Range change rejected: {}", e);
                    interface.display_range_error(&e);
                }
            },
            UserAction::Guess(input) => match game.guess(&input) {
                Ok(outcome) => {
                    interface.display_outcome(&outcome, game.attempts());
                    if outcome.is_correct() {
                        info_log!("Game won: {:?}", outcome);
                        wins.push(outcome);
                    }
                }
                Err(e) => interface.display_guess_error(&e),
            },
        }
    }

    wins
}
