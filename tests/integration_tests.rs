// Integration tests for the guessing-game application
// These tests verify that all modules work together correctly

use guessing_game::chat::{self, Intent};
use guessing_game::cli::{CliInterface, CountdownEnd, chat_loop, run_countdown};
use guessing_game::input::InputChannel;
use guessing_game::*;
use std::io::Cursor;
use std::time::Duration;

#[test]
fn test_end_to_end_game_over_cli() {
    // Configure a range, narrow it down, win, then try one more guess
    let mut game = GuessingGame::new(FixedTarget(7));
    let input = "range 1 10\n5\n9\n7\n3\nexit\n";
    let mut interface = CliInterface::new(Cursor::new(input));

    let wins = game_loop(&mut game, &mut interface);

    assert_eq!(
        wins,
        vec![GuessOutcome::Correct {
            target: 7,
            attempts: 3,
            range: Range::new(6, 8).unwrap(),
        }]
    );
    assert!(!game.is_active());
    assert_eq!(game.attempts(), 3);
}

#[test]
fn test_guess_rejections_leave_state_alone() {
    let mut game = GuessingGame::new(FixedTarget(7));
    game.configure_range(1, 10).unwrap();

    assert!(matches!(
        game.guess("15"),
        Err(GuessError::InvalidGuess { .. })
    ));
    assert!(matches!(
        game.guess("ten"),
        Err(GuessError::InvalidGuess { .. })
    ));
    assert_eq!(game.attempts(), 0);
    assert_eq!(game.range(), Range::new(1, 10).unwrap());

    assert!(game.guess("7").unwrap().is_correct());
    assert_eq!(game.guess("3"), Err(GuessError::GameNotActive));
    assert_eq!(game.attempts(), 1);
}

#[test]
fn test_bad_range_keeps_running_game() {
    let mut game = GuessingGame::new(FixedTarget(40));
    game.guess("20").unwrap();

    assert_eq!(
        game.configure_range(50, 10),
        Err(RangeError::NotAscending { min: 50, max: 10 })
    );
    assert!(matches!(
        game.configure_range_str("1", "5000"),
        Err(RangeError::OutOfBounds { .. })
    ));

    assert!(game.is_active());
    assert_eq!(game.attempts(), 1);
    assert_eq!(game.range(), Range::new(21, 100).unwrap());
    assert_eq!(game.configured_range(), DEFAULT_RANGE);
}

#[test]
fn test_seeded_games_are_reproducible() {
    let play = |seed: u64| {
        let mut game = GuessingGame::new(RandomTarget::seeded(seed));
        game.configure_range(1, 1000).unwrap();
        let mut trail = Vec::new();
        while game.is_active() {
            let range = game.range();
            let midpoint = (range.min() + range.max()) / 2;
            trail.push(game.guess_value(i64::from(midpoint)).unwrap());
        }
        trail
    };

    assert_eq!(play(99), play(99));
    // floor(log2(1000)) + 1
    assert!(play(99).len() <= 10);
}

#[test]
fn test_every_seeded_target_is_in_range() {
    for seed in 0..100 {
        let mut game = GuessingGame::new(RandomTarget::seeded(seed));
        game.configure_range(LOWEST.into(), HIGHEST.into()).unwrap();

        // Sweeping upward must hit the target before leaving the range.
        let mut found = false;
        for value in LOWEST..=HIGHEST {
            if !game.range().contains(value.into()) {
                continue;
            }
            if game.guess_value(value.into()).unwrap().is_correct() {
                found = true;
                break;
            }
        }
        assert!(found, "seed {seed} never produced a win");
    }
}

#[test]
fn test_custom_target_source() {
    // Always picks the upper bound
    struct Ceiling;

    impl TargetSource for Ceiling {
        fn draw(&mut self, range: Range) -> u32 {
            range.max()
        }
    }

    let mut game = GuessingGame::new(Ceiling);
    game.configure_range(10, 20).unwrap();
    let outcome = game.guess("19").unwrap();
    assert!(matches!(outcome, GuessOutcome::TooLow { .. }));
    // Narrowed down to a single candidate
    assert_eq!(outcome.range(), game.range());
    assert_eq!(game.range().span(), 1);
    assert_eq!(game.range().min(), 20);
    assert_eq!(game.range().max(), 20);
    assert!(game.guess("20").unwrap().is_correct());
}

#[test]
fn test_chat_session_with_all_skills() {
    let mut game = GuessingGame::new(FixedTarget(64));
    let input = "hi\n\
                 what time is it\n\
                 timer\n0 0 2\nstop\n\
                 play a game\n50\n75\n64\nnew\nback\n\
                 guess again\nrange 60 70\n64\nexit\n\
                 bye\nexit\n";

    let wins = chat_loop(InputChannel::preloaded(input), &mut game, Duration::ZERO);

    assert_eq!(wins.len(), 2);
    assert_eq!(
        wins[0],
        GuessOutcome::Correct {
            target: 64,
            attempts: 3,
            range: Range::new(51, 74).unwrap(),
        }
    );
    assert_eq!(
        wins[1],
        GuessOutcome::Correct {
            target: 64,
            attempts: 1,
            range: Range::new(60, 70).unwrap(),
        }
    );
    assert_eq!(
        chat::win_announcement(&wins[1]).unwrap(),
        "I won the guess game in 1 attempts! The number was 64 (range: 60-70)."
    );
}

#[test]
fn test_chat_session_ends_at_end_of_input() {
    let mut game = GuessingGame::new(FixedTarget(5));
    // Input runs out in the middle of a game
    let wins = chat_loop(InputChannel::preloaded("game\n1\n"), &mut game, Duration::ZERO);
    assert!(wins.is_empty());
    assert_eq!(game.attempts(), 1);
    assert!(game.is_active());
}

#[test]
fn test_chat_routing_matches_skills() {
    assert_eq!(chat::classify("Start a TIMER"), Intent::Timer);
    assert_eq!(chat::classify("time?"), Intent::Time);
    assert_eq!(chat::classify("number guessing"), Intent::Game);
    assert!(matches!(chat::classify("thanks a lot"), Intent::Canned(_)));
    assert_eq!(chat::classify("what's the weather"), Intent::Unknown);
}

#[test]
fn test_timer_countdown_integration() {
    let mut countdown = Countdown::from_parts("0", "1", "5").unwrap();
    assert_eq!(timer::format_clock(countdown.remaining()), "01:05");
    assert_eq!(timer::describe_set(countdown.total()), "1m 5s");

    let mut ticks = 0;
    while !countdown.tick() {
        ticks += 1;
    }
    assert_eq!(ticks, 64);
    assert_eq!(timer::format_clock(countdown.remaining()), "00:00");

    assert_eq!(Countdown::from_parts("25", "0", "0"), Err(TimerError::TooLong { max_hours: 24 }));
}

#[test]
fn test_stop_reports_time_left() {
    let countdown = Countdown::from_parts("1", "0", "2").unwrap();
    assert_eq!(timer::describe_set(countdown.total()), "1h 2s");

    // Two lines go by, one tick each, before `stop`
    let mut input = InputChannel::preloaded("what time is it\nhello\nstop\n");
    let end = run_countdown(countdown, Duration::ZERO, &mut input);
    assert_eq!(end, CountdownEnd::Stopped { remaining: 3600 });
    assert_eq!(timer::describe_remaining(3600), "1h 0s");
}

#[test]
fn test_stop_typed_during_chat_timer() {
    let mut game = GuessingGame::new(FixedTarget(10));
    let input = "please set a timer\n0 2 0\nStop\nguess\nrange 1 20\n10\nexit\nexit\n";
    let wins = chat_loop(InputChannel::preloaded(input), &mut game, Duration::ZERO);
    assert_eq!(wins.len(), 1);
    assert_eq!(game.configured_range(), Range::new(1, 20).unwrap());
}
