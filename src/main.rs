use guessing_game::cli::{Cli, chat_loop, parse_cli};
use guessing_game::engine::{GuessingGame, RandomTarget};
use guessing_game::input::InputChannel;
use guessing_game::logging::{self, LogDestination};
use guessing_game::tui::TuiInterface;
use guessing_game::{chat, game_loop};
use std::error::Error;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = parse_cli();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    logging::init(&log_destination(cli))?;

    let source = match cli.seed {
        Some(seed) => RandomTarget::seeded(seed),
        None => RandomTarget::from_entropy(),
    };
    let mut game = GuessingGame::new(source);
    game.configure_range(cli.min, cli.max)?;
    log::info!("Starting with range {}", game.range());

    if cli.tui {
        let wins = {
            let mut tui = TuiInterface::new()?;
            game_loop(&mut game, &mut tui)
        };
        // Terminal is restored once the interface is dropped.
        for win in &wins {
            if let Some(line) = chat::win_announcement(win) {
                println!("{line}");
            }
        }
    } else {
        let input = InputChannel::spawn(io::BufReader::new(io::stdin()));
        chat_loop(input, &mut game, Duration::from_secs(1));
    }
    Ok(())
}

/// The TUI owns the screen, so its logs go to a file unless told otherwise.
fn log_destination(cli: &Cli) -> LogDestination {
    match &cli.log_file {
        Some(path) => LogDestination::File(path.clone()),
        None if cli.tui => LogDestination::File(
            logging::default_log_path()
                .unwrap_or_else(|| std::env::temp_dir().join("guessing-game.log")),
        ),
        None => LogDestination::Stderr,
    }
}
