// Logger setup plus conditional logging macros that are only active in debug builds

use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "guessing-game.log";

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

/// Where log records go once the logger is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    File(PathBuf),
}

/// Default log file location: `<data dir>/guessing-game/guessing-game.log`.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("guessing-game").join(LOG_FILE_NAME))
}

/// Installs the global `env_logger` backend. `RUST_LOG` overrides the `info` default.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(destination: &LogDestination) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let LogDestination::File(path) = destination {
        builder.target(Target::Pipe(Box::new(open_log_file(path)?)));
    }

    // Only fails if a logger is already installed.
    let _ = builder.try_init();
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::options().create(true).append(true).open(path)
}
