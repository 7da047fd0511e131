#![deny(missing_docs)]
//! Shared logging utilities for the mini-sct monitor workspace.
//!
//! This crate provides the `sct_*` logging macros used across the codebase,
//! a per-thread delivery turn counter, and initializers for the global
//! logger (tests and the monitor binary).

use std::cell::Cell;
use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

thread_local! {
    /// Thread-local storage for the current reconciliation turn.
    static TURN: Cell<u64> = const { Cell::new(0) };
}

/// Sets the reconciliation turn for the current thread.
/// The session loop bumps this once per reconciled message.
pub fn set_turn(turn: u64) {
    TURN.with(|v| v.set(turn));
}

/// Retrieves the reconciliation turn for the current thread.
/// Returns 0 if no turn has been recorded yet.
pub fn get_turn() -> u64 {
    TURN.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current turn.
#[macro_export]
macro_rules! sct_trace {
    ($($arg:tt)*) => {{
        log::trace!("[turn {}] {}", $crate::get_turn(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current turn.
#[macro_export]
macro_rules! sct_debug {
    ($($arg:tt)*) => {{
        log::debug!("[turn {}] {}", $crate::get_turn(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current turn.
#[macro_export]
macro_rules! sct_info {
    ($($arg:tt)*) => {{
        log::info!("[turn {}] {}", $crate::get_turn(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current turn.
#[macro_export]
macro_rules! sct_warn {
    ($($arg:tt)*) => {{
        log::warn!("[turn {}] {}", $crate::get_turn(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current turn.
#[macro_export]
macro_rules! sct_error {
    ($($arg:tt)*) => {{
        log::error!("[turn {}] {}", $crate::get_turn(), format_args!($($arg)*));
    }};
}

/// Destination for log output of the monitor binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given log file only.
    File,
    /// Write to the terminal (stderr for warnings, stdout otherwise).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initializes the global logger for the monitor binary.
///
/// For `LogDestination::File` or `Both`, `log_path` is created (truncated).
/// If the file cannot be created the file sink is skipped with a warning on
/// stderr. A second call is ignored.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        match File::create(log_path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => {
                eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            }
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

/// Parses a textual level (`"info"`, `"DEBUG"`, ...) into a filter.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_is_per_thread() {
        set_turn(7);
        assert_eq!(get_turn(), 7);
        let other = std::thread::spawn(get_turn).join().unwrap();
        assert_eq!(other, 0);
    }

    #[test]
    fn parse_level_falls_back_to_info() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }
}
