#![deny(missing_docs)]
//! Shared logging utilities for the campaign workspace.
//!
//! This crate provides the `campaign_*` logging macros used across the
//! codebase, the per-source message prefix, and the initializers for the
//! global logger (application and tests).

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::{Level, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[doc(hidden)]
pub use log;

thread_local! {
    /// Source currently being handled on this thread, if any.
    static CURRENT_SOURCE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sets the source label prefixed to every message logged on this thread.
/// Pass `None` once the source has been handled.
pub fn set_current_source(source: Option<&str>) {
    CURRENT_SOURCE.with(|cell| *cell.borrow_mut() = source.map(str::to_owned));
}

/// Returns the source label of the current thread, if one is set.
pub fn current_source() -> Option<String> {
    CURRENT_SOURCE.with(|cell| cell.borrow().clone())
}

/// Emits a record through the `log` facade, prefixed with the current source.
///
/// Used by the `campaign_*` macros; call the macros instead.
#[doc(hidden)]
pub fn emit(level: Level, target: &str, args: fmt::Arguments<'_>) {
    CURRENT_SOURCE.with(|cell| match cell.borrow().as_deref() {
        Some(source) => log::log!(target: target, level, "[{source}] {args}"),
        None => log::log!(target: target, level, "{args}"),
    });
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! campaign_trace {
    ($($arg:tt)*) => {{
        $crate::emit($crate::log::Level::Trace, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! campaign_debug {
    ($($arg:tt)*) => {{
        $crate::emit($crate::log::Level::Debug, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! campaign_info {
    ($($arg:tt)*) => {{
        $crate::emit($crate::log::Level::Info, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! campaign_warn {
    ($($arg:tt)*) => {{
        $crate::emit($crate::log::Level::Warn, module_path!(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! campaign_error {
    ($($arg:tt)*) => {{
        $crate::emit($crate::log::Level::Error, module_path!(), format_args!($($arg)*));
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file.
    File(PathBuf),
    /// Write to terminal (stdout/stderr).
    Terminal,
    /// Write to both the given file and the terminal.
    Both(PathBuf),
}

/// Initialize the global logger with the specified destination and level.
///
/// A log file that cannot be created is reported on stderr and skipped; the
/// terminal logger (if requested) is still installed.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File(path) => match create_file_logger(&path, level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::Both(path) => {
            let mut loggers = vec![terminal_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(&path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
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

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<dyn SharedLogger>> {
    match File::create(path) {
        Ok(file) => {
            let logger: Box<dyn SharedLogger> = WriteLogger::new(level, config, file);
            Some(logger)
        }
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
