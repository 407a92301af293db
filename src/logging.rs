use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};

// Custom logger structure
#[derive(Debug)]
struct ArenaLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
    // Optional copy of every line, without colour codes
    file: Option<Mutex<File>>,
}

impl ArenaLogger {
    fn topic_enabled(&self, metadata: &Metadata) -> bool {
        match &self.debug_filters {
            Some(filters)
                if metadata.level() == log::Level::Debug || metadata.level() == log::Level::Trace =>
            {
                filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()))
            }
            _ => true,
        }
    }
}

impl log::Log for ArenaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && self.topic_enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let message = record.args().to_string();
        let context = robot_context(&message)
            .map(|id| format!("[R{:02}] ", id))
            .unwrap_or_default();

        let mut line = format!(
            "{context}{target}: {message}",
            context = context,
            target = record.target(),
            message = message
        );
        // Add module path if available and different from target
        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                line.push_str(&format!(" [{}]", module_path));
            }
        }

        // A broken stdout or log file is not worth taking the match down for
        let mut stdout = io::stdout().lock();
        let _ = writeln!(
            stdout,
            "{timestamp} {level_color}{level:5}{reset} {line}",
            level = record.level()
        );
        let _ = stdout.flush();

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{timestamp} {level:5} {line}", level = record.level());
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

// Messages from the robot-scoped macros start with "[Rnn]"; others may mention "Robot N"
fn robot_context(message: &str) -> Option<u32> {
    if message.starts_with("[R") {
        return None;
    }
    let start = message.find("Robot ")? + "Robot ".len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parse a `--log-level` value, falling back to `Info` on anything unknown
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn parse_filters(filter: &str) -> HashSet<String> {
    filter
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

static LOGGER: OnceLock<ArenaLogger> = OnceLock::new();

/// Install the process-wide logger. Debug topics: engine, drive, scan, weapon, loader, robot.
pub fn init_logger(
    level: LevelFilter,
    debug_filter: Option<String>,
    log_file: Option<File>,
) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| ArenaLogger {
        level,
        debug_filters: debug_filter.as_deref().map(parse_filters),
        file: log_file.map(Mutex::new),
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

// Helper macros for specific debug topics
#[macro_export]
macro_rules! debug_engine {
    ($($arg:tt)*) => {
        log::debug!(target: "engine", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_loader {
    ($($arg:tt)*) => {
        log::debug!(target: "loader", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_robot {
    ($robot_id:expr, $($arg:tt)*) => {
        log::debug!(target: "robot", "[R{:02}] {}", $robot_id, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_drive {
    ($robot_id:expr, $($arg:tt)*) => {
        log::debug!(target: "drive", "[R{:02}] {}", $robot_id, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_weapon {
    ($robot_id:expr, $($arg:tt)*) => {
        log::debug!(target: "weapon", "[R{:02}] {}", $robot_id, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_scan {
    ($robot_id:expr, $($arg:tt)*) => {
        log::debug!(target: "scan", "[R{:02}] {}", $robot_id, format_args!($($arg)*))
    };
}
