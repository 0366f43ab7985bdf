use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    str::FromStr,
    sync::Mutex,
};

use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_colored(self) -> ColoredString {
        match self {
            LogLevel::Debug => "DBG".bright_cyan(),
            LogLevel::Info => "INF".bright_green(),
            LogLevel::Warn => "WAR".yellow(),
            LogLevel::Error => "ERR".bright_red(),
        }
    }

    pub fn to_string_no_color(self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WAR",
            LogLevel::Error => "ERR",
        }
    }

    /// Whether a message of level self is shown when the logger is
    /// configured with `configured`.
    pub fn show(self, configured: LogLevel) -> bool {
        self >= configured
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }

    fn rank(self) -> u8 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Warn => 2,
            LogLevel::Error => 3,
        }
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Writes level prefixed messages to stderr and, optionally, to a file. The
/// file receives every message regardless of the level.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    file: Option<Mutex<BufWriter<File>>>,
    name: String,
}

impl Logger {
    pub fn new(
        level: LogLevel,
        name: String,
        log_file_path: Option<String>,
    ) -> anyhow::Result<Self> {
        let file = match log_file_path {
            Some(path) => Some(Mutex::new(BufWriter::new(File::create(path)?))),
            None => None,
        };

        Ok(Logger { level, file, name })
    }

    /// Builds the logger described by `config`, or `None` if logging is
    /// disabled. Log files are created in `./logs`.
    pub fn from_config(config: &LoggerConfig, name: String) -> anyhow::Result<Option<Self>> {
        if !*config.get_enabled() {
            return Ok(None);
        }

        let log_file_path = if *config.get_log_file() {
            std::fs::create_dir_all("./logs")?;
            Some(format!(
                "./logs/fsa_session_{}.txt",
                Local::now().format("%Y-%m-%d_%H-%M-%S")
            ))
        } else {
            None
        };

        Ok(Some(Logger::new(
            *config.get_log_level(),
            name,
            log_file_path,
        )?))
    }

    pub fn prefix(&self, level: LogLevel) -> String {
        format!("[{}] {}", level.to_colored(), format!("{}:", self.name).dimmed())
    }

    pub fn prefix_no_color(&self, level: LogLevel) -> String {
        format!("[{}] {}:", level.to_string_no_color(), self.name)
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        self.writeln_to_file(&format!("{} {}", self.prefix_no_color(level), message));
        if level.show(self.level) {
            eprintln!("{} {}", self.prefix(level), message);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn writeln_to_file(&self, string: &str) {
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            // write errors are ignored
            let _ = writeln!(f, "{string}").and_then(|_| f.flush());
        }
    }
}

#[test]
fn test_log_level_ordering() {
    assert!(LogLevel::Error.show(LogLevel::Warn));
    assert!(LogLevel::Warn.show(LogLevel::Warn));
    assert!(!LogLevel::Info.show(LogLevel::Warn));
    assert!(LogLevel::Debug.show(LogLevel::Debug));
    assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
    assert!("loud".parse::<LogLevel>().is_err());
}
