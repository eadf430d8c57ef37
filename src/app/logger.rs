use crate::{Error, Result, LOG_PATH_ENV};
use std::io::Write;
use std::str::FromStr;

/// Log verbosity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(Error::InvalidArgs(format!("unknown log level '{other}'"))),
        }
    }
}

/// Simple stderr/file logger used across the app module.
pub struct Logger {
    level: LogLevel,
    file: Option<std::fs::File>,
}

impl Logger {
    /// An explicit file path wins over the `SYSLINE_LOG_PATH` variable; a
    /// file that cannot be opened degrades to stderr-only.
    pub fn new(level: LogLevel, file_path: Option<&str>) -> Self {
        let path = file_path
            .map(str::to_string)
            .or_else(|| std::env::var(LOG_PATH_ENV).ok());
        let file = path.and_then(|p| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .ok()
        });
        Self { level, file }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Error, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Warn, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Info, msg.as_ref());
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Debug, msg.as_ref());
    }

    fn log(&self, level: LogLevel, msg: &str) {
        if level > self.level {
            return;
        }
        eprintln!("{msg}");
        if let Some(file) = self.file.as_ref() {
            if let Ok(mut clone) = file.try_clone() {
                let _ = writeln!(clone, "{msg}");
            }
        }
    }
}
