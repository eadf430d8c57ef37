pub mod app;
pub mod cli;
pub mod config;
pub mod metrics;
pub mod payload;
pub mod port;
pub mod serial;

use thiserror::Error;

/// Environment variable naming an extra log file to append to.
pub const LOG_PATH_ENV: &str = "SYSLINE_LOG_PATH";
/// Environment variable naming the optional config file.
pub const CONFIG_PATH_ENV: &str = "SYSLINE_CONFIG_PATH";

/// Crate-wide error type. A missing port is not an error (the locator
/// returns `None`); everything here is fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
