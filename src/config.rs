use crate::payload::LineSchema;
use crate::{Error, Result, CONFIG_PATH_ENV};
use std::str::FromStr;

pub const DEFAULT_BAUD: u32 = 9_600;
pub const DEFAULT_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_SAMPLE_WINDOW_MS: u64 = 1_000;
pub const DEFAULT_STABILIZE_MS: u64 = 2_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1_000;

/// File-level configuration. Every field has a built-in default and can be
/// overridden per-key from the optional config file; CLI flags override
/// both (see `AppConfig::from_sources`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub device: Option<String>,
    pub baud: u32,
    pub interval_ms: u64,
    pub sample_window_ms: u64,
    pub stabilize_ms: u64,
    pub schema: LineSchema,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: None,
            baud: DEFAULT_BAUD,
            interval_ms: DEFAULT_INTERVAL_MS,
            sample_window_ms: DEFAULT_SAMPLE_WINDOW_MS,
            stabilize_ms: DEFAULT_STABILIZE_MS,
            schema: LineSchema::default(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load from the file named by `SYSLINE_CONFIG_PATH`, or fall back to
    /// defaults when the variable is unset. Parse errors propagate.
    pub fn load_or_default() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Defaults when the file does not exist; other read errors propagate.
    pub fn load_from(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse_from_str(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Minimal parser: `key = value` lines, `#` comments, blank lines.
    pub fn parse_from_str(raw: &str) -> Result<Self> {
        let mut config = Self::default();
        for (idx, line) in raw.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(Error::Config(format!(
                    "invalid config literal on line {}",
                    idx + 1
                )));
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            match key {
                "device" => config.device = Some(value.to_string()),
                "baud" => config.baud = parse_number(key, value, idx)?,
                "interval_ms" => config.interval_ms = parse_number(key, value, idx)?,
                "sample_window_ms" => config.sample_window_ms = parse_number(key, value, idx)?,
                "stabilize_ms" => config.stabilize_ms = parse_number(key, value, idx)?,
                "schema" => config.schema = value.parse()?,
                "log_level" => config.log_level = value.to_string(),
                "log_file" => config.log_file = Some(value.to_string()),
                other => {
                    return Err(Error::Config(format!(
                        "unknown config key '{other}' on line {}",
                        idx + 1
                    )));
                }
            }
        }
        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str, idx: usize) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("invalid {key} value on line {}", idx + 1)))
}
