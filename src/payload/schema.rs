use crate::metrics::SystemSnapshot;
use crate::{Error, Result};
use std::str::FromStr;

/// Wire layout of the transmitted line, resolved once at startup.
///
/// Both layouts carry six comma-separated fields terminated by a single
/// newline; numeric fields are plain decimal text with one fractional
/// digit, locale-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSchema {
    /// `cpu,mem_free_mb,ram_pct,disk_pct,YYYY-MM-DD HH:MM,weekday`
    Classic,
    /// `cpu,mem_free_mb,mem_total_mb,ram_pct,disk_pct,YYYY-MM-DD HH:MM:SS`
    #[default]
    Extended,
}

impl LineSchema {
    /// Number of comma-separated fields on the wire.
    pub fn field_count(self) -> usize {
        6
    }

    /// Format one snapshot as a single CSV line ending in `\n`.
    pub fn format_line(self, snapshot: &SystemSnapshot) -> String {
        match self {
            LineSchema::Classic => format!(
                "{:.1},{:.1},{:.1},{:.1},{},{}\n",
                snapshot.cpu_percent,
                snapshot.mem_available_mb,
                snapshot.mem_used_percent,
                snapshot.disk_used_percent,
                snapshot.taken_at.format("%Y-%m-%d %H:%M"),
                snapshot.taken_at.format("%A"),
            ),
            LineSchema::Extended => format!(
                "{:.1},{:.1},{:.1},{:.1},{:.1},{}\n",
                snapshot.cpu_percent,
                snapshot.mem_available_mb,
                snapshot.mem_total_mb,
                snapshot.mem_used_percent,
                snapshot.disk_used_percent,
                snapshot.taken_at.format("%Y-%m-%d %H:%M:%S"),
            ),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineSchema::Classic => "classic",
            LineSchema::Extended => "extended",
        }
    }
}

impl FromStr for LineSchema {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(LineSchema::Classic),
            "extended" => Ok(LineSchema::Extended),
            other => Err(Error::InvalidArgs(format!(
                "unknown schema '{other}', expected 'classic' or 'extended'"
            ))),
        }
    }
}
