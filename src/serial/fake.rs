use super::LineIo;
use crate::Result;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct FakeSerialEntry {
    result: Result<()>,
    delay: Option<Duration>,
}

impl FakeSerialEntry {
    pub fn immediate(result: Result<()>) -> Self {
        Self {
            result,
            delay: None,
        }
    }

    pub fn with_delay(result: Result<()>, delay: Duration) -> Self {
        Self {
            result,
            delay: Some(delay),
        }
    }
}

impl From<Result<()>> for FakeSerialEntry {
    fn from(result: Result<()>) -> Self {
        Self::immediate(result)
    }
}

/// Minimal fake serial port used in tests to script write outcomes.
/// Every attempted line is recorded; once the script runs out, writes
/// succeed. Dropping the fake bumps the optional close counter so tests
/// can observe the close path.
#[derive(Default)]
pub struct FakeSerialPort {
    script: VecDeque<FakeSerialEntry>,
    writes: Vec<String>,
    closes: Option<Arc<AtomicUsize>>,
}

impl FakeSerialPort {
    pub fn new(script: Vec<Result<()>>) -> Self {
        Self::with_entries(script.into_iter().map(FakeSerialEntry::from).collect())
    }

    pub fn with_script(script: Vec<FakeSerialEntry>) -> Self {
        Self::with_entries(script)
    }

    fn with_entries(script: Vec<FakeSerialEntry>) -> Self {
        Self {
            script: script.into(),
            writes: Vec::new(),
            closes: None,
        }
    }

    pub fn track_closes(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.closes = Some(counter);
        self
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl LineIo for FakeSerialPort {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.writes.push(line.to_string());
        match self.script.pop_front() {
            Some(entry) => {
                if let Some(delay) = entry.delay {
                    std::thread::sleep(delay);
                }
                entry.result
            }
            None => Ok(()),
        }
    }
}

impl Drop for FakeSerialPort {
    fn drop(&mut self) {
        if let Some(counter) = self.closes.as_ref() {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}
