use super::LineIo;
use crate::config::{DEFAULT_BAUD, DEFAULT_READ_TIMEOUT_MS};
use crate::Result;
use std::io::Write;
use std::time::Duration;

/// Open parameters for the serial device. The read timeout only configures
/// the underlying handle; nothing in this crate reads from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialOptions {
    pub baud: u32,
    pub timeout: Duration,
}

impl Default for SerialOptions {
    fn default() -> Self {
        Self {
            baud: DEFAULT_BAUD,
            timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

/// Exclusively-owned handle to the OS serial device. Dropping it closes
/// the device, which is the only close path.
pub struct SerialPort {
    inner: Box<dyn serialport::SerialPort>,
}

impl SerialPort {
    pub fn connect(device: &str, options: SerialOptions) -> Result<Self> {
        let inner = serialport::new(device, options.baud)
            .timeout(options.timeout)
            .open()?;
        Ok(Self { inner })
    }
}

impl LineIo for SerialPort {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.flush()?;
        Ok(())
    }
}
