pub mod fake;
pub mod sync;

pub use sync::{SerialOptions, SerialPort};

use crate::Result;

/// Line-oriented writer seam so the main loop can run against a fake port
/// in tests. The device is never read from.
pub trait LineIo {
    /// Write the given text bytes to the device and flush.
    fn send_line(&mut self, line: &str) -> Result<()>;
}
