use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop flag, tripped by Ctrl-C in production and directly by
/// tests. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a SIGINT handler that trips this flag. Call once per
    /// process; registering twice is an error in the underlying library.
    pub fn install_ctrlc_handler(&self) -> Result<()> {
        let flag = self.clone();
        ctrlc::set_handler(move || flag.trigger())?;
        Ok(())
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_untriggered_and_latches() {
        let flag = ShutdownFlag::new();
        assert!(!flag.is_triggered());
        flag.trigger();
        assert!(flag.is_triggered());
    }

    #[test]
    fn clones_share_the_flag() {
        let flag = ShutdownFlag::new();
        let clone = flag.clone();
        clone.trigger();
        assert!(flag.is_triggered());
    }
}
