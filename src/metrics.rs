use crate::Result;
use chrono::{DateTime, Local};
use std::path::Path;
use std::thread;
use std::time::Duration;
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};

/// One point-in-time capture of host resource metrics. Built at the top of
/// each loop iteration, handed to the transmitter, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSnapshot {
    pub cpu_percent: f32,
    pub mem_available_mb: f64,
    pub mem_total_mb: f64,
    pub mem_used_percent: f32,
    pub disk_used_percent: f32,
    pub taken_at: DateTime<Local>,
}

/// Source of snapshots; the main loop is generic over this so tests can
/// script samples.
pub trait SnapshotSource {
    fn sample(&mut self) -> Result<SystemSnapshot>;
}

/// Production sampler backed by sysinfo.
///
/// CPU usage needs two refreshes separated by a delay, so `sample` blocks
/// for the configured window. That window, not the loop sleep, dominates
/// per-iteration latency.
pub struct Sampler {
    sys: System,
    window: Duration,
}

impl Sampler {
    /// The window is floored at sysinfo's minimum CPU update interval.
    pub fn new(window: Duration) -> Self {
        Self {
            sys: System::new(),
            window: window.max(MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

impl SnapshotSource for Sampler {
    fn sample(&mut self) -> Result<SystemSnapshot> {
        self.sys.refresh_cpu_usage();
        thread::sleep(self.window);
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let total = self.sys.total_memory() as f64;
        let available = self.sys.available_memory() as f64;
        let used = self.sys.used_memory() as f64;
        let mem_used_percent = if total > 0.0 {
            clamp_percent((used / total * 100.0) as f32)
        } else {
            0.0
        };

        Ok(SystemSnapshot {
            cpu_percent: clamp_percent(self.sys.global_cpu_usage()),
            mem_available_mb: available / 1024.0 / 1024.0,
            mem_total_mb: total / 1024.0 / 1024.0,
            mem_used_percent,
            disk_used_percent: root_disk_used_percent(),
            taken_at: Local::now(),
        })
    }
}

/// Used percentage of the root filesystem; falls back to the first listed
/// disk where no `/` mount exists (e.g. Windows).
fn root_disk_used_percent() -> f32 {
    let disks = Disks::new_with_refreshed_list();
    let list = disks.list();
    let disk = list
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| list.first());
    match disk {
        Some(disk) if disk.total_space() > 0 => {
            let total = disk.total_space() as f64;
            let used = total - disk.available_space() as f64;
            clamp_percent((used / total * 100.0) as f32)
        }
        _ => 0.0,
    }
}

fn clamp_percent(value: f32) -> f32 {
    value.clamp(0.0, 100.0)
}
