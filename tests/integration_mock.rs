use chrono::Local;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sysline::app::logger::{LogLevel, Logger};
use sysline::app::run_loop;
use sysline::app::shutdown::ShutdownFlag;
use sysline::metrics::{SnapshotSource, SystemSnapshot};
use sysline::payload::LineSchema;
use sysline::serial::fake::FakeSerialPort;
use sysline::{Error, Result};

/// Scripted source that trips the shutdown flag after a fixed number of
/// samples, standing in for Ctrl-C arriving mid-run.
struct ScriptedSource {
    remaining: usize,
    shutdown: ShutdownFlag,
}

impl SnapshotSource for ScriptedSource {
    fn sample(&mut self) -> Result<SystemSnapshot> {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.shutdown.trigger();
        }
        Ok(fixture_snapshot())
    }
}

fn fixture_snapshot() -> SystemSnapshot {
    SystemSnapshot {
        cpu_percent: 12.5,
        mem_available_mb: 2048.0,
        mem_total_mb: 8192.0,
        mem_used_percent: 74.6,
        disk_used_percent: 55.1,
        taken_at: Local::now(),
    }
}

fn quiet_logger() -> Logger {
    Logger::new(LogLevel::Error, None)
}

#[test]
fn interrupt_closes_once_and_stops_writes() {
    let closes = Arc::new(AtomicUsize::new(0));
    let shutdown = ShutdownFlag::new();
    let mut port = FakeSerialPort::default().track_closes(Arc::clone(&closes));
    let mut source = ScriptedSource {
        remaining: 3,
        shutdown: shutdown.clone(),
    };

    run_loop(
        &mut port,
        &mut source,
        LineSchema::Extended,
        Duration::from_millis(1),
        &shutdown,
        &quiet_logger(),
    )
    .unwrap();

    // The interrupt arrived during the third sampling window: two lines
    // went out, the third snapshot was discarded unwritten.
    assert_eq!(port.writes().len(), 2);
    drop(port);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn write_failure_propagates_and_port_still_closes() {
    let closes = Arc::new(AtomicUsize::new(0));
    let shutdown = ShutdownFlag::new();
    {
        let mut port = FakeSerialPort::new(vec![
            Ok(()),
            Err(Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device unplugged",
            ))),
        ])
        .track_closes(Arc::clone(&closes));
        let mut source = ScriptedSource {
            remaining: usize::MAX,
            shutdown: shutdown.clone(),
        };

        let err = run_loop(
            &mut port,
            &mut source,
            LineSchema::Extended,
            Duration::from_millis(1),
            &shutdown,
            &quiet_logger(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert_eq!(port.writes().len(), 2);
    }
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn pre_triggered_flag_skips_sampling_entirely() {
    let shutdown = ShutdownFlag::new();
    shutdown.trigger();
    let mut port = FakeSerialPort::default();
    let mut source = ScriptedSource {
        remaining: usize::MAX,
        shutdown: shutdown.clone(),
    };

    run_loop(
        &mut port,
        &mut source,
        LineSchema::Extended,
        Duration::from_millis(1),
        &shutdown,
        &quiet_logger(),
    )
    .unwrap();

    assert!(port.writes().is_empty());
}

#[test]
fn loop_emits_schema_lines_on_the_wire() {
    let shutdown = ShutdownFlag::new();
    let mut port = FakeSerialPort::default();
    let mut source = ScriptedSource {
        remaining: 3,
        shutdown: shutdown.clone(),
    };

    run_loop(
        &mut port,
        &mut source,
        LineSchema::Classic,
        Duration::from_millis(1),
        &shutdown,
        &quiet_logger(),
    )
    .unwrap();

    assert_eq!(port.writes().len(), 2);
    for line in port.writes() {
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        let fields: Vec<&str> = line.trim_end().split(',').collect();
        assert_eq!(fields.len(), LineSchema::Classic.field_count());
        assert_eq!(fields[0], "12.5");
    }
}
