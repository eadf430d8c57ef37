use crate::{
    cli::RunOptions,
    config::{Config, DEFAULT_READ_TIMEOUT_MS},
    metrics::{Sampler, SnapshotSource},
    payload::LineSchema,
    port,
    serial::{LineIo, SerialOptions, SerialPort},
    Result,
};
use self::logger::{LogLevel, Logger};
use self::shutdown::ShutdownFlag;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

pub mod logger;
pub mod shutdown;

/// Config for the daemon.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub device: Option<String>,
    pub baud: u32,
    pub interval_ms: u64,
    pub sample_window_ms: u64,
    pub stabilize_ms: u64,
    pub schema: LineSchema,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_sources(Config::default(), RunOptions::default())
    }
}

impl AppConfig {
    /// CLI flag beats config file beats built-in default.
    pub fn from_sources(config: Config, opts: RunOptions) -> Self {
        Self {
            device: opts.device.or(config.device),
            baud: opts.baud.unwrap_or(config.baud),
            interval_ms: opts.interval_ms.unwrap_or(config.interval_ms),
            sample_window_ms: opts.sample_window_ms.unwrap_or(config.sample_window_ms),
            stabilize_ms: opts.stabilize_ms.unwrap_or(config.stabilize_ms),
            schema: opts.schema.unwrap_or(config.schema),
            log_level: opts.log_level.unwrap_or(config.log_level),
            log_file: opts.log_file.or(config.log_file),
        }
    }
}

pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn from_options(opts: RunOptions) -> Result<Self> {
        let cfg_file = Config::load_or_default()?;
        let merged = AppConfig::from_sources(cfg_file, opts);
        Ok(Self::new(merged))
    }

    /// Entry point for the daemon: locate the port, open it, stream one
    /// metrics line per interval until interrupted. The port handle closes
    /// when it drops, on every return path.
    pub fn run(&self) -> Result<()> {
        let level = LogLevel::from_str(&self.config.log_level)?;
        let logger = Logger::new(level, self.config.log_file.as_deref());
        let shutdown = ShutdownFlag::new();
        shutdown.install_ctrlc_handler()?;

        let device = match self.config.device.clone() {
            Some(device) => device,
            None => match port::detect_serial_port()? {
                Some(device) => device,
                None => {
                    logger.error("No serial port found");
                    return Ok(());
                }
            },
        };

        let options = SerialOptions {
            baud: self.config.baud,
            timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        };
        let mut port = SerialPort::connect(&device, options)?;
        logger.info(format!("connected to {device}"));

        // Opening the port can reset the microcontroller; give it time to
        // boot before the first line.
        sleep_unless_triggered(
            Duration::from_millis(self.config.stabilize_ms),
            &shutdown,
        );

        let mut sampler = Sampler::new(Duration::from_millis(self.config.sample_window_ms));
        run_loop(
            &mut port,
            &mut sampler,
            self.config.schema,
            Duration::from_millis(self.config.interval_ms),
            &shutdown,
            &logger,
        )
    }
}

/// Steady-state loop: sample, format, transmit, sleep, until the flag
/// trips. Sample and write failures are fatal and propagate; the caller's
/// port handle still closes when it drops.
pub fn run_loop<IO, S>(
    io: &mut IO,
    source: &mut S,
    schema: LineSchema,
    interval: Duration,
    shutdown: &ShutdownFlag,
    logger: &Logger,
) -> Result<()>
where
    IO: LineIo,
    S: SnapshotSource,
{
    while !shutdown.is_triggered() {
        let snapshot = source.sample()?;
        // An interrupt during the blocking sampling window must not be
        // followed by another write.
        if shutdown.is_triggered() {
            break;
        }
        let line = schema.format_line(&snapshot);
        logger.debug(format!("sending: {}", line.trim_end()));
        io.send_line(&line)?;
        sleep_unless_triggered(interval, shutdown);
    }
    logger.info("exiting");
    Ok(())
}

/// Sleep in short slices so a shutdown request cuts the wait short.
fn sleep_unless_triggered(total: Duration, shutdown: &ShutdownFlag) {
    const SLICE: Duration = Duration::from_millis(50);
    let deadline = Instant::now() + total;
    while !shutdown.is_triggered() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(SLICE.min(deadline - now));
    }
}
