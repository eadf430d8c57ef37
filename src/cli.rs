use crate::payload::LineSchema;
use crate::{Error, Result};

/// Parsed top-level command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(RunOptions),
    ListPorts,
    ShowHelp,
    ShowVersion,
}

/// Options for the `run` command; values are `None` when not provided on CLI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub device: Option<String>,
    pub baud: Option<u32>,
    pub schema: Option<LineSchema>,
    pub interval_ms: Option<u64>,
    pub sample_window_ms: Option<u64>,
    pub stabilize_ms: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Command> {
        match args.first().map(String::as_str) {
            None => Ok(Command::Run(RunOptions::default())),
            Some("--help") | Some("-h") => Ok(Command::ShowHelp),
            Some("--version") | Some("-V") => Ok(Command::ShowVersion),
            Some("list-ports") => {
                if args.len() > 1 {
                    return Err(Error::InvalidArgs(
                        "list-ports takes no flags".to_string(),
                    ));
                }
                Ok(Command::ListPorts)
            }
            Some("run") => Ok(Command::Run(parse_run_options(&mut args[1..].iter())?)),
            // Bare flags imply `run` so the zero-argument habit survives.
            Some(_) => Ok(Command::Run(parse_run_options(&mut args.iter())?)),
        }
    }

    pub fn help() -> String {
        String::from(
            "sysline - Serial system-stats streamer\n\nUSAGE:\n  sysline [run] [--device <path>] [--baud <number>] [--schema <classic|extended>]\n  sysline list-ports\n  sysline --help\n  sysline --version\n\nOPTIONS:\n  --device <path>              Serial device path (default: auto-detect a USB serial port)\n  --baud <number>              Baud rate (default: 9600)\n  --schema <classic|extended>  Wire field layout (default: extended)\n  --interval-ms <number>       Delay between transmissions (default: 2000)\n  --sample-window-ms <number>  Blocking CPU sampling window (default: 1000)\n  --stabilize-ms <number>      Wait after opening the port before the first write (default: 2000)\n  --log-level <error|warn|info|debug>  Log verbosity (default: info)\n  --log-file <path>            Append logs to a file (also honors SYSLINE_LOG_PATH)\n  -h, --help                   Show this help\n  -V, --version                Show version\n",
        )
    }

    pub fn print_help() {
        println!("{}", Self::help());
    }
}

fn parse_run_options(iter: &mut std::slice::Iter<String>) -> Result<RunOptions> {
    let mut opts = RunOptions::default();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--device" => {
                opts.device = Some(take_value(flag, iter)?);
            }
            "--baud" => {
                let raw = take_value(flag, iter)?;
                opts.baud = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("baud must be a positive integer".to_string())
                })?);
            }
            "--schema" => {
                let raw = take_value(flag, iter)?;
                opts.schema = Some(raw.parse()?);
            }
            "--interval-ms" => {
                let raw = take_value(flag, iter)?;
                opts.interval_ms = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("interval-ms must be a positive integer".to_string())
                })?);
            }
            "--sample-window-ms" => {
                let raw = take_value(flag, iter)?;
                opts.sample_window_ms = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("sample-window-ms must be a positive integer".to_string())
                })?);
            }
            "--stabilize-ms" => {
                let raw = take_value(flag, iter)?;
                opts.stabilize_ms = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("stabilize-ms must be a positive integer".to_string())
                })?);
            }
            "--log-level" => {
                opts.log_level = Some(take_value(flag, iter)?);
            }
            "--log-file" => {
                opts.log_file = Some(take_value(flag, iter)?);
            }
            other => {
                return Err(Error::InvalidArgs(format!(
                    "unknown flag '{other}', try --help"
                )));
            }
        }
    }

    Ok(opts)
}

fn take_value(flag: &str, iter: &mut std::slice::Iter<String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| Error::InvalidArgs(format!("expected a value after {flag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_with_no_args() {
        let args: Vec<String> = vec![];
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd, Command::Run(RunOptions::default()));
    }

    #[test]
    fn parse_run_with_overrides() {
        let args = vec![
            "run".into(),
            "--device".into(),
            "/dev/ttyUSB0".into(),
            "--baud".into(),
            "9600".into(),
            "--schema".into(),
            "classic".into(),
            "--interval-ms".into(),
            "1000".into(),
            "--sample-window-ms".into(),
            "500".into(),
            "--stabilize-ms".into(),
            "3000".into(),
            "--log-level".into(),
            "debug".into(),
            "--log-file".into(),
            "/tmp/sysline.log".into(),
        ];
        let expected = RunOptions {
            device: Some("/dev/ttyUSB0".into()),
            baud: Some(9_600),
            schema: Some(LineSchema::Classic),
            interval_ms: Some(1_000),
            sample_window_ms: Some(500),
            stabilize_ms: Some(3_000),
            log_level: Some("debug".into()),
            log_file: Some("/tmp/sysline.log".into()),
        };
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd, Command::Run(expected));
    }

    #[test]
    fn parse_run_allows_implicit_subcommand() {
        let args = vec!["--device".into(), "/dev/ttyS1".into()];
        let expected = RunOptions {
            device: Some("/dev/ttyS1".into()),
            ..RunOptions::default()
        };
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd, Command::Run(expected));
    }

    #[test]
    fn parse_help() {
        let args = vec!["--help".into()];
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd, Command::ShowHelp);
    }

    #[test]
    fn parse_list_ports() {
        let args = vec!["list-ports".into()];
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd, Command::ListPorts);
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        let args = vec!["--nope".into()];
        let err = Command::parse(&args).unwrap_err();
        assert!(format!("{err}").contains("unknown flag"));
    }

    #[test]
    fn parse_rejects_bad_schema_value() {
        let args = vec!["--schema".into(), "binary".into()];
        let err = Command::parse(&args).unwrap_err();
        assert!(format!("{err}").contains("unknown schema"));
    }

    #[test]
    fn parse_rejects_missing_value() {
        let args = vec!["--device".into()];
        let err = Command::parse(&args).unwrap_err();
        assert!(format!("{err}").contains("expected a value"));
    }
}
