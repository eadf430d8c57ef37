use std::process::ExitCode;
use sysline::{app::App, cli::Command, port};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::ShowHelp => {
            Command::print_help();
            ExitCode::SUCCESS
        }
        Command::ShowVersion => {
            println!("sysline {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::ListPorts => match port::list_ports() {
            Ok(ports) if ports.is_empty() => {
                println!("no serial ports found");
                ExitCode::SUCCESS
            }
            Ok(ports) => {
                for candidate in ports {
                    println!("{}\t{}", candidate.path, candidate.description);
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
        Command::Run(opts) => {
            let app = match App::from_options(opts) {
                Ok(app) => app,
                Err(err) => {
                    eprintln!("{err}");
                    return ExitCode::FAILURE;
                }
            };
            match app.run() {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
