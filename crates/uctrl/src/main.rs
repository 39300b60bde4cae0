mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "uctrl", version, about = "Talk to a microcontroller console")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "UCTRL_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    let dispatch = init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format, dispatch);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cmd::{LineEndingArg, TransportArg};

    #[test]
    fn parses_set_subcommand() {
        let cli = Cli::try_parse_from(["uctrl", "set", "/dev/ttyACM0", "set led on"])
            .expect("set args should parse");

        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.connect.device, "/dev/ttyACM0");
                assert_eq!(args.command, "set led on");
                assert_eq!(args.connect.settle, Duration::from_secs(2));
                assert_eq!(args.connect.transport, TransportArg::Serial);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_get_with_connection_options() {
        let cli = Cli::try_parse_from([
            "uctrl",
            "get",
            "/tmp/dev.sock",
            "get temp",
            "--transport",
            "socket",
            "--settle",
            "250ms",
            "--line-ending",
            "crlf",
        ])
        .expect("get args should parse");

        match cli.command {
            Command::Get(args) => {
                assert_eq!(args.connect.transport, TransportArg::Socket);
                assert_eq!(args.connect.settle, Duration::from_millis(250));
                assert_eq!(args.connect.line_ending, LineEndingArg::Crlf);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_probe_with_baud() {
        let cli = Cli::try_parse_from(["uctrl", "probe", "COM3", "--baud", "9600"])
            .expect("probe args should parse");
        match cli.command {
            Command::Probe(args) => assert_eq!(args.connect.baud, 9600),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_settle() {
        let err = Cli::try_parse_from(["uctrl", "probe", "COM3", "--settle", "soon"])
            .expect_err("bad duration should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn get_requires_command() {
        let err = Cli::try_parse_from(["uctrl", "get", "/dev/ttyACM0"])
            .expect_err("missing command should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
