use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use tracing::{warn, Dispatch};
use uctrl_channel::{ChannelConfig, CommandChannel, LineEnding};
use uctrl_transport::{open_boxed, Endpoint, SerialEndpoint, SerialOptions};

use crate::exit::{transport_error, CliResult};
use crate::output::OutputFormat;

pub mod get;
pub mod ports;
pub mod probe;
pub mod set;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a command without reading the reply.
    Set(SetArgs),
    /// Send a command and print whatever the device answered.
    Get(GetArgs),
    /// Check whether the device answers the help probe.
    Probe(ProbeArgs),
    /// List serial ports on this host.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, dispatch: Dispatch) -> CliResult<i32> {
    match command {
        Command::Set(args) => set::run(args, dispatch),
        Command::Get(args) => get::run(args, format, dispatch),
        Command::Probe(args) => probe::run(args, format, dispatch),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    #[default]
    Serial,
    /// Unix domain socket (simulators, pty bridges).
    Socket,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LineEndingArg {
    #[default]
    None,
    Lf,
    Crlf,
}

impl From<LineEndingArg> for LineEnding {
    fn from(arg: LineEndingArg) -> Self {
        match arg {
            LineEndingArg::None => LineEnding::None,
            LineEndingArg::Lf => LineEnding::Lf,
            LineEndingArg::Crlf => LineEnding::CrLf,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Serial port (e.g. /dev/ttyACM0, COM3), or socket path with --transport socket.
    pub device: String,
    /// How to reach the device.
    #[arg(long, value_enum, default_value = "serial", env = "UCTRL_TRANSPORT")]
    pub transport: TransportArg,
    /// Serial baud rate.
    #[arg(long, default_value_t = SerialOptions::DEFAULT_BAUD_RATE, env = "UCTRL_BAUD")]
    pub baud: u32,
    /// Wait after each write before reading (e.g. 2s, 500ms).
    #[arg(long, default_value = "2s", value_parser = parse_duration, env = "UCTRL_SETTLE")]
    pub settle: Duration,
    /// Terminator appended to each command.
    #[arg(long, value_enum, default_value = "none")]
    pub line_ending: LineEndingArg,
}

impl ConnectArgs {
    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            line_ending: self.line_ending.into(),
            ..ChannelConfig::with_settle(self.settle)
        }
    }
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
    /// Command text, sent verbatim.
    pub command: String,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
    /// Command text, sent verbatim.
    pub command: String,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open the endpoint and wrap it in a channel. Runs the startup probe.
pub fn open_channel(
    args: &ConnectArgs,
    dispatch: Dispatch,
) -> CliResult<CommandChannel<Box<dyn Endpoint>>> {
    let endpoint = open_endpoint(args)?;
    Ok(CommandChannel::new(
        endpoint,
        args.channel_config(),
        Some(dispatch),
    ))
}

fn open_endpoint(args: &ConnectArgs) -> CliResult<Box<dyn Endpoint>> {
    match args.transport {
        TransportArg::Serial => {
            let options = SerialOptions::with_baud_rate(args.baud);
            open_boxed::<SerialEndpoint>(&args.device, &options)
                .map_err(|err| transport_error("open failed", err))
        }
        #[cfg(unix)]
        TransportArg::Socket => open_boxed::<uctrl_transport::SocketEndpoint>(&args.device, &())
            .map_err(|err| transport_error("connect failed", err)),
        #[cfg(not(unix))]
        TransportArg::Socket => Err(crate::exit::CliError::new(
            crate::exit::USAGE,
            "socket transport requires Unix domain sockets",
        )),
    }
}

/// Close the channel once the command's outcome is settled.
///
/// A failing close is logged, not returned: the device has already taken
/// the command and any response has been read.
pub fn close_quietly<E: Endpoint>(channel: CommandChannel<E>) -> bool {
    let name = channel.endpoint().name().to_string();
    match channel.close() {
        Ok(()) => true,
        Err(err) => {
            warn!(endpoint = %name, error = %err, "close failed");
            false
        }
    }
}

/// Parse `2s`, `500ms` or a bare number of seconds. Zero is allowed.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration value: {input}"))?;

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}
