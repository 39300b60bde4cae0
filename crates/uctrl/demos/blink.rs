//! Toggle an LED a few times and read the device status back.
//!
//! Run with:
//!   cargo run --example blink -- /dev/ttyACM0
//!
//! Assumes firmware that understands `set led on|off` and `get status`.

use std::time::Duration;

use uctrl::channel::{ChannelConfig, CommandChannel, LineEnding};
use uctrl::transport::{SerialEndpoint, SerialOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyACM0".to_string());

    let endpoint = SerialEndpoint::open(&port, &SerialOptions::default())?;
    let config = ChannelConfig {
        line_ending: LineEnding::Lf,
        ..ChannelConfig::with_settle(Duration::from_millis(500))
    };
    let mut channel = CommandChannel::new(endpoint, config, None);

    if !channel.alive_at_open() {
        eprintln!("{port} did not answer the help probe; continuing with writes only");
    }

    for state in ["on", "off", "on", "off"] {
        channel.send(format!("set led {state}"))?;
    }

    let status = channel.query("get status")?;
    println!("{}", status.text().trim_end());

    channel.close()?;
    Ok(())
}
