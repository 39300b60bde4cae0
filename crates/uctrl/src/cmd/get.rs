use tracing::Dispatch;
use uctrl_channel::{CommandChannel, Response};
use uctrl_transport::Endpoint;

use crate::cmd::{close_quietly, open_channel, GetArgs};
use crate::exit::{channel_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: GetArgs, format: OutputFormat, dispatch: Dispatch) -> CliResult<i32> {
    let channel = open_channel(&args.connect, dispatch)?;
    let response = query_then_close(channel, &args.command)?;

    print_response(&args.connect.device, &args.command, &response, format);
    Ok(SUCCESS)
}

/// Once the query has returned, the response is kept even if closing fails.
fn query_then_close<E: Endpoint>(
    mut channel: CommandChannel<E>,
    command: &str,
) -> CliResult<Response> {
    let response = channel
        .query(command)
        .map_err(|err| channel_error("query failed", err))?;
    close_quietly(channel);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::time::Duration;

    use uctrl_channel::ChannelConfig;
    use uctrl_transport::MemoryEndpoint;

    use super::*;

    fn channel_for(endpoint: &MemoryEndpoint) -> CommandChannel<MemoryEndpoint> {
        CommandChannel::new(
            endpoint.clone(),
            ChannelConfig::with_settle(Duration::ZERO),
            None,
        )
    }

    #[test]
    fn response_survives_close_failure() {
        let endpoint = MemoryEndpoint::new("mem")
            .with_reply("get led", "on\n")
            .with_close_error(ErrorKind::BrokenPipe);

        let response = query_then_close(channel_for(&endpoint), "get led")
            .expect("query should succeed despite close failure");

        assert_eq!(response.text(), "on\n");
        assert!(!endpoint.is_closed());
    }

    #[test]
    fn query_failure_is_reported() {
        let endpoint = MemoryEndpoint::new("mem");
        let channel = channel_for(&endpoint);
        let _ = endpoint.clone().with_read_error(ErrorKind::TimedOut);

        let err = query_then_close(channel, "get led").unwrap_err();
        assert_eq!(err.code, crate::exit::TIMEOUT);
    }
}
