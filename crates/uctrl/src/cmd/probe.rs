use tracing::Dispatch;

use crate::cmd::{close_quietly, open_channel, ProbeArgs};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_probe, OutputFormat};

/// Opening the channel already runs the help probe, so its result is reused
/// rather than probing a second time.
pub fn run(args: ProbeArgs, format: OutputFormat, dispatch: Dispatch) -> CliResult<i32> {
    let channel = open_channel(&args.connect, dispatch)?;
    let alive = channel.alive_at_open();
    close_quietly(channel);

    print_probe(&args.connect.device, alive, format);
    Ok(if alive { SUCCESS } else { HEALTH_CHECK_FAILED })
}
