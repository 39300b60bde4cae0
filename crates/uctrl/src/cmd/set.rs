use tracing::Dispatch;

use crate::cmd::{close_quietly, open_channel, SetArgs};
use crate::exit::{channel_error, CliResult, SUCCESS};

pub fn run(args: SetArgs, dispatch: Dispatch) -> CliResult<i32> {
    let mut channel = open_channel(&args.connect, dispatch)?;

    channel
        .send(args.command.as_str())
        .map_err(|err| channel_error("send failed", err))?;
    close_quietly(channel);

    Ok(SUCCESS)
}
