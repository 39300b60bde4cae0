use tracing::{debug, info, warn, Dispatch};
use uctrl_transport::Endpoint;

use crate::command::Command;
use crate::config::ChannelConfig;
use crate::error::Result;
use crate::response::Response;
use crate::settle::{Settle, ThreadSleep};

/// Settle-timed command channel to a device console.
///
/// Every operation is synchronous and single-shot: write the command, wait
/// `config.settle`, and (for [`query`](Self::query)) take whatever the
/// endpoint has buffered in one read. There is no retry, no streaming and
/// no internal lock; operations take `&mut self`, so a shared channel needs
/// outside synchronization.
///
/// Diagnostics go to the [`Dispatch`] handed in at construction. With none,
/// they are discarded; the process-wide default subscriber is never used.
pub struct CommandChannel<E, S = ThreadSleep> {
    endpoint: E,
    config: ChannelConfig,
    settle: S,
    dispatch: Dispatch,
    alive_at_open: bool,
}

impl<E: Endpoint> CommandChannel<E, ThreadSleep> {
    /// Wrap an open endpoint and probe the device.
    ///
    /// Never fails: an unresponsive device is logged at warn level and the
    /// channel is returned anyway, since the device may come up later or the
    /// caller may only need one-way writes.
    pub fn new(endpoint: E, config: ChannelConfig, dispatch: Option<Dispatch>) -> Self {
        Self::with_settle(endpoint, config, ThreadSleep, dispatch)
    }
}

impl<E: Endpoint, S: Settle> CommandChannel<E, S> {
    /// Like [`CommandChannel::new`] with a custom settle strategy.
    pub fn with_settle(
        endpoint: E,
        config: ChannelConfig,
        settle: S,
        dispatch: Option<Dispatch>,
    ) -> Self {
        let mut channel = Self {
            endpoint,
            config,
            settle,
            dispatch: dispatch.unwrap_or_else(Dispatch::none),
            alive_at_open: false,
        };

        let endpoint_info = channel.endpoint.info();
        channel.log(|| {
            info!(
                endpoint = %endpoint_info.name,
                transport = %endpoint_info.kind,
                settle = ?channel.config.settle,
                "interface info"
            );
        });

        channel.alive_at_open = match channel.is_alive() {
            Ok(true) => true,
            Ok(false) => {
                channel.log(|| {
                    warn!(
                        endpoint = %endpoint_info.name,
                        probe = %channel.config.probe_command,
                        "cannot reach microcontroller: probe output did not contain marker"
                    );
                });
                false
            }
            Err(err) => {
                channel.log(|| {
                    warn!(
                        endpoint = %endpoint_info.name,
                        error = %err,
                        "cannot reach microcontroller: probe failed"
                    );
                });
                false
            }
        };

        channel
    }

    /// Write `command` and wait out the settle window. Nothing is read.
    pub fn send(&mut self, command: impl Into<Command>) -> Result<()> {
        let command = command.into();
        self.write_and_settle(&command)
    }

    /// Write `command`, wait, then return everything the endpoint has buffered.
    ///
    /// Output the device produces after the settle window is not captured
    /// here; it stays in the endpoint and shows up in the next read.
    pub fn query(&mut self, command: impl Into<Command>) -> Result<Response> {
        let command = command.into();
        self.write_and_settle(&command)?;

        let bytes = self.endpoint.read_all()?;
        self.log(|| debug!(command = %command, len = bytes.len(), "read response"));
        Ok(Response::from(bytes))
    }

    /// [`send`](Self::send) for raw input. Non-text is rejected before any I/O.
    pub fn send_bytes(&mut self, command: &[u8]) -> Result<()> {
        let command = Command::from_utf8(command)?;
        self.send(command)
    }

    /// [`query`](Self::query) for raw input. Non-text is rejected before any I/O.
    pub fn query_bytes(&mut self, command: &[u8]) -> Result<Response> {
        let command = Command::from_utf8(command)?;
        self.query(command)
    }

    /// Run the probe command and look for the marker in its output.
    ///
    /// This is a heuristic: the device's `help` listing is expected to
    /// contain its own name. An empty response is never alive.
    pub fn is_alive(&mut self) -> Result<bool> {
        let probe = Command::new(self.config.probe_command.clone());
        let response = self.query(probe)?;
        Ok(!response.is_empty() && response.contains_text(&self.config.probe_marker))
    }

    /// Close the endpoint. The device itself keeps running.
    pub fn close(mut self) -> Result<()> {
        self.endpoint.close()?;
        let name = self.endpoint.name().to_string();
        self.log(|| debug!(endpoint = %name, "channel closed"));
        Ok(())
    }

    /// Result of the liveness probe run at construction.
    pub fn alive_at_open(&self) -> bool {
        self.alive_at_open
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    fn write_and_settle(&mut self, command: &Command) -> Result<()> {
        let bytes = command.encode(self.config.line_ending);
        self.log(|| debug!(command = %command, len = bytes.len(), "write command"));
        self.endpoint.write(&bytes)?;
        self.settle.settle(self.config.settle);
        Ok(())
    }

    fn log(&self, f: impl FnOnce()) {
        tracing::dispatcher::with_default(&self.dispatch, f);
    }
}

impl<E: Endpoint, S> std::fmt::Debug for CommandChannel<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandChannel")
            .field("endpoint", &self.endpoint.info())
            .field("settle", &self.config.settle)
            .field("alive_at_open", &self.alive_at_open)
            .finish()
    }
}
