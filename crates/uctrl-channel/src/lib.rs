//! Command/response channel for a microcontroller console.
//!
//! The device firmware has no framing, acknowledgement or handshake: the
//! host writes a text command, waits a fixed settle time, and then takes
//! whatever bytes the device has produced. [`CommandChannel`] enforces
//! that discipline on top of any [`uctrl_transport::Endpoint`].

pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod response;
pub mod settle;

pub use channel::CommandChannel;
pub use command::Command;
pub use config::{ChannelConfig, LineEnding, DEFAULT_PROBE_COMMAND, DEFAULT_SETTLE};
pub use error::{ChannelError, Result};
pub use response::Response;
pub use settle::{Settle, ThreadSleep};
