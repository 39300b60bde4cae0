//! Command/response client for microcontrollers on a serial console.
//!
//! uctrl writes text commands to a device, waits a fixed settle time, and
//! reads back whatever the device printed.
//!
//! # Crate Structure
//!
//! - [`transport`] — Byte endpoint abstraction (serial, Unix socket, in-memory)
//! - [`channel`] — Settle-timed command channel with liveness probe

/// Re-export transport types.
pub mod transport {
    pub use uctrl_transport::*;
}

/// Re-export channel types.
pub mod channel {
    pub use uctrl_channel::*;
}
