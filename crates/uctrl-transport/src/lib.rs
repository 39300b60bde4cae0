//! Byte endpoint abstraction for microcontroller links.
//!
//! Provides one capability set over the different ways a device can be
//! reached:
//! - Serial ports (USB CDC, UART bridges)
//! - Unix domain sockets (simulators, pty bridges)
//! - In-memory scripted endpoints (tests)
//!
//! This is the lowest layer of uctrl. The command channel builds on the
//! [`Endpoint`] trait defined here and never touches a concrete port type.

pub mod endpoint;
pub mod error;
pub mod memory;
pub mod serial;

#[cfg(unix)]
pub mod socket;

pub use endpoint::{open_boxed, Endpoint, EndpointInfo, OpenEndpoint, TransportKind};
pub use error::{Result, TransportError};
pub use memory::{MemoryEndpoint, ScriptedRead};
pub use serial::{available_ports, PortSummary, SerialEndpoint, SerialOptions};

#[cfg(unix)]
pub use socket::SocketEndpoint;
