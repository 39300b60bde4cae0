use std::fmt;

use crate::error::Result;

/// A duplex byte endpoint connected to a device.
///
/// This is the whole surface the command channel consumes: `name`, `write`,
/// `read_all` and `close`. Any serial port, pseudo-terminal or socket that
/// can provide these operations is interchangeable.
pub trait Endpoint {
    /// Identifying name the endpoint was opened with (port path, socket path).
    fn name(&self) -> &str;

    /// Transport kind, used for diagnostics only.
    fn kind(&self) -> TransportKind {
        TransportKind::Unknown
    }

    /// Write the whole payload to the device.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Return every byte currently buffered, without waiting for more.
    ///
    /// Returns an empty vector when nothing is available.
    fn read_all(&mut self) -> Result<Vec<u8>>;

    /// Close the endpoint. Later I/O fails with [`TransportError::Closed`].
    ///
    /// [`TransportError::Closed`]: crate::TransportError::Closed
    fn close(&mut self) -> Result<()>;

    /// Snapshot of the endpoint identity.
    fn info(&self) -> EndpointInfo {
        EndpointInfo {
            name: self.name().to_string(),
            kind: self.kind(),
        }
    }
}

impl<E: Endpoint + ?Sized> Endpoint for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn kind(&self) -> TransportKind {
        (**self).kind()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        (**self).read_all()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Endpoints that can be opened by name.
///
/// Kept apart from [`Endpoint`] so the trait stays object safe and each
/// transport can carry its own options.
pub trait OpenEndpoint: Endpoint + Sized {
    type Options: Default;

    fn open(name: &str, options: &Self::Options) -> Result<Self>;
}

/// Open `name` as an `E` and erase the concrete type.
pub fn open_boxed<E>(name: &str, options: &E::Options) -> Result<Box<dyn Endpoint>>
where
    E: OpenEndpoint + 'static,
{
    Ok(Box::new(E::open(name, options)?))
}

/// Kind of transport behind an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    Serial,
    Socket,
    Memory,
    Unknown,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Serial => "serial",
            TransportKind::Socket => "unix-socket",
            TransportKind::Memory => "memory",
            TransportKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and kind of an endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointInfo {
    pub name: String,
    pub kind: TransportKind,
}

impl fmt::Display for EndpointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
