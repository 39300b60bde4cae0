use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::debug;

use crate::endpoint::{Endpoint, OpenEndpoint, TransportKind};
use crate::error::{Result, TransportError};

/// Unix domain socket endpoint.
///
/// Connects to a listening socket, typically a device simulator or a
/// bridge that forwards a pseudo-terminal. Reads drain the socket in
/// non-blocking mode so `read_all` never waits for more data.
pub struct SocketEndpoint {
    name: String,
    stream: Option<UnixStream>,
}

impl SocketEndpoint {
    const READ_CHUNK: usize = 4096;

    /// Connect to a listening Unix domain socket (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let stream = UnixStream::connect(path).map_err(|source| TransportError::Open {
            name: name.clone(),
            source,
        })?;
        debug!(?path, "connected to unix domain socket");
        Ok(Self::from_stream(name, stream))
    }

    /// Wrap an already-connected stream.
    pub fn from_stream(name: impl Into<String>, stream: UnixStream) -> Self {
        Self {
            name: name.into(),
            stream: Some(stream),
        }
    }

    fn stream(&mut self) -> Result<&mut UnixStream> {
        self.stream.as_mut().ok_or(TransportError::Closed)
    }
}

impl Endpoint for SocketEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Socket
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream()?;
        stream.write_all(bytes)?;
        stream.flush()?;
        debug!(len = bytes.len(), "socket write");
        Ok(())
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        let stream = self.stream()?;
        stream.set_nonblocking(true)?;

        let mut out = Vec::new();
        let mut chunk = [0u8; Self::READ_CHUNK];
        let outcome = loop {
            match stream.read(&mut chunk) {
                // Peer hung up; hand back whatever was buffered.
                Ok(0) => break Ok(()),
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == ErrorKind::WouldBlock => break Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => break Err(err),
            }
        };

        stream.set_nonblocking(false)?;
        outcome?;
        debug!(len = out.len(), "socket read");
        Ok(out)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            match stream.shutdown(std::net::Shutdown::Both) {
                Ok(()) => {}
                // The peer may already be gone.
                Err(err) if err.kind() == ErrorKind::NotConnected => {}
                Err(err) => return Err(err.into()),
            }
            debug!(path = %self.name, "closed unix domain socket");
        }
        Ok(())
    }
}

impl OpenEndpoint for SocketEndpoint {
    type Options = ();

    fn open(name: &str, _options: &()) -> Result<Self> {
        SocketEndpoint::connect(name)
    }
}

impl std::fmt::Debug for SocketEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketEndpoint")
            .field("name", &self.name)
            .field("open", &self.stream.is_some())
            .finish()
    }
}
