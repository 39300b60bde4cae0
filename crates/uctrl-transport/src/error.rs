/// Errors that can occur in endpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the named endpoint.
    #[error("failed to open {name}: {source}")]
    Open {
        name: String,
        source: std::io::Error,
    },

    /// The serial driver reported an error.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// An I/O error occurred on the endpoint.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint has been closed.
    #[error("endpoint closed")]
    Closed,
}

impl TransportError {
    /// The underlying I/O error kind, when there is one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            TransportError::Open { source, .. } | TransportError::Io(source) => {
                Some(source.kind())
            }
            TransportError::Serial(err) => match err.kind() {
                serialport::ErrorKind::Io(kind) => Some(kind),
                serialport::ErrorKind::NoDevice => Some(std::io::ErrorKind::NotFound),
                _ => None,
            },
            TransportError::Closed => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
