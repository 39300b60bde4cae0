/// Errors that can occur in channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Endpoint-level error.
    #[error("transport error: {0}")]
    Transport(#[from] uctrl_transport::TransportError),

    /// The command is not valid text.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
