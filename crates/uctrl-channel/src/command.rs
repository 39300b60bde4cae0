use std::fmt;

use crate::config::LineEnding;
use crate::error::{ChannelError, Result};

/// A textual command for the device's console interpreter.
///
/// The only structural requirement is that it is text. Anything built from
/// `&str` or `String` already is; raw bytes go through [`Command::from_utf8`],
/// which rejects them before any I/O happens.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Command(String);

impl Command {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Validate raw bytes as a command.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .map(|text| Self(text.to_string()))
            .map_err(|err| ChannelError::InvalidCommand(format!("not valid UTF-8 text: {err}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes put on the wire, with the configured terminator appended.
    pub fn encode(&self, line_ending: LineEnding) -> Vec<u8> {
        let suffix = line_ending.as_bytes();
        let mut out = Vec::with_capacity(self.0.len() + suffix.len());
        out.extend_from_slice(self.0.as_bytes());
        out.extend_from_slice(suffix);
        out
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&String> for Command {
    fn from(text: &String) -> Self {
        Self(text.clone())
    }
}

impl TryFrom<Vec<u8>> for Command {
    type Error = ChannelError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes)
            .map(Self)
            .map_err(|err| ChannelError::InvalidCommand(format!("not valid UTF-8 text: {err}")))
    }
}

impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
