use std::time::Duration;

/// Default wait between writing a command and reading its output.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(2);

/// Command whose output is expected to contain its own name.
pub const DEFAULT_PROBE_COMMAND: &str = "help";

/// Terminator appended to each command before it is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// Write the command text exactly as given.
    #[default]
    None,
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::None => b"",
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Configuration for a [`CommandChannel`](crate::CommandChannel).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Worst-case device turnaround. Every write is followed by this wait.
    pub settle: Duration,
    /// Command sent by the liveness probe.
    pub probe_command: String,
    /// Substring that must appear in the probe output.
    pub probe_marker: String,
    pub line_ending: LineEnding,
}

impl ChannelConfig {
    pub fn with_settle(settle: Duration) -> Self {
        Self {
            settle,
            ..Self::default()
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            probe_command: DEFAULT_PROBE_COMMAND.to_string(),
            probe_marker: DEFAULT_PROBE_COMMAND.to_string(),
            line_ending: LineEnding::None,
        }
    }
}
