use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::endpoint::{Endpoint, TransportKind};
use crate::error::{Result, TransportError};

/// One scripted outcome for a `read_all` call.
#[derive(Clone, Debug)]
pub enum ScriptedRead {
    Data(Vec<u8>),
    Fail(io::ErrorKind),
}

#[derive(Default)]
struct State {
    reads: VecDeque<ScriptedRead>,
    replies: Vec<(Vec<u8>, Vec<u8>)>,
    writes: Vec<Vec<u8>>,
    read_calls: usize,
    write_failure: Option<io::ErrorKind>,
    close_failure: Option<io::ErrorKind>,
    closed: bool,
}

/// Scripted in-memory endpoint.
///
/// Clones share state, so a test can keep a handle and inspect what the
/// channel wrote after handing the endpoint over.
#[derive(Clone)]
pub struct MemoryEndpoint {
    name: String,
    state: Arc<Mutex<State>>,
}

impl MemoryEndpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::default(),
        }
    }

    /// Queue bytes returned by the next unscripted `read_all`.
    pub fn with_read(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.push_read(bytes);
        self
    }

    /// Queue a failing read.
    pub fn with_read_error(self, kind: io::ErrorKind) -> Self {
        self.lock().reads.push_back(ScriptedRead::Fail(kind));
        self
    }

    /// Whenever a write contains `trigger`, queue `response` for reading.
    pub fn with_reply(self, trigger: impl Into<Vec<u8>>, response: impl Into<Vec<u8>>) -> Self {
        self.lock().replies.push((trigger.into(), response.into()));
        self
    }

    /// Make every write fail with `kind`.
    pub fn with_write_error(self, kind: io::ErrorKind) -> Self {
        self.lock().write_failure = Some(kind);
        self
    }

    /// Make `close` fail with `kind` and leave the endpoint open.
    pub fn with_close_error(self, kind: io::ErrorKind) -> Self {
        self.lock().close_failure = Some(kind);
        self
    }

    pub fn push_read(&self, bytes: impl Into<Vec<u8>>) {
        self.lock().reads.push_back(ScriptedRead::Data(bytes.into()));
    }

    pub fn clear_write_error(&self) {
        self.lock().write_failure = None;
    }

    /// Every payload written so far, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    pub fn read_count(&self) -> usize {
        self.lock().read_calls
    }

    /// Scripted reads not yet consumed.
    pub fn pending_reads(&self) -> usize {
        self.lock().reads.len()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test thread panicked mid-call.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Endpoint for MemoryEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Memory
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        if let Some(kind) = state.write_failure {
            return Err(io::Error::new(kind, "scripted write failure").into());
        }
        state.writes.push(bytes.to_vec());

        let matched: Vec<Vec<u8>> = state
            .replies
            .iter()
            .filter(|(trigger, _)| contains(bytes, trigger))
            .map(|(_, response)| response.clone())
            .collect();
        for response in matched {
            state.reads.push_back(ScriptedRead::Data(response));
        }

        trace!(name = %self.name, len = bytes.len(), "memory write");
        Ok(())
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut state = self.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        state.read_calls += 1;
        match state.reads.pop_front() {
            Some(ScriptedRead::Data(bytes)) => Ok(bytes),
            Some(ScriptedRead::Fail(kind)) => {
                Err(io::Error::new(kind, "scripted read failure").into())
            }
            None => Ok(Vec::new()),
        }
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.lock();
        if let Some(kind) = state.close_failure {
            return Err(io::Error::new(kind, "scripted close failure").into());
        }
        state.closed = true;
        Ok(())
    }
}

impl std::fmt::Debug for MemoryEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEndpoint")
            .field("name", &self.name)
            .finish()
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
