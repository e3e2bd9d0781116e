use std::sync::{Arc, Mutex};

use log::Level;

/// Destination for decoder diagnostics.
///
/// The decoder reports recoverable conditions (discarded frames, unknown
/// record codes, signal-quality warnings) through a sink owned by its reader
/// rather than through a process-global logger. Hosts that render their own
/// console hand in a collecting sink; everyone else gets [`LogSink`].
pub trait MessageSink: Send {
    fn emit(&mut self, level: Level, message: &str);
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn emit(&mut self, level: Level, message: &str) {
        log::log!(level, "{}", message);
    }
}

/// Collects messages in memory behind a clonable handle.
///
/// Clones share one buffer, so a test or a UI console pane can keep a handle
/// while the reader owns the sink it writes to.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<(Level, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    /// True if any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl MessageSink for MemorySink {
    fn emit(&mut self, level: Level, message: &str) {
        self.messages.lock().unwrap().push((level, message.to_string()));
    }
}
