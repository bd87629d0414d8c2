//! Logging collaborator for the accessors.
//!
//! The accessor hands a fully formatted, error-level message to a [`Logger`].
//! Sinks, formatting and persistence belong to the implementation.

use std::sync::Mutex;

/// Default tag attached to diagnostics emitted through [`TracingLogger`].
pub const DEFAULT_LOG_TAG: &str = "SafeTypes";

/// Sink for accessor diagnostics.
///
/// Implementations must tolerate concurrent calls from multiple threads.
pub trait Logger: Send + Sync {
    fn error(&self, message: &str);
}

/// Simple function-based implementation of Logger
impl<F> Logger for F
where
    F: Fn(&str) + Send + Sync,
{
    fn error(&self, message: &str) {
        self(message)
    }
}

/// Forwards diagnostics to `tracing` at error level, tagged.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    tag: String,
}

impl TracingLogger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_TAG)
    }
}

impl Logger for TracingLogger {
    fn error(&self, message: &str) {
        tracing::error!(tag = %self.tag, "{}", message);
    }
}

/// Append-only in-memory sink.
///
/// Useful for tests and for hosts that batch diagnostics themselves.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message recorded so far.
    pub fn messages(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.lines.lock() {
            Ok(lines) => lines.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Logger for MemoryLogger {
    fn error(&self, message: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(message.to_string());
    }
}
