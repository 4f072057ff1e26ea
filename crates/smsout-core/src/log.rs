//! Diagnostic log sink, always passed in as an explicit collaborator.
//! Logging is fire-and-forget: it never blocks or alters a dispatch
//! outcome.

use std::sync::{Arc, Mutex};

/// Fire-and-forget diagnostic sink.
pub trait LogSink: Send + Sync {
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Forwards to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn error(&self, message: &str) {
        tracing::error!(target: "smsout", "{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "smsout", "{message}");
    }
}

/// Captures entries for assertions in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    errors: Arc<Mutex<Vec<String>>>,
    warnings: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        lock(&self.warnings).clone()
    }
}

impl LogSink for MemoryLog {
    fn error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }

    fn warning(&self, message: &str) {
        lock(&self.warnings).push(message.to_string());
    }
}

fn lock(entries: &Mutex<Vec<String>>) -> std::sync::MutexGuard<'_, Vec<String>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
