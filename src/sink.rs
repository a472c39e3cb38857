use std::sync::Mutex;

/// Host channel for user-visible messages.
pub trait MessageSink: Send + Sync {
    fn error(&self, message: &str);
}

/// Reports messages through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn error(&self, message: &str) {
        log::error!("[git_log] {}", message);
    }
}

/// Keeps every message in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl MessageSink for CollectingSink {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
