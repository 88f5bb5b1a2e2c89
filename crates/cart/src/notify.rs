//! User-visible notifications.
//!
//! Cart failures are reported to the shopper through a [`Notifier`] (a toast
//! in a browser UI, a stderr line in the CLI) before the operation returns.

use std::sync::{Arc, Mutex};

/// Sink for shopper-facing error messages.
pub trait Notifier: Send + Sync {
    /// Show an error message.
    fn error(&self, message: &str);
}

/// Notifier that emits each message as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes_cart::notify", "{message}");
    }
}

/// Notifier that keeps every message, for assertions in tests.
///
/// Clones share the same message list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_shares_messages() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();

        notifier.error("first");
        handle.error("second");

        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }
}
