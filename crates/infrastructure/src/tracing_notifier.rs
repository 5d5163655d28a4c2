use autonomo_application::Notifier;
use tracing::{error, info};

/// Notifier rendering toasts as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(toast = "success", "{message}");
    }

    fn error(&self, message: &str) {
        error!(toast = "error", "{message}");
    }
}
