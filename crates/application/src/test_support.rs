use std::sync::Mutex;

use crate::ports::Notifier;

/// Toast raised during a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Toast {
    Success(String),
    Error(String),
}

/// Notifier that records every toast.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub(crate) fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter_map(|toast| match toast {
                Toast::Error(message) => Some(message),
                Toast::Success(_) => None,
            })
            .collect()
    }

    fn push(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(Toast::Success(message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.push(Toast::Error(message.to_owned()));
    }
}
