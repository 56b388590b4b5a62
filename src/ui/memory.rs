use std::sync::Mutex;

use super::{Reporter, Severity};

/// Reporter that keeps every message, for tests and for callers that want
/// to inspect what happened
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in the order they were reported
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.lock().clone()
    }

    /// Messages of a single severity
    pub fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.with_severity(Severity::Error)
    }

    /// Whether any message of the given severity contains `needle`
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.with_severity(severity)
            .iter()
            .any(|text| text.contains(needle))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Severity, String)>> {
        // A poisoned log is still a usable log.
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, text: &str) {
        self.lock().push((severity, text.to_string()));
    }
}
