//! User-facing notifications.
//!
//! The relay never renders anything itself; it hands short messages with a
//! severity to a [`Notifier`] and lets the embedding surface decide how to
//! present them.

use serde::Serialize;
use std::sync::Mutex;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation collaborator for submission progress and outcomes.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Writes notifications to stderr, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        eprintln!("[{}] {}", severity, message);
    }
}

/// Forwards notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => {
                tracing::info!(severity = %severity, "{}", message)
            }
            Severity::Warning => tracing::warn!(severity = %severity, "{}", message),
            Severity::Error => tracing::error!(severity = %severity, "{}", message),
        }
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Messages of one severity.
    pub fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    /// The most recent notification, if any.
    pub fn last(&self) -> Option<(Severity, String)> {
        self.messages().pop()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_keeps_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify("first", Severity::Info);
        notifier.notify("second", Severity::Warning);
        notifier.notify("third", Severity::Warning);

        assert_eq!(notifier.messages().len(), 3);
        assert_eq!(notifier.with_severity(Severity::Warning), vec!["second", "third"]);
        assert_eq!(notifier.last(), Some((Severity::Warning, "third".to_string())));
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
    }
}
