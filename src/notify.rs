use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// User-facing notification surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Sends notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => log::info!("✅ {}", notification.message),
            Severity::Error => log::error!("❌ {}", notification.message),
        }
    }
}

/// Keeps every notification in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_notifier_keeps_order() {
        let notifier = MemoryNotifier::new();
        notifier.success("first");
        notifier.error("second");

        let received = notifier.notifications();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0], Notification::success("first"));
        assert_eq!(received[1], Notification::error("second"));
        assert_eq!(notifier.count(Severity::Error), 1);
    }

    #[test]
    fn test_shared_notifier() {
        let notifier = Arc::new(MemoryNotifier::new());
        let shared: Arc<dyn Notifier> = notifier.clone();
        shared.success("done");
        assert_eq!(notifier.count(Severity::Success), 1);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Notification::error("boom")).unwrap();
        assert_eq!(json, r#"{"severity":"error","message":"boom"}"#);
    }
}
