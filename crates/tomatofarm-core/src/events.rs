use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Lifecycle notifications emitted while a work day runs.
/// The farm only produces them; rendering is up to the [`Messenger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// The running tomato is about to be due.
    TomatoWarning,
    TomatoFinished,
    BreakWarning,
    BreakFinished,
    LongBreakWarning,
    LongBreakFinished,
}

impl Notification {
    /// Short human-readable message for console/tray rendering.
    pub fn message(self) -> &'static str {
        match self {
            Notification::TomatoWarning => "Tomato almost done",
            Notification::TomatoFinished => "Tomato finished, take a break",
            Notification::BreakWarning => "Break almost over",
            Notification::BreakFinished => "Break over, start a new tomato when ready",
            Notification::LongBreakWarning => "Long break almost over",
            Notification::LongBreakFinished => "Long break over, start a new round when ready",
        }
    }
}

/// Notification sink. Fire-and-forget; implementations must not block.
pub trait Messenger: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl Messenger for UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!(?notification, "notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_messenger_forwards_notifications() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.notify(Notification::BreakWarning);
        tx.notify(Notification::LongBreakFinished);

        assert_eq!(rx.try_recv().unwrap(), Notification::BreakWarning);
        assert_eq!(rx.try_recv().unwrap(), Notification::LongBreakFinished);
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        tx.notify(Notification::TomatoFinished);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&Notification::LongBreakWarning).unwrap();
        assert_eq!(json, r#"{"type":"long_break_warning"}"#);
    }
}
