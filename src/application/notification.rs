// src/application/notification.rs
//
// Transient, single-slot notifications. A new one replaces the old one;
// each disappears on its own after `dismiss_after`.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::catalog::MutationOutcome;

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

impl Notification {
    pub fn is_expired_at(&self, now: Instant, dismiss_after: Duration) -> bool {
        now.saturating_duration_since(self.shown_at) >= dismiss_after
    }
}

pub struct Notifier {
    dismiss_after: Duration,
    slot: Mutex<Option<Notification>>,
}

impl Notifier {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            slot: Mutex::new(None),
        }
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) {
        let notification = Notification {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        };
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(notification);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, NotificationKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, NotificationKind::Error);
    }

    pub fn report(&self, outcome: &MutationOutcome) {
        if outcome.success {
            self.success(outcome.message.clone());
        } else {
            self.error(outcome.message.clone());
        }
    }

    /// The visible notification, if it has not timed out yet
    pub fn current(&self) -> Option<Notification> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<Notification> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot
            .as_ref()
            .is_some_and(|n| n.is_expired_at(now, self.dismiss_after))
        {
            *slot = None;
        }
        slot.clone()
    }

    pub fn dismiss(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_replaces_previous() {
        let notifier = Notifier::default();
        notifier.success("Entry added");
        notifier.error("Failed to delete entry");

        let current = notifier.current().unwrap();
        assert_eq!(current.kind, NotificationKind::Error);
        assert_eq!(current.message, "Failed to delete entry");
    }

    #[test]
    fn test_notification_expires() {
        let notifier = Notifier::new(Duration::from_millis(3000));
        notifier.success("Entry updated");

        let shown_at = notifier.current().unwrap().shown_at;
        assert!(notifier.current_at(shown_at + Duration::from_millis(2999)).is_some());
        assert!(notifier.current_at(shown_at + Duration::from_millis(3000)).is_none());

        // stays gone
        assert!(notifier.current_at(shown_at).is_none());
    }

    #[test]
    fn test_report_follows_outcome() {
        let notifier = Notifier::default();
        notifier.report(&MutationOutcome::fail("nope"));
        assert_eq!(notifier.current().unwrap().kind, NotificationKind::Error);

        notifier.report(&MutationOutcome::ok("yes"));
        assert_eq!(notifier.current().unwrap().kind, NotificationKind::Success);

        notifier.dismiss();
        assert!(notifier.current().is_none());
    }
}
