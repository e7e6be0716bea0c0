//! Transient user-facing messages.
//!
//! Notifications are pushed by the reducers and expire through a delayed
//! [`DismissNotification`](crate::actions::AppAction::DismissNotification)
//! action. Only the newest [`MAX_VISIBLE`] are kept.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt;

/// How many notifications can be visible at once.
pub const MAX_VISIBLE: usize = 3;

/// Identifier used to dismiss one notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notification category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// A workflow completed
    Success,
    /// Validation or API failure
    Error,
}

/// One visible message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Dismissal handle
    pub id: NotificationId,
    /// Category
    pub kind: NotificationKind,
    /// Text shown to the user
    pub message: String,
    /// When it was raised
    pub raised_at: DateTime<Utc>,
}

/// The visible notifications, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notifications {
    items: VecDeque<Notification>,
    next_id: u64,
}

impl Notifications {
    /// Adds a notification, dropping the oldest beyond [`MAX_VISIBLE`].
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        raised_at: DateTime<Utc>,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);

        self.items.push_back(Notification {
            id,
            kind,
            message: message.into(),
            raised_at,
        });
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }

        id
    }

    /// Removes `id`; returns false when it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Visible notifications, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// Most recent notification
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    /// Number of visible notifications
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every visible notification
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_three() {
        let mut notifications = Notifications::default();
        let now = Utc::now();
        let first = notifications.push(NotificationKind::Info, "one", now);
        for message in ["two", "three", "four"] {
            notifications.push(NotificationKind::Info, message, now);
        }

        assert_eq!(notifications.len(), MAX_VISIBLE);
        assert!(!notifications.dismiss(first));
        let messages: Vec<_> = notifications.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["two", "three", "four"]);
    }

    #[test]
    fn dismiss_removes_only_that_notification() {
        let mut notifications = Notifications::default();
        let now = Utc::now();
        let error = notifications.push(NotificationKind::Error, "boom", now);
        notifications.push(NotificationKind::Success, "done", now);

        assert!(notifications.dismiss(error));
        assert_eq!(notifications.latest().map(|n| n.kind), Some(NotificationKind::Success));
        assert_eq!(notifications.len(), 1);
    }
}
