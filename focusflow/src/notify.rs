//! Transient notifications ("toasts") shown in the status bar.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// An operation succeeded.
    Success,
    /// An operation failed.
    Error,
    /// Neutral information.
    Info,
}

/// A single message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: Level,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// A success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    /// An error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// An informational notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }
}

/// Maximum notifications kept at once; older ones are dropped first.
const MAX_VISIBLE: usize = 5;

/// Holds live notifications until their time-to-live runs out.
#[derive(Debug)]
pub struct NotificationCenter {
    ttl: Duration,
    entries: VecDeque<(Instant, Notification)>,
}

impl NotificationCenter {
    /// Creates an empty center whose notifications live for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: VecDeque::new(),
        }
    }

    /// Adds a notification, stamped now.
    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    /// Adds a notification stamped at `at`.
    pub fn push_at(&mut self, notification: Notification, at: Instant) {
        match notification.level {
            Level::Error => tracing::warn!(message = %notification.message, "notify"),
            Level::Success | Level::Info => {
                tracing::debug!(message = %notification.message, "notify");
            }
        }
        if self.entries.len() == MAX_VISIBLE {
            self.entries.pop_front();
        }
        self.entries.push_back((at, notification));
    }

    /// Drops notifications older than the TTL as of `now`.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|(at, _)| now.saturating_duration_since(*at) < ttl);
    }

    /// The newest live notification.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back().map(|(_, n)| n)
    }

    /// Live notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().map(|(_, n)| n)
    }

    /// Number of live notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no notification is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
