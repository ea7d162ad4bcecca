//! The single transient notification slot (the toast).
//!
//! Only one notification is visible at a time. Showing a new one replaces
//! the previous notification together with its dismiss timer, so a timer
//! armed for an older notification can never hide a newer one.

use std::time::{Duration, Instant};

/// How long a success notification stays visible.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(2);

/// How long an error notification stays visible.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Upper bound on how long a progress notification stays up if no later
/// step replaces it.
pub const PENDING_TIMEOUT: Duration = Duration::from_secs(3);

/// Visual category of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// A flow step is in progress. Normally replaced by the next step.
    Pending,
    Success,
    Error,
}

impl NotificationKind {
    /// Auto-dismiss delay.
    pub fn dismiss_after(&self) -> Duration {
        match self {
            NotificationKind::Pending => PENDING_TIMEOUT,
            NotificationKind::Success => SUCCESS_DISMISS_AFTER,
            NotificationKind::Error => ERROR_DISMISS_AFTER,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Pending => "⏳",
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
        }
    }
}

/// A visible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Deadline armed for one specific notification.
#[derive(Clone, Copy, Debug)]
struct DismissTimer {
    deadline: Instant,
    sequence: u64,
}

/// Owner of the one notification slot and its dismiss timer.
#[derive(Debug, Default)]
pub struct NotificationSlot {
    current: Option<Notification>,
    timer: Option<DismissTimer>,
    sequence: u64,
}

impl NotificationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a notification, replacing whatever was visible.
    ///
    /// Returns the sequence number assigned to the notification.
    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) -> u64 {
        self.sequence += 1;
        self.current = Some(Notification {
            kind,
            message: message.into(),
        });
        self.timer = Some(DismissTimer {
            deadline: now + kind.dismiss_after(),
            sequence: self.sequence,
        });
        self.sequence
    }

    /// Hides the notification if its own timer has elapsed.
    ///
    /// Returns whether a notification was hidden.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.timer {
            Some(timer) if timer.sequence == self.sequence && now >= timer.deadline => {
                self.current = None;
                self.timer = None;
                true
            }
            _ => false,
        }
    }

    /// Hides the current notification immediately.
    pub fn dismiss(&mut self) {
        self.current = None;
        self.timer = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Number of notifications shown so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}
