//! Ephemeral notifications
//!
//! Actions publish and move on. Views subscribe to the broadcast channel or
//! poll [`Notifier::active`]; entries expire on their own after the TTL.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::value_objects::NotificationId;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

pub struct Notifier {
    ttl: Duration,
    sender: broadcast::Sender<Notification>,
    active: Mutex<Vec<Notification>>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            ttl,
            sender,
            active: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Publish a message. Never fails, with or without subscribers.
    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> NotificationId {
        let notification = Notification {
            id: NotificationId::new(),
            level,
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        };
        debug!(notification_id = %notification.id, level = ?level, "{}", notification.message);
        let id = notification.id;
        {
            let mut active = self.active.lock().unwrap_or_else(|p| p.into_inner());
            let now = Instant::now();
            active.retain(|n| n.expires_at > now);
            active.push(notification.clone());
        }
        let _ = self.sender.send(notification);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.push(NotificationLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.push(NotificationLevel::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.push(NotificationLevel::Info, message)
    }

    pub fn dismiss(&self, id: NotificationId) {
        let mut active = self.active.lock().unwrap_or_else(|p| p.into_inner());
        active.retain(|n| n.id != id);
    }

    /// Notifications that have not yet expired, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let mut active = self.active.lock().unwrap_or_else(|p| p.into_inner());
        let now = Instant::now();
        active.retain(|n| n.expires_at > now);
        active.clone()
    }
}
