use crate::entities::notifications;
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Could not notify {recipient}: {reason}")]
pub struct NotifyError {
    pub recipient: String,
    pub reason: String,
}

/// Best-effort side channel for human-readable change messages
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, message: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub message: String,
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Messages delivered to one recipient, oldest first
    pub fn messages_for(&self, recipient: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|n| n.recipient == recipient)
            .map(|n| n.message)
            .collect()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        let mut sent = self.sent.lock().map_err(|e| NotifyError {
            recipient: recipient.to_string(),
            reason: e.to_string(),
        })?;

        sent.push(Notification {
            recipient: recipient.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Stores notifications as unread rows of the `notifications` table
///
/// Recipients read them back through [`super::inbox::InboxService`].
#[derive(Debug, Clone)]
pub struct DbNotifier {
    db: DatabaseConnection,
}

impl DbNotifier {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Notifier for DbNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        notifications::ActiveModel {
            recipient: Set(recipient.to_string()),
            message: Set(message.to_string()),
            is_read: Set(false),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| NotifyError {
            recipient: recipient.to_string(),
            reason: e.to_string(),
        })?;
        info!("Notification for {recipient}: {message}");
        Ok(())
    }
}

/// Notifications collected while a transaction is open
///
/// Nothing is sent until [`Outbox::deliver`] is called after commit, so a
/// rolled back operation never announces a change that did not happen.
#[derive(Debug, Default)]
pub struct Outbox {
    pending: Vec<Notification>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, recipient: impl Into<String>, message: impl Into<String>) {
        self.pending.push(Notification {
            recipient: recipient.into(),
            message: message.into(),
        });
    }

    /// Moves everything from `other` into this outbox
    pub fn append(&mut self, other: Outbox) {
        self.pending.extend(other.pending);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub async fn deliver(self, notifier: &dyn Notifier) {
        if self.is_empty() {
            return;
        }

        for notification in self.pending {
            if let Err(e) = notifier
                .notify(&notification.recipient, &notification.message)
                .await
            {
                warn!("Dropping notification: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    #[async_trait]
    impl Notifier for Unreachable {
        async fn notify(&self, recipient: &str, _message: &str) -> Result<(), NotifyError> {
            Err(NotifyError {
                recipient: recipient.to_string(),
                reason: "mailbox offline".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_outbox_delivers_in_order() {
        let notifier = MemoryNotifier::new();
        let mut outbox = Outbox::new();
        outbox.push("a@school.org", "first");
        outbox.push("admin", "second");
        outbox.push("a@school.org", "third");
        outbox.deliver(&notifier).await;

        assert_eq!(notifier.messages_for("a@school.org"), vec!["first", "third"]);
        assert_eq!(notifier.sent().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_swallowed() {
        let mut outbox = Outbox::new();
        outbox.push("a@school.org", "hello");
        outbox.deliver(&Unreachable).await;
    }

    #[tokio::test]
    async fn test_append_merges_pending() {
        let mut main = Outbox::new();
        let mut item = Outbox::new();
        item.push("x", "y");
        assert!(!item.is_empty());
        main.append(item);

        let notifier = MemoryNotifier::new();
        main.deliver(&notifier).await;
        assert_eq!(notifier.messages_for("x"), vec!["y"]);
    }

    #[tokio::test]
    async fn test_empty_outbox_sends_nothing() {
        let outbox = Outbox::new();
        assert!(outbox.is_empty());

        let notifier = MemoryNotifier::new();
        outbox.deliver(&notifier).await;
        assert!(notifier.sent().is_empty());
    }
}
