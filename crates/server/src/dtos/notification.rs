use chrono::NaiveDateTime;
use database::entities::notifications;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(m: notifications::Model) -> Self {
        Self {
            id: m.id,
            message: m.message,
            created_at: m.created_at,
        }
    }
}

/// Unread messages of the caller, newest first
#[derive(Debug, Serialize, ToSchema)]
pub struct InboxResponse {
    pub count: usize,
    pub notifications: Vec<NotificationResponse>,
}

impl From<Vec<notifications::Model>> for InboxResponse {
    fn from(unread: Vec<notifications::Model>) -> Self {
        Self {
            count: unread.len(),
            notifications: unread.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inbox_counts_messages() {
        let created_at = NaiveDate::from_ymd_opt(2024, 9, 1)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap();
        let unread = vec![notifications::Model {
            id: 7,
            recipient: "alice@school.org".to_string(),
            message: "You have been enrolled in Fall 2024 (Batch: A)".to_string(),
            is_read: false,
            created_at,
        }];

        let inbox = InboxResponse::from(unread);
        assert_eq!(inbox.count, 1);
        assert_eq!(inbox.notifications[0].id, 7);
        assert_eq!(inbox.notifications[0].created_at, created_at);
    }
}
