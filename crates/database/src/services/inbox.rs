use crate::{entities::notifications, services::error::ServiceResult};
use log::info;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, sea_query::Expr,
};

/// Per-recipient view over the messages stored by [`super::notify::DbNotifier`]
pub struct InboxService;

impl InboxService {
    /// Unread messages, newest first
    pub async fn unread(
        db: &DatabaseConnection,
        recipient: &str,
    ) -> ServiceResult<Vec<notifications::Model>> {
        Ok(notifications::Entity::find()
            .filter(notifications::Column::Recipient.eq(recipient))
            .filter(notifications::Column::IsRead.eq(false))
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .all(db)
            .await?)
    }

    /// Marks every unread message of `recipient` as read; returns how many changed
    pub async fn mark_all_read(db: &DatabaseConnection, recipient: &str) -> ServiceResult<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::Recipient.eq(recipient))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes every message of `recipient`, read or not
    pub async fn clear(db: &DatabaseConnection, recipient: &str) -> ServiceResult<u64> {
        let result = notifications::Entity::delete_many()
            .filter(notifications::Column::Recipient.eq(recipient))
            .exec(db)
            .await?;

        info!(
            "Cleared {} notification(s) of {recipient}",
            result.rows_affected
        );
        Ok(result.rows_affected)
    }
}
