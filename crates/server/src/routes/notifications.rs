use crate::{
    auth::AuthUser,
    dtos::{common::MessageResponse, notification::InboxResponse},
    error::ApiError,
    state::AppState,
};
use axum::{Json, extract::State};
use database::services::InboxService;

/// Unread notifications addressed to the caller's subject
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Unread notifications", body = InboxResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Notifications"
)]
pub async fn unread_notifications(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<InboxResponse>, ApiError> {
    let unread = InboxService::unread(&state.db, &actor.username).await?;
    Ok(Json(unread.into()))
}

#[utoipa::path(
    post,
    path = "/notifications/read",
    responses(
        (status = 200, description = "Every unread notification marked as read", body = MessageResponse)
    ),
    security(("jwt" = [])),
    tag = "Notifications"
)]
pub async fn mark_notifications_read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let marked = InboxService::mark_all_read(&state.db, &actor.username).await?;
    Ok(Json(MessageResponse::ok(format!(
        "{marked} notification(s) marked as read"
    ))))
}

#[utoipa::path(
    delete,
    path = "/notifications",
    responses(
        (status = 200, description = "Every notification of the caller deleted", body = MessageResponse)
    ),
    security(("jwt" = [])),
    tag = "Notifications"
)]
pub async fn clear_notifications(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let cleared = InboxService::clear(&state.db, &actor.username).await?;
    Ok(Json(MessageResponse::ok(format!(
        "{cleared} notification(s) cleared"
    ))))
}
