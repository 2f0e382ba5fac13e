use crate::{auth::AuthUser, dtos::common::MeResponse};
use axum::Json;

/// Returns the caller's subject identifier and role
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Successfully authenticated", body = MeResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(AuthUser(actor): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        subject: actor.username,
        is_admin: actor.is_admin,
    })
}
