use crate::{auth::AdminUser, error::ApiError, state::AppState};
use axum::{Json, extract::State};
use database::services::{AnalyticsService, analytics::DashboardStats};

/// School-wide semester, enrollment and teaching figures
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics"),
        (status = 403, description = "Administrator role required")
    ),
    security(("jwt" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(AnalyticsService::dashboard_stats(&state.db).await?))
}
