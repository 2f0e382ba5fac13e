use crate::{
    auth::{AdminUser, AuthUser},
    dtos::{
        catalog::{PaginatedTeachersResponse, TeacherRequest, TeacherResponse},
        common::{MessageResponse, PaginationMeta, SearchParams},
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::TeacherService;

/// Search active teachers
#[utoipa::path(
    get,
    path = "/teachers",
    params(SearchParams),
    responses(
        (status = 200, description = "Page of teachers", body = PaginatedTeachersResponse)
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<PaginatedTeachersResponse>, ApiError> {
    let (teachers, total_items) = TeacherService::search(
        &state.db,
        params.search.as_deref(),
        params.page,
        params.per_page,
    )
    .await?;

    Ok(Json(PaginatedTeachersResponse {
        teachers: teachers.into_iter().map(Into::into).collect(),
        pagination: PaginationMeta::new(params.page, params.per_page, total_items),
    }))
}

#[utoipa::path(
    get,
    path = "/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher found", body = TeacherResponse),
        (status = 404, description = "Teacher not found")
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn get_teacher(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<TeacherResponse>, ApiError> {
    Ok(Json(TeacherService::get(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/teachers",
    request_body = TeacherRequest,
    responses(
        (status = 200, description = "Teacher created", body = TeacherResponse),
        (status = 400, description = "Invalid input or duplicate username/email")
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<TeacherRequest>,
) -> Result<Json<TeacherResponse>, ApiError> {
    Ok(Json(TeacherService::create(&state.db, req.into()).await?.into()))
}

#[utoipa::path(
    put,
    path = "/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    request_body = TeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 404, description = "Teacher not found")
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<TeacherRequest>,
) -> Result<Json<TeacherResponse>, ApiError> {
    Ok(Json(
        TeacherService::update(&state.db, id, req.into())
            .await?
            .into(),
    ))
}

/// Mark a teacher inactive; they can no longer be assigned to subjects
#[utoipa::path(
    post,
    path = "/teachers/{id}/deactivate",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deactivated", body = TeacherResponse),
        (status = 404, description = "Teacher not found")
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn deactivate_teacher(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<TeacherResponse>, ApiError> {
    Ok(Json(TeacherService::deactivate(&state.db, id).await?.into()))
}

/// Delete a teacher; subjects they taught are left without a teacher
#[utoipa::path(
    delete,
    path = "/teachers/{id}",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 404, description = "Teacher not found")
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    TeacherService::delete(&state.db, id).await?;
    Ok(Json(MessageResponse::ok("Teacher deleted")))
}
