use crate::{
    auth::{AdminUser, AuthUser},
    dtos::{
        catalog::{SubjectRequest, SubjectResponse},
        common::MessageResponse,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use database::services::SubjectService;

#[utoipa::path(
    get,
    path = "/subjects",
    responses(
        (status = 200, description = "Active subjects ordered by name", body = Vec<SubjectResponse>)
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn list_subjects(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
    let subjects = SubjectService::list(&state.db).await?;
    Ok(Json(subjects.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/subjects/{id}",
    params(("id" = i32, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject found", body = SubjectResponse),
        (status = 404, description = "Subject not found")
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn get_subject(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<SubjectResponse>, ApiError> {
    Ok(Json(SubjectService::get(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/subjects",
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Invalid input")
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<SubjectRequest>,
) -> Result<Json<SubjectResponse>, ApiError> {
    Ok(Json(SubjectService::create(&state.db, req.into()).await?.into()))
}

#[utoipa::path(
    put,
    path = "/subjects/{id}",
    params(("id" = i32, Path, description = "Subject ID")),
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectResponse),
        (status = 404, description = "Subject not found")
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn update_subject(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<SubjectRequest>,
) -> Result<Json<SubjectResponse>, ApiError> {
    Ok(Json(
        SubjectService::update(&state.db, id, req.into())
            .await?
            .into(),
    ))
}

/// Delete a subject that no semester offers
#[utoipa::path(
    delete,
    path = "/subjects/{id}",
    params(("id" = i32, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted", body = MessageResponse),
        (status = 400, description = "Subject is still assigned to a semester"),
        (status = 404, description = "Subject not found")
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    SubjectService::delete(&state.db, id).await?;
    Ok(Json(MessageResponse::ok("Subject deleted")))
}
