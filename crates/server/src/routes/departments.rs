use crate::{
    auth::{AdminUser, AuthUser},
    dtos::{
        catalog::{DepartmentRequest, DepartmentResponse},
        common::MessageResponse,
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use database::services::DepartmentService;
use log::info;

/// List all departments
#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "Departments ordered by name", body = Vec<DepartmentResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Departments"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let departments = DepartmentService::list(&state.db).await?;
    Ok(Json(departments.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/departments/{id}",
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department found", body = DepartmentResponse),
        (status = 404, description = "Department not found")
    ),
    security(("jwt" = [])),
    tag = "Departments"
)]
pub async fn get_department(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    Ok(Json(DepartmentService::get(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/departments",
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator role required")
    ),
    security(("jwt" = [])),
    tag = "Departments"
)]
pub async fn create_department(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Json(req): Json<DepartmentRequest>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let department = DepartmentService::create(&state.db, req.into()).await?;
    info!("{} created department {}", actor.username, department.name);
    Ok(Json(department.into()))
}

#[utoipa::path(
    put,
    path = "/departments/{id}",
    params(("id" = i32, Path, description = "Department ID")),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = DepartmentResponse),
        (status = 404, description = "Department not found")
    ),
    security(("jwt" = [])),
    tag = "Departments"
)]
pub async fn update_department(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<DepartmentRequest>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    Ok(Json(
        DepartmentService::update(&state.db, id, req.into())
            .await?
            .into(),
    ))
}

/// Delete a department together with its semesters
#[utoipa::path(
    delete,
    path = "/departments/{id}",
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = MessageResponse),
        (status = 404, description = "Department not found")
    ),
    security(("jwt" = [])),
    tag = "Departments"
)]
pub async fn delete_department(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let semesters = DepartmentService::delete(&state.db, id).await?;
    info!("{} deleted department {id}", actor.username);
    Ok(Json(MessageResponse::ok(format!(
        "Department deleted along with {semesters} semester(s)"
    ))))
}
