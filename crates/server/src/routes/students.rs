use crate::{
    auth::{AdminUser, AuthUser},
    dtos::{
        catalog::{PaginatedStudentsResponse, StudentQueryParams, StudentRequest, StudentResponse},
        common::{MessageResponse, PaginationMeta},
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::{StudentService, student::StudentSearch};

/// Search active students
#[utoipa::path(
    get,
    path = "/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Page of students", body = PaginatedStudentsResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<PaginatedStudentsResponse>, ApiError> {
    let (students, total_items) = StudentService::search(
        &state.db,
        StudentSearch {
            query: params.search,
            exclude_semester_id: params.exclude_semester_id,
            page: params.page,
            per_page: params.per_page,
        },
    )
    .await?;

    Ok(Json(PaginatedStudentsResponse {
        students: students.into_iter().map(Into::into).collect(),
        pagination: PaginationMeta::new(params.page, params.per_page, total_items),
    }))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<StudentResponse>, ApiError> {
    Ok(Json(StudentService::get(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/students",
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid input or duplicate email")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<StudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    Ok(Json(StudentService::create(&state.db, req.into()).await?.into()))
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(req): Json<StudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    Ok(Json(
        StudentService::update(&state.db, id, req.into())
            .await?
            .into(),
    ))
}

/// Mark a student inactive; inactive students cannot be enrolled
#[utoipa::path(
    post,
    path = "/students/{id}/deactivate",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deactivated", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn deactivate_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<StudentResponse>, ApiError> {
    Ok(Json(StudentService::deactivate(&state.db, id).await?.into()))
}

/// Withdraw a student from every semester, then delete them
#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    StudentService::delete(&state.db, state.notifier.as_ref(), id, &actor).await?;
    Ok(Json(MessageResponse::ok("Student deleted")))
}
