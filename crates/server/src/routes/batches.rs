use crate::{
    auth::{AdminUser, AuthUser},
    dtos::{
        common::{BulkResponse, MessageResponse},
        semester::{
            BatchRequest, BatchResponse, BatchStudentResponse, MoveStudentsRequest,
            StudentIdsRequest,
        },
    },
    error::ApiError,
    routes::semesters::by_slug,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};

/// Batches of a semester with their occupancy, default batch first
#[utoipa::path(
    get,
    path = "/semesters/{slug}/batches",
    params(("slug" = String, Path, description = "Semester slug")),
    responses(
        (status = 200, description = "Batches of the semester", body = Vec<BatchResponse>),
        (status = 404, description = "Semester not found")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn list_batches(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<BatchResponse>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let batches = state.semesters().batches(semester.id).await?;
    Ok(Json(batches.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/semesters/{slug}/batches",
    params(("slug" = String, Path, description = "Semester slug")),
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Batch added", body = BatchResponse),
        (status = 400, description = "Invalid name or capacity")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn add_batch(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(slug): Path<String>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let batch = state
        .semesters()
        .add_batch(semester.id, req.into(), &actor)
        .await?;
    Ok(Json(batch.into()))
}

/// Rename a batch or change its capacity
///
/// The capacity cannot drop below the number of active enrollments.
#[utoipa::path(
    put,
    path = "/semesters/{slug}/batches/{id}",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Batch ID")
    ),
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Batch updated", body = BatchResponse),
        (status = 400, description = "Invalid name or capacity"),
        (status = 404, description = "Batch not found")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn edit_batch(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let batch = state
        .semesters()
        .edit_batch(semester.id, id, req.into(), &actor)
        .await?;
    Ok(Json(batch.into()))
}

#[utoipa::path(
    delete,
    path = "/semesters/{slug}/batches/{id}",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Batch ID")
    ),
    responses(
        (status = 200, description = "Batch deleted", body = MessageResponse),
        (status = 400, description = "Batch still has students or is the last one"),
        (status = 404, description = "Batch not found")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn delete_batch(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    state.semesters().delete_batch(semester.id, id, &actor).await?;
    Ok(Json(MessageResponse::ok("Batch deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/semesters/{slug}/batches/{id}/students",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Batch ID")
    ),
    responses(
        (status = 200, description = "Active members of the batch", body = Vec<BatchStudentResponse>),
        (status = 404, description = "Batch not found")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn batch_students(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((slug, id)): Path<(String, i32)>,
) -> Result<Json<Vec<BatchStudentResponse>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let members = state.semesters().batch_students(semester.id, id).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

/// Enroll students into a batch until it is full
#[utoipa::path(
    post,
    path = "/semesters/{slug}/batches/{id}/students",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Batch ID")
    ),
    request_body = StudentIdsRequest,
    responses(
        (status = 200, description = "Per-student outcome", body = BulkResponse<i32>),
        (status = 404, description = "Batch not found")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn add_batch_students(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
    Json(req): Json<StudentIdsRequest>,
) -> Result<Json<BulkResponse<i32>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let report = state
        .enrollments()
        .add_students_to_batch(semester.id, id, &req.student_ids, &actor)
        .await?;
    Ok(Json(BulkResponse::new(report, "Enrolled")))
}

/// Withdraw students from the semester through their batch
#[utoipa::path(
    delete,
    path = "/semesters/{slug}/batches/{id}/students",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Batch ID")
    ),
    request_body = StudentIdsRequest,
    responses(
        (status = 200, description = "Per-student outcome", body = BulkResponse<i32>),
        (status = 404, description = "Batch not found")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn remove_batch_students(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
    Json(req): Json<StudentIdsRequest>,
) -> Result<Json<BulkResponse<i32>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let report = state
        .enrollments()
        .remove_students_from_batch(semester.id, id, &req.student_ids, &actor)
        .await?;
    Ok(Json(BulkResponse::new(report, "Removed")))
}

#[utoipa::path(
    post,
    path = "/semesters/{slug}/batches/move-students",
    params(("slug" = String, Path, description = "Semester slug")),
    request_body = MoveStudentsRequest,
    responses(
        (status = 200, description = "Per-student outcome", body = BulkResponse<i32>),
        (status = 400, description = "Source and destination are the same batch"),
        (status = 404, description = "Batch not found")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn move_students(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(slug): Path<String>,
    Json(req): Json<MoveStudentsRequest>,
) -> Result<Json<BulkResponse<i32>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let report = state
        .enrollments()
        .move_students_between_batches(
            semester.id,
            req.from_batch_id,
            req.to_batch_id,
            &req.student_ids,
            &actor,
        )
        .await?;
    Ok(Json(BulkResponse::new(report, "Moved")))
}
