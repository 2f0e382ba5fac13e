use crate::{
    auth::{AdminUser, AuthUser},
    dtos::{
        common::{BulkResponse, MessageResponse},
        semester::{
            AssignmentChangesRequest, AssignmentRequest, AssignmentResponse, StudentIdsRequest,
            SubjectStudentResponse,
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
use database::services::ServiceError;

/// Reloads one assignment with its subject, teacher and occupancy
async fn summary(
    state: &AppState,
    semester_id: i32,
    semester_subject_id: i32,
) -> Result<AssignmentResponse, ApiError> {
    let summary = state
        .assignments()
        .list(semester_id)
        .await?
        .into_iter()
        .find(|s| s.semester_subject.id == semester_subject_id)
        .ok_or_else(|| ServiceError::not_found("SemesterSubject", semester_subject_id))?;
    Ok(summary.into())
}

#[utoipa::path(
    get,
    path = "/semesters/{slug}/subjects",
    params(("slug" = String, Path, description = "Semester slug")),
    responses(
        (status = 200, description = "Subjects offered in the semester", body = Vec<AssignmentResponse>),
        (status = 404, description = "Semester not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let assignments = state.assignments().list(semester.id).await?;
    Ok(Json(assignments.into_iter().map(Into::into).collect()))
}

/// Offer a subject in the semester, optionally with a teacher
#[utoipa::path(
    post,
    path = "/semesters/{slug}/subjects",
    params(("slug" = String, Path, description = "Semester slug")),
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "Subject assigned", body = AssignmentResponse),
        (status = 400, description = "Invalid numbers or subject already assigned"),
        (status = 404, description = "Semester, subject or teacher not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn assign_subject(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(slug): Path<String>,
    Json(req): Json<AssignmentRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let assignment = state
        .assignments()
        .assign(semester.id, req.into(), &actor)
        .await?;
    Ok(Json(summary(&state, semester.id, assignment.id).await?))
}

#[utoipa::path(
    put,
    path = "/semesters/{slug}/subjects/{id}",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Semester subject ID")
    ),
    request_body = AssignmentChangesRequest,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentResponse),
        (status = 400, description = "Invalid numbers"),
        (status = 404, description = "Assignment or teacher not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn edit_assignment(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
    Json(req): Json<AssignmentChangesRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    state
        .assignments()
        .edit(semester.id, id, req.into(), &actor)
        .await?;
    Ok(Json(summary(&state, semester.id, id).await?))
}

/// Withdraw the subject from the semester, unenrolling its students
#[utoipa::path(
    delete,
    path = "/semesters/{slug}/subjects/{id}",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Semester subject ID")
    ),
    responses(
        (status = 200, description = "Assignment deleted", body = MessageResponse),
        (status = 404, description = "Assignment not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let unenrolled = state.assignments().delete(semester.id, id, &actor).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Subject removed from semester ({unenrolled} student(s) unenrolled)"
    ))))
}

#[utoipa::path(
    delete,
    path = "/semesters/{slug}/subjects/{id}/teacher",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Semester subject ID")
    ),
    responses(
        (status = 200, description = "Teacher removed", body = AssignmentResponse),
        (status = 404, description = "Assignment not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn remove_teacher(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    state
        .assignments()
        .remove_teacher(semester.id, id, &actor)
        .await?;
    Ok(Json(summary(&state, semester.id, id).await?))
}

#[utoipa::path(
    get,
    path = "/semesters/{slug}/subjects/{id}/students",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Semester subject ID")
    ),
    responses(
        (status = 200, description = "Active members of the subject", body = Vec<SubjectStudentResponse>),
        (status = 404, description = "Assignment not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn subject_students(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((slug, id)): Path<(String, i32)>,
) -> Result<Json<Vec<SubjectStudentResponse>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let members = state.assignments().students(semester.id, id).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

/// Enroll students into the subject, placing newcomers in a batch
#[utoipa::path(
    post,
    path = "/semesters/{slug}/subjects/{id}/students",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Semester subject ID")
    ),
    request_body = StudentIdsRequest,
    responses(
        (status = 200, description = "Per-student outcome", body = BulkResponse<i32>),
        (status = 404, description = "Assignment not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn add_subject_students(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
    Json(req): Json<StudentIdsRequest>,
) -> Result<Json<BulkResponse<i32>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let report = state
        .enrollments()
        .enroll_students_in_subject(semester.id, id, &req.student_ids, &actor)
        .await?;
    Ok(Json(BulkResponse::new(report, "Enrolled")))
}

#[utoipa::path(
    delete,
    path = "/semesters/{slug}/subjects/{id}/students",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("id" = i32, Path, description = "Semester subject ID")
    ),
    request_body = StudentIdsRequest,
    responses(
        (status = 200, description = "Per-student outcome", body = BulkResponse<i32>),
        (status = 404, description = "Assignment not found")
    ),
    security(("jwt" = [])),
    tag = "Semester Subjects"
)]
pub async fn remove_subject_students(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, id)): Path<(String, i32)>,
    Json(req): Json<StudentIdsRequest>,
) -> Result<Json<BulkResponse<i32>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let report = state
        .enrollments()
        .unenroll_students_from_subject(semester.id, id, &req.student_ids, &actor)
        .await?;
    Ok(Json(BulkResponse::new(report, "Removed")))
}
