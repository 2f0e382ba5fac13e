use crate::{
    auth::{AdminUser, AuthUser},
    dtos::{
        common::{BulkResponse, PaginationMeta},
        semester::{
            BulkEnrollRequest, CascadeResponse, EnrollmentResponse, PaginatedSemestersResponse,
            SemesterQueryParams, SemesterRequest, SemesterResponse, StatusChangeRequest,
        },
    },
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use database::{
    entities::semesters,
    services::{
        AnalyticsService, analytics::SemesterAnalytics, semester::SemesterFilter,
    },
};

/// Looks a semester up by the slug used in every nested route
pub(crate) async fn by_slug(state: &AppState, slug: &str) -> Result<semesters::Model, ApiError> {
    Ok(state.semesters().get_by_slug(slug).await?)
}

#[utoipa::path(
    get,
    path = "/semesters",
    params(SemesterQueryParams),
    responses(
        (status = 200, description = "Page of semesters, newest first", body = PaginatedSemestersResponse)
    ),
    security(("jwt" = [])),
    tag = "Semesters"
)]
pub async fn list_semesters(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SemesterQueryParams>,
) -> Result<Json<PaginatedSemestersResponse>, ApiError> {
    let (semesters, total_items) = state
        .semesters()
        .list(SemesterFilter {
            status: params.status,
            department_id: params.department_id,
            search: params.search,
            page: params.page,
            per_page: params.per_page,
        })
        .await?;

    Ok(Json(PaginatedSemestersResponse {
        semesters: semesters.into_iter().map(Into::into).collect(),
        pagination: PaginationMeta::new(params.page, params.per_page, total_items),
    }))
}

/// Create a semester together with its default batch
#[utoipa::path(
    post,
    path = "/semesters",
    request_body = SemesterRequest,
    responses(
        (status = 200, description = "Semester created", body = SemesterResponse),
        (status = 400, description = "Invalid input or duplicate semester"),
        (status = 404, description = "Department not found")
    ),
    security(("jwt" = [])),
    tag = "Semesters"
)]
pub async fn create_semester(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Json(req): Json<SemesterRequest>,
) -> Result<Json<SemesterResponse>, ApiError> {
    let semester = state.semesters().create(req.into(), &actor).await?;
    Ok(Json(semester.into()))
}

#[utoipa::path(
    get,
    path = "/semesters/{slug}",
    params(("slug" = String, Path, description = "Semester slug")),
    responses(
        (status = 200, description = "Semester found", body = SemesterResponse),
        (status = 404, description = "Semester not found")
    ),
    security(("jwt" = [])),
    tag = "Semesters"
)]
pub async fn get_semester(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<SemesterResponse>, ApiError> {
    Ok(Json(by_slug(&state, &slug).await?.into()))
}

#[utoipa::path(
    put,
    path = "/semesters/{slug}",
    params(("slug" = String, Path, description = "Semester slug")),
    request_body = SemesterRequest,
    responses(
        (status = 200, description = "Semester updated", body = SemesterResponse),
        (status = 400, description = "Invalid input or duplicate semester"),
        (status = 404, description = "Semester not found")
    ),
    security(("jwt" = [])),
    tag = "Semesters"
)]
pub async fn update_semester(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(slug): Path<String>,
    Json(req): Json<SemesterRequest>,
) -> Result<Json<SemesterResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let semester = state
        .semesters()
        .update(semester.id, req.into(), &actor)
        .await?;
    Ok(Json(semester.into()))
}

/// Delete a semester with its batches, subjects and enrollments
#[utoipa::path(
    delete,
    path = "/semesters/{slug}",
    params(("slug" = String, Path, description = "Semester slug")),
    responses(
        (status = 200, description = "Semester deleted", body = CascadeResponse),
        (status = 404, description = "Semester not found")
    ),
    security(("jwt" = [])),
    tag = "Semesters"
)]
pub async fn delete_semester(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(slug): Path<String>,
) -> Result<Json<CascadeResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let counts = state.semesters().delete(semester.id, &actor).await?;

    Ok(Json(CascadeResponse::new(
        format!("Semester {} deleted", semester.name),
        counts,
    )))
}

/// Enroll students listed by email into one batch
#[utoipa::path(
    post,
    path = "/semesters/{slug}/bulk-enroll",
    params(("slug" = String, Path, description = "Semester slug")),
    request_body = BulkEnrollRequest,
    responses(
        (status = 200, description = "Per-address outcome", body = BulkResponse<String>),
        (status = 400, description = "No addresses given"),
        (status = 404, description = "Semester or batch not found")
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn bulk_enroll(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(slug): Path<String>,
    Json(req): Json<BulkEnrollRequest>,
) -> Result<Json<BulkResponse<String>>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let report = state
        .enrollments()
        .bulk_enroll(semester.id, req.batch_id, &req.emails, &actor)
        .await?;
    Ok(Json(BulkResponse::new(report, "Enrolled")))
}

/// Move a student's semester enrollment out of `active`
#[utoipa::path(
    put,
    path = "/semesters/{slug}/enrollments/{student_id}/status",
    params(
        ("slug" = String, Path, description = "Semester slug"),
        ("student_id" = i32, Path, description = "Student ID")
    ),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = EnrollmentResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 409, description = "Student is not enrolled")
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn change_enrollment_status(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path((slug, student_id)): Path<(String, i32)>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let enrollment = state
        .enrollments()
        .change_enrollment_status(semester.id, student_id, req.status, &actor)
        .await?;
    Ok(Json(enrollment.into()))
}

/// Enrollment and capacity figures for a semester
#[utoipa::path(
    get,
    path = "/semesters/{slug}/analytics",
    params(("slug" = String, Path, description = "Semester slug")),
    responses(
        (status = 200, description = "Semester analytics"),
        (status = 404, description = "Semester not found")
    ),
    security(("jwt" = [])),
    tag = "Semesters"
)]
pub async fn semester_analytics(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<SemesterAnalytics>, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    Ok(Json(
        AnalyticsService::semester_analytics(&state.db, semester.id).await?,
    ))
}

/// Download the semester's subject enrollments as CSV
#[utoipa::path(
    get,
    path = "/semesters/{slug}/export",
    params(("slug" = String, Path, description = "Semester slug")),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 404, description = "Semester not found")
    ),
    security(("jwt" = [])),
    tag = "Semesters"
)]
pub async fn export_semester(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let semester = by_slug(&state, &slug).await?;
    let csv = AnalyticsService::export_semester_csv(&state.db, semester.id).await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}_{}_enrollments.csv\"",
                semester.slug, semester.academic_year
            ),
        ),
    ];
    Ok((headers, csv))
}
