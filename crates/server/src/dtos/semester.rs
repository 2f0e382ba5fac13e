use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::{batches, semester_enrollments, semesters},
    services::{
        enrollment::CascadeCounts,
        semester::{BatchInput, BatchMember, BatchSummary, SemesterInput},
        semester_subject::{
            AssignmentChanges, AssignmentInput, AssignmentSummary, SubjectMember,
        },
    },
};
use models::status::{EnrollmentStatus, SemesterStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{
    catalog::StudentResponse,
    common::{OccupancyResponse, PaginationMeta, default_page, default_per_page},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SemesterRequest {
    pub name: String,
    pub department_id: i32,
    /// e.g. `2024-2025`
    pub academic_year: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "upcoming")]
    pub status: Option<SemesterStatus>,
    pub description: Option<String>,
}

impl From<SemesterRequest> for SemesterInput {
    fn from(req: SemesterRequest) -> Self {
        Self {
            name: req.name,
            department_id: req.department_id,
            academic_year: req.academic_year,
            start_date: req.start_date,
            end_date: req.end_date,
            status: req.status.unwrap_or_default(),
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SemesterQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u64,

    #[param(value_type = Option<String>)]
    pub status: Option<SemesterStatus>,
    pub department_id: Option<i32>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SemesterResponse {
    pub id: i32,
    pub semester_code: String,
    pub name: String,
    pub slug: String,
    pub department_id: i32,
    pub academic_year: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(value_type = String)]
    pub status: SemesterStatus,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<semesters::Model> for SemesterResponse {
    fn from(m: semesters::Model) -> Self {
        Self {
            id: m.id,
            semester_code: m.semester_code,
            name: m.name,
            slug: m.slug,
            department_id: m.department_id,
            academic_year: m.academic_year,
            start_date: m.start_date,
            end_date: m.end_date,
            status: m.status,
            description: m.description,
            is_active: m.is_active,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSemestersResponse {
    pub semesters: Vec<SemesterResponse>,
    pub pagination: PaginationMeta,
}

/// Rows removed along with a semester
#[derive(Debug, Serialize, ToSchema)]
pub struct CascadeResponse {
    pub success: bool,
    pub message: String,
    pub subject_enrollments: u64,
    pub semester_enrollments: u64,
    pub semester_subjects: u64,
    pub batches: u64,
}

impl CascadeResponse {
    pub fn new(message: String, counts: CascadeCounts) -> Self {
        Self {
            success: true,
            message,
            subject_enrollments: counts.subject_enrollments,
            semester_enrollments: counts.semester_enrollments,
            semester_subjects: counts.semester_subjects,
            batches: counts.batches,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    pub name: String,
    /// Defaults to 50 for a new batch; unchanged when editing
    pub max_students: Option<i32>,
}

impl From<BatchRequest> for BatchInput {
    fn from(req: BatchRequest) -> Self {
        Self {
            name: req.name,
            max_students: req.max_students,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchResponse {
    pub id: i32,
    pub batch_code: String,
    pub name: String,
    pub slug: String,
    pub academic_year: String,
    pub max_students: i32,
    pub is_default: bool,
    pub is_active: bool,
    pub occupancy: Option<OccupancyResponse>,
}

impl From<batches::Model> for BatchResponse {
    fn from(m: batches::Model) -> Self {
        Self {
            id: m.id,
            batch_code: m.batch_code,
            name: m.name,
            slug: m.slug,
            academic_year: m.academic_year,
            max_students: m.max_students,
            is_default: m.is_default,
            is_active: m.is_active,
            occupancy: None,
        }
    }
}

impl From<BatchSummary> for BatchResponse {
    fn from(summary: BatchSummary) -> Self {
        Self {
            occupancy: Some(summary.occupancy.into()),
            ..summary.batch.into()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: i32,
    pub semester_id: i32,
    pub student_id: i32,
    pub batch_id: i32,
    pub enrollment_date: NaiveDateTime,
    #[schema(value_type = String)]
    pub status: EnrollmentStatus,
    pub enrolled_by: Option<String>,
    pub notes: Option<String>,
}

impl From<semester_enrollments::Model> for EnrollmentResponse {
    fn from(m: semester_enrollments::Model) -> Self {
        Self {
            id: m.id,
            semester_id: m.semester_id,
            student_id: m.student_id,
            batch_id: m.batch_id,
            enrollment_date: m.enrollment_date,
            status: m.status,
            enrolled_by: m.enrolled_by,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchStudentResponse {
    pub student: StudentResponse,
    pub enrollment_date: NaiveDateTime,
    #[schema(value_type = String)]
    pub status: EnrollmentStatus,
    pub enrolled_by: Option<String>,
}

impl From<BatchMember> for BatchStudentResponse {
    fn from(member: BatchMember) -> Self {
        Self {
            student: member.student.into(),
            enrollment_date: member.enrollment.enrollment_date,
            status: member.enrollment.status,
            enrolled_by: member.enrollment.enrolled_by,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentIdsRequest {
    pub student_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveStudentsRequest {
    pub from_batch_id: i32,
    pub to_batch_id: i32,
    pub student_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkEnrollRequest {
    pub batch_id: i32,
    /// Addresses separated by commas, semicolons or newlines
    pub emails: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusChangeRequest {
    #[schema(value_type = String, example = "dropped")]
    pub status: EnrollmentStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignmentRequest {
    pub subject_id: i32,
    pub teacher_email: Option<String>,
    pub credits: Option<i32>,
    pub hours_per_week: Option<i32>,
    /// 0 or absent means unlimited
    pub max_students: Option<i32>,
}

impl From<AssignmentRequest> for AssignmentInput {
    fn from(req: AssignmentRequest) -> Self {
        Self {
            subject_id: req.subject_id,
            teacher_email: req.teacher_email,
            credits: req.credits.unwrap_or(1),
            hours_per_week: req.hours_per_week.unwrap_or(3),
            max_students: req.max_students.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignmentChangesRequest {
    /// Absent keeps the current teacher
    pub teacher_email: Option<String>,
    pub credits: i32,
    pub hours_per_week: i32,
    pub max_students: i32,
}

impl From<AssignmentChangesRequest> for AssignmentChanges {
    fn from(req: AssignmentChangesRequest) -> Self {
        Self {
            teacher_email: req.teacher_email,
            credits: req.credits,
            hours_per_week: req.hours_per_week,
            max_students: req.max_students,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherSummary {
    pub id: i32,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentResponse {
    pub id: i32,
    pub subject_id: i32,
    pub subject_name: String,
    pub subject_code: String,
    pub teacher: Option<TeacherSummary>,
    pub credits: i32,
    pub hours_per_week: i32,
    pub max_students: i32,
    pub occupancy: OccupancyResponse,
}

impl From<AssignmentSummary> for AssignmentResponse {
    fn from(summary: AssignmentSummary) -> Self {
        let AssignmentSummary {
            semester_subject,
            subject,
            teacher,
            occupancy,
        } = summary;

        Self {
            id: semester_subject.id,
            subject_id: subject.id,
            subject_name: subject.name,
            subject_code: subject.subject_code,
            teacher: teacher.map(|t| TeacherSummary {
                id: t.id,
                full_name: t.full_name(),
                email: t.email,
            }),
            credits: semester_subject.credits,
            hours_per_week: semester_subject.hours_per_week,
            max_students: semester_subject.max_students,
            occupancy: occupancy.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectStudentResponse {
    pub student: StudentResponse,
    pub batch_name: Option<String>,
    pub enrollment_date: NaiveDateTime,
    #[schema(value_type = String)]
    pub status: EnrollmentStatus,
}

impl From<SubjectMember> for SubjectStudentResponse {
    fn from(member: SubjectMember) -> Self {
        Self {
            student: member.student.into(),
            batch_name: member.batch_name,
            enrollment_date: member.enrollment.enrollment_date,
            status: member.enrollment.status,
        }
    }
}
