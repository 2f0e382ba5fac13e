use crate::{
    entities::{
        batches, departments, semester_enrollments, semester_subjects, semesters, students,
        subject_enrollments, subjects,
    },
    services::{
        error::{ServiceError, ServiceResult},
        lookup,
    },
};
use chrono::{Duration, NaiveDateTime, Utc};
use csv::Writer;
use log::info;
use models::{
    capacity::{Capacity, Occupancy},
    status::{EnrollmentStatus, SemesterStatus},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize)]
pub struct SemesterInfo {
    pub id: i32,
    pub name: String,
    pub semester_code: String,
    pub department: String,
    pub academic_year: String,
    pub status: SemesterStatus,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchStats {
    pub id: i32,
    pub name: String,
    pub is_default: bool,
    pub occupancy: Occupancy,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectStats {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub credits: i32,
    pub hours_per_week: i32,
    pub occupancy: Occupancy,
    pub teacher: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_students: u64,
    pub total_subjects: usize,
    pub total_batches: usize,
    pub total_teachers: usize,
    pub total_credits: i64,
    pub total_hours_per_week: i64,
    pub subjects_without_teachers: usize,
    pub subjects_without_students: usize,
    pub total_capacity: u64,
    pub available_capacity: u64,
    pub capacity_utilization: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SemesterAnalytics {
    pub semester: SemesterInfo,
    pub summary: AnalyticsSummary,
    pub batches: Vec<BatchStats>,
    pub subjects: Vec<SubjectStats>,
}

/// Window used for the "recent activity" figures of the dashboard
pub const RECENT_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    /// Semesters not archived (`is_active`)
    pub total_semesters: u64,
    /// Semesters that are upcoming or running
    pub active_semesters: u64,
    /// Distinct students holding an active semester enrollment
    pub total_students: usize,
    /// Distinct teachers assigned to an active semester subject
    pub total_teachers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    pub new_enrollments: u64,
    pub new_subjects: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: SemesterStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub overview: DashboardOverview,
    pub recent_activity: RecentActivity,
    /// Only statuses with at least one semester appear
    pub semester_status_distribution: Vec<StatusCount>,
    pub last_updated: NaiveDateTime,
}

pub struct AnalyticsService;

impl AnalyticsService {
    /// School-wide figures for the admin dashboard
    pub async fn dashboard_stats(db: &DatabaseConnection) -> ServiceResult<DashboardStats> {
        let now = Utc::now().naive_utc();
        let since = now - Duration::days(RECENT_DAYS);

        let total_semesters = semesters::Entity::find()
            .filter(semesters::Column::IsActive.eq(true))
            .count(db)
            .await?;
        let active_semesters = semesters::Entity::find()
            .filter(
                semesters::Column::Status
                    .is_in([SemesterStatus::Upcoming, SemesterStatus::Running]),
            )
            .count(db)
            .await?;

        let student_ids: Vec<i32> = semester_enrollments::Entity::find()
            .select_only()
            .column(semester_enrollments::Column::StudentId)
            .distinct()
            .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .into_tuple()
            .all(db)
            .await?;

        let teacher_ids: Vec<i32> = semester_subjects::Entity::find()
            .select_only()
            .column(semester_subjects::Column::TeacherId)
            .distinct()
            .filter(semester_subjects::Column::TeacherId.is_not_null())
            .filter(semester_subjects::Column::IsActive.eq(true))
            .into_tuple()
            .all(db)
            .await?;

        let new_enrollments = semester_enrollments::Entity::find()
            .filter(semester_enrollments::Column::EnrollmentDate.gte(since))
            .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .count(db)
            .await?;
        let new_subjects = semester_subjects::Entity::find()
            .filter(semester_subjects::Column::CreatedAt.gte(since))
            .filter(semester_subjects::Column::IsActive.eq(true))
            .count(db)
            .await?;

        let mut semester_status_distribution = Vec::new();
        for status in SemesterStatus::all() {
            let count = semesters::Entity::find()
                .filter(semesters::Column::Status.eq(status))
                .count(db)
                .await?;
            if count > 0 {
                semester_status_distribution.push(StatusCount { status, count });
            }
        }

        Ok(DashboardStats {
            overview: DashboardOverview {
                total_semesters,
                active_semesters,
                total_students: student_ids.len(),
                total_teachers: teacher_ids.len(),
            },
            recent_activity: RecentActivity {
                new_enrollments,
                new_subjects,
            },
            semester_status_distribution,
            last_updated: now,
        })
    }

    pub async fn semester_analytics(
        db: &DatabaseConnection,
        semester_id: i32,
    ) -> ServiceResult<SemesterAnalytics> {
        let semester = lookup::semester(db, semester_id).await?;
        let department = departments::Entity::find_by_id(semester.department_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", semester.department_id))?;

        let total_students = semester_enrollments::Entity::find()
            .filter(semester_enrollments::Column::SemesterId.eq(semester.id))
            .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .count(db)
            .await?;

        let mut batch_stats = Vec::new();
        let mut total_capacity = 0;
        for batch in batches::Entity::find()
            .filter(batches::Column::SemesterId.eq(semester.id))
            .order_by_asc(batches::Column::Id)
            .all(db)
            .await?
        {
            let enrolled = lookup::active_in_batch(db, batch.id).await?;
            let capacity = batch.capacity();
            total_capacity += capacity.limit().unwrap_or_default();

            batch_stats.push(BatchStats {
                id: batch.id,
                name: batch.name,
                is_default: batch.is_default,
                occupancy: Occupancy::new(capacity, enrolled),
            });
        }

        let mut subject_stats = Vec::new();
        let mut teachers = HashSet::new();
        let (mut total_credits, mut total_hours) = (0i64, 0i64);
        for (assignment, subject) in semester_subjects::Entity::find()
            .filter(semester_subjects::Column::SemesterId.eq(semester.id))
            .find_also_related(subjects::Entity)
            .order_by_asc(semester_subjects::Column::Id)
            .all(db)
            .await?
        {
            let Some(subject) = subject else { continue };
            let enrolled = lookup::active_in_subject(db, assignment.id).await?;
            let teacher = lookup::teacher(db, assignment.teacher_id).await?;
            if let Some(teacher) = &teacher {
                teachers.insert(teacher.id);
            }

            total_credits += i64::from(assignment.credits);
            total_hours += i64::from(assignment.hours_per_week);

            subject_stats.push(SubjectStats {
                id: assignment.id,
                name: subject.name,
                code: subject.subject_code,
                credits: assignment.credits,
                hours_per_week: assignment.hours_per_week,
                occupancy: Occupancy::new(assignment.capacity(), enrolled),
                teacher: teacher.map(|t| t.full_name()),
            });
        }

        let summary = AnalyticsSummary {
            total_students,
            total_subjects: subject_stats.len(),
            total_batches: batch_stats.len(),
            total_teachers: teachers.len(),
            total_credits,
            total_hours_per_week: total_hours,
            subjects_without_teachers: subject_stats.iter().filter(|s| s.teacher.is_none()).count(),
            subjects_without_students: subject_stats
                .iter()
                .filter(|s| s.occupancy.enrolled == 0)
                .count(),
            total_capacity,
            available_capacity: total_capacity.saturating_sub(total_students),
            capacity_utilization: Capacity::Bounded(total_capacity).utilization(total_students),
        };

        Ok(SemesterAnalytics {
            semester: SemesterInfo {
                id: semester.id,
                name: semester.name,
                semester_code: semester.semester_code,
                department: department.name,
                academic_year: semester.academic_year,
                status: semester.status,
                start_date: semester.start_date,
                end_date: semester.end_date,
            },
            summary,
            batches: batch_stats,
            subjects: subject_stats,
        })
    }

    /// CSV with one row per active subject enrollment
    ///
    /// Subjects nobody is enrolled in still get a row, with the student
    /// columns left empty.
    pub async fn export_semester_csv(
        db: &DatabaseConnection,
        semester_id: i32,
    ) -> ServiceResult<Vec<u8>> {
        let semester = lookup::semester(db, semester_id).await?;

        let batch_names: HashMap<i32, String> = batches::Entity::find()
            .filter(batches::Column::SemesterId.eq(semester.id))
            .all(db)
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record([
            "Subject Name",
            "Subject Code",
            "Credits",
            "Hours/Week",
            "Max Students",
            "Teacher Name",
            "Teacher Email",
            "Student Name",
            "Student ID",
            "Student Email",
            "Student Class",
            "Batch Name",
            "Enrollment Date",
            "Status",
        ])?;

        let assignments = semester_subjects::Entity::find()
            .filter(semester_subjects::Column::SemesterId.eq(semester.id))
            .find_also_related(subjects::Entity)
            .order_by_asc(semester_subjects::Column::Id)
            .all(db)
            .await?;

        let mut rows = 0;
        for (assignment, subject) in assignments {
            let Some(subject) = subject else { continue };
            let teacher = lookup::teacher(db, assignment.teacher_id).await?;

            let subject_columns = [
                subject.name.clone(),
                subject.subject_code.clone(),
                assignment.credits.to_string(),
                assignment.hours_per_week.to_string(),
                assignment.capacity().to_string(),
                teacher.as_ref().map(|t| t.full_name()).unwrap_or_default(),
                teacher.as_ref().map(|t| t.email.clone()).unwrap_or_default(),
            ];

            let enrollments = subject_enrollments::Entity::find()
                .filter(subject_enrollments::Column::SemesterSubjectId.eq(assignment.id))
                .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
                .find_also_related(students::Entity)
                .order_by_asc(subject_enrollments::Column::Id)
                .all(db)
                .await?;

            if enrollments.is_empty() {
                let mut record = subject_columns.to_vec();
                record.extend(std::iter::repeat_n(String::new(), 7));
                writer.write_record(&record)?;
                rows += 1;
                continue;
            }

            for (enrollment, student) in enrollments {
                let Some(student) = student else { continue };
                let batch_id = semester_enrollments::Entity::find_by_id(
                    enrollment.semester_enrollment_id,
                )
                .one(db)
                .await?
                .map(|e| e.batch_id);

                let mut record = subject_columns.to_vec();
                record.extend([
                    student.full_name(),
                    student.student_code,
                    student.email,
                    student.student_class,
                    batch_id
                        .and_then(|id| batch_names.get(&id).cloned())
                        .unwrap_or_default(),
                    enrollment
                        .enrollment_date
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                    enrollment.status.to_string(),
                ]);
                writer.write_record(&record)?;
                rows += 1;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;

        info!("Exported {rows} row(s) for semester {}", semester.name);
        Ok(bytes)
    }
}
