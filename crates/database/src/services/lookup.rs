use crate::{
    entities::{batches, semester_enrollments, semester_subjects, semesters, students, subject_enrollments, subjects, teachers},
    services::error::{ServiceError, ServiceResult},
};
use models::status::EnrollmentStatus;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

pub async fn semester<C: ConnectionTrait>(conn: &C, id: i32) -> ServiceResult<semesters::Model> {
    semesters::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Semester", id))
}

pub async fn semester_by_slug<C: ConnectionTrait>(
    conn: &C,
    slug: &str,
) -> ServiceResult<semesters::Model> {
    semesters::Entity::find()
        .filter(semesters::Column::Slug.eq(slug))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Semester", slug))
}

/// A batch, provided it belongs to `semester_id`
pub async fn batch_in_semester<C: ConnectionTrait>(
    conn: &C,
    semester_id: i32,
    batch_id: i32,
) -> ServiceResult<batches::Model> {
    batches::Entity::find_by_id(batch_id)
        .filter(batches::Column::SemesterId.eq(semester_id))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Batch", batch_id))
}

/// A semester subject together with its subject, provided it belongs to `semester_id`
pub async fn semester_subject_in_semester<C: ConnectionTrait>(
    conn: &C,
    semester_id: i32,
    semester_subject_id: i32,
) -> ServiceResult<(semester_subjects::Model, subjects::Model)> {
    let found = semester_subjects::Entity::find_by_id(semester_subject_id)
        .filter(semester_subjects::Column::SemesterId.eq(semester_id))
        .find_also_related(subjects::Entity)
        .one(conn)
        .await?;

    match found {
        Some((semester_subject, Some(subject))) => Ok((semester_subject, subject)),
        _ => Err(ServiceError::not_found(
            "SemesterSubject",
            semester_subject_id,
        )),
    }
}

/// Only active students can take part in enrollment operations
pub async fn active_student<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> ServiceResult<students::Model> {
    students::Entity::find_by_id(id)
        .filter(students::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student", id))
}

pub async fn active_student_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> ServiceResult<students::Model> {
    students::Entity::find()
        .filter(students::Column::Email.eq(email.to_lowercase()))
        .filter(students::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student", email))
}

pub async fn active_teacher_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> ServiceResult<teachers::Model> {
    teachers::Entity::find()
        .filter(teachers::Column::Email.eq(email.to_lowercase()))
        .filter(teachers::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Teacher", email))
}

pub async fn teacher<C: ConnectionTrait>(
    conn: &C,
    id: Option<i32>,
) -> ServiceResult<Option<teachers::Model>> {
    match id {
        Some(id) => Ok(teachers::Entity::find_by_id(id).one(conn).await?),
        None => Ok(None),
    }
}

/// Re-reads a batch, holding a row lock until the transaction ends where supported
///
/// Serialises concurrent capacity checks against the same batch on Postgres.
/// SQLite already serialises writers, so the plain read is enough there.
pub async fn lock_batch<C: ConnectionTrait>(conn: &C, id: i32) -> ServiceResult<batches::Model> {
    let mut query = batches::Entity::find_by_id(id);
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }

    query
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Batch", id))
}

pub async fn lock_semester_subject<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> ServiceResult<semester_subjects::Model> {
    let mut query = semester_subjects::Entity::find_by_id(id);
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }

    query
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("SemesterSubject", id))
}

/// Number of active semester enrollments held by a batch
pub async fn active_in_batch<C: ConnectionTrait>(conn: &C, batch_id: i32) -> ServiceResult<u64> {
    Ok(semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::BatchId.eq(batch_id))
        .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
        .count(conn)
        .await?)
}

/// Number of active subject enrollments held by a semester subject
pub async fn active_in_subject<C: ConnectionTrait>(
    conn: &C,
    semester_subject_id: i32,
) -> ServiceResult<u64> {
    Ok(subject_enrollments::Entity::find()
        .filter(subject_enrollments::Column::SemesterSubjectId.eq(semester_subject_id))
        .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
        .count(conn)
        .await?)
}

/// The student's semester enrollment, whatever its status
pub async fn semester_enrollment<C: ConnectionTrait>(
    conn: &C,
    semester_id: i32,
    student_id: i32,
) -> ServiceResult<Option<semester_enrollments::Model>> {
    Ok(semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::SemesterId.eq(semester_id))
        .filter(semester_enrollments::Column::StudentId.eq(student_id))
        .one(conn)
        .await?)
}
