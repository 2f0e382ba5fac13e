use crate::{
    entities::{
        batches, semester_enrollments, semester_subjects, semesters, students, subject_enrollments,
        subjects,
    },
    services::{
        error::{ServiceError, ServiceResult, is_unique_violation},
        lookup,
        notify::{Notifier, Outbox},
    },
};
use chrono::Utc;
use log::info;
use models::{
    actor::Actor,
    capacity::Occupancy,
    status::EnrollmentStatus,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::Expr,
};
use serde::Serialize;

/// Outcome of removing a student from a semester subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectRemoval {
    /// There was no active enrollment; nothing changed
    NotEnrolled,
    Removed {
        /// The semester enrollment went too, since no active subject was left
        semester_enrollment_removed: bool,
    },
}

/// Outcome of removing a student from a semester
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterRemoval {
    pub enrollment: semester_enrollments::Model,
    pub subject_enrollments_removed: u64,
}

/// Rows removed by [`EnrollmentService::delete_semester_cascade`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeCounts {
    pub subject_enrollments: u64,
    pub semester_enrollments: u64,
    pub semester_subjects: u64,
    pub batches: u64,
}

/// Owns the semester enrollment / subject enrollment aggregate
///
/// Every public operation runs in one transaction and delivers its
/// notifications only after that transaction committed.
pub struct EnrollmentService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a dyn Notifier,
}

impl<'a> EnrollmentService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a dyn Notifier) -> Self {
        Self { db, notifier }
    }

    pub async fn enroll_in_batch(
        &self,
        semester_id: i32,
        batch_id: i32,
        student_id: i32,
        actor: &Actor,
    ) -> ServiceResult<semester_enrollments::Model> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let batch = lookup::batch_in_semester(&txn, semester.id, batch_id).await?;
        let student = lookup::active_student(&txn, student_id).await?;

        let enrollment =
            admit_to_batch(&txn, &mut outbox, &semester, &batch, &student, actor).await?;
        outbox.push(
            &actor.username,
            format!(
                "Enrolled {} in {} (Batch: {})",
                student.full_name(),
                semester.name,
                batch.name
            ),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;
        Ok(enrollment)
    }

    pub async fn enroll_in_subject(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
        student_id: i32,
        actor: &Actor,
    ) -> ServiceResult<subject_enrollments::Model> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let (semester_subject, subject) =
            lookup::semester_subject_in_semester(&txn, semester.id, semester_subject_id).await?;
        let student = lookup::active_student(&txn, student_id).await?;

        let enrollment = admit_to_subject(
            &txn,
            &mut outbox,
            &semester,
            &semester_subject,
            &subject,
            &student,
            actor,
        )
        .await?;
        outbox.push(
            &actor.username,
            format!("Enrolled {} in {}", student.full_name(), subject.name),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;
        Ok(enrollment)
    }

    /// Removing a student who holds no active enrollment is a no-op
    pub async fn unenroll_from_subject(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
        student_id: i32,
        actor: &Actor,
    ) -> ServiceResult<SubjectRemoval> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let (semester_subject, subject) =
            lookup::semester_subject_in_semester(&txn, semester.id, semester_subject_id).await?;
        let student = lookup::active_student(&txn, student_id).await?;

        let removal = withdraw_from_subject(
            &txn,
            &mut outbox,
            &semester,
            &semester_subject,
            &subject,
            &student,
        )
        .await?;
        if removal != SubjectRemoval::NotEnrolled {
            outbox.push(
                &actor.username,
                format!("Removed {} from {}", student.full_name(), subject.name),
            );
        }

        txn.commit().await?;
        outbox.deliver(self.notifier).await;
        Ok(removal)
    }

    /// Removes the student from the semester, provided they sit in `batch_id`
    pub async fn unenroll_from_batch(
        &self,
        semester_id: i32,
        batch_id: i32,
        student_id: i32,
        actor: &Actor,
    ) -> ServiceResult<SemesterRemoval> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let batch = lookup::batch_in_semester(&txn, semester.id, batch_id).await?;
        let student = lookup::active_student(&txn, student_id).await?;

        let removal =
            withdraw_from_semester(&txn, &mut outbox, &semester, Some(&batch), &student).await?;
        outbox.push(
            &actor.username,
            format!("Removed {} from batch {}", student.full_name(), batch.name),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;
        Ok(removal)
    }

    pub async fn remove_from_semester(
        &self,
        semester_id: i32,
        student_id: i32,
        actor: &Actor,
    ) -> ServiceResult<SemesterRemoval> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let student = lookup::active_student(&txn, student_id).await?;

        let removal = withdraw_from_semester(&txn, &mut outbox, &semester, None, &student).await?;
        outbox.push(
            &actor.username,
            format!("Removed {} from {}", student.full_name(), semester.name),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;
        Ok(removal)
    }

    /// Points the existing enrollment at another batch, keeping its date and subjects
    pub async fn move_between_batches(
        &self,
        semester_id: i32,
        student_id: i32,
        from_batch_id: i32,
        to_batch_id: i32,
        actor: &Actor,
    ) -> ServiceResult<semester_enrollments::Model> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let from = lookup::batch_in_semester(&txn, semester.id, from_batch_id).await?;
        let to = lookup::batch_in_semester(&txn, semester.id, to_batch_id).await?;
        let student = lookup::active_student(&txn, student_id).await?;

        let enrollment =
            relocate(&txn, &mut outbox, &semester, &from, &to, &student).await?;
        outbox.push(
            &actor.username,
            format!(
                "Moved {} from {} to {}",
                student.full_name(),
                from.name,
                to.name
            ),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;
        Ok(enrollment)
    }

    /// Moves a semester enrollment out of `active`, carrying its active subjects along
    pub async fn change_enrollment_status(
        &self,
        semester_id: i32,
        student_id: i32,
        status: EnrollmentStatus,
        actor: &Actor,
    ) -> ServiceResult<semester_enrollments::Model> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let student = students::Entity::find_by_id(student_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", student_id))?;

        let enrollment = lookup::semester_enrollment(&txn, semester.id, student.id)
            .await?
            .ok_or_else(|| ServiceError::NotEnrolled {
                student: student.email.clone(),
                target: semester.name.clone(),
            })?;

        if !enrollment.status.can_transition_to(status) {
            return Err(ServiceError::validation(format!(
                "Cannot change enrollment status from {} to {status}",
                enrollment.status
            )));
        }

        let cascaded = subject_enrollments::Entity::update_many()
            .col_expr(subject_enrollments::Column::Status, Expr::value(status))
            .filter(subject_enrollments::Column::SemesterEnrollmentId.eq(enrollment.id))
            .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .exec(&txn)
            .await?
            .rows_affected;

        let mut active: semester_enrollments::ActiveModel = enrollment.into();
        active.status = Set(status);
        let enrollment = active.update(&txn).await?;

        info!(
            "Enrollment of {} in {} set to {status} ({cascaded} subject enrollment(s) updated)",
            student.email, semester.name
        );
        outbox.push(
            &student.email,
            format!("Your enrollment in {} is now {status}", semester.name),
        );
        outbox.push(
            &actor.username,
            format!(
                "Set enrollment of {} in {} to {status}",
                student.full_name(),
                semester.name
            ),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;
        Ok(enrollment)
    }

    /// Deletes a semester and everything it owns, children first
    pub async fn delete_semester_cascade(
        &self,
        semester_id: i32,
        actor: &Actor,
    ) -> ServiceResult<CascadeCounts> {
        let txn = self.db.begin().await?;
        let semester = lookup::semester(&txn, semester_id).await?;

        let counts = purge_semester(&txn, &semester).await?;

        txn.commit().await?;

        let mut outbox = Outbox::new();
        outbox.push(
            &actor.username,
            format!("Deleted semester: {}", semester.name),
        );
        outbox.deliver(self.notifier).await;
        Ok(counts)
    }

    pub async fn batch_occupancy(&self, batch_id: i32) -> ServiceResult<Occupancy> {
        let batch = batches::Entity::find_by_id(batch_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch", batch_id))?;
        let enrolled = lookup::active_in_batch(self.db, batch.id).await?;

        Ok(Occupancy::new(batch.capacity(), enrolled))
    }

    pub async fn subject_occupancy(&self, semester_subject_id: i32) -> ServiceResult<Occupancy> {
        let semester_subject = semester_subjects::Entity::find_by_id(semester_subject_id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("SemesterSubject", semester_subject_id))?;
        let enrolled = lookup::active_in_subject(self.db, semester_subject.id).await?;

        Ok(Occupancy::new(semester_subject.capacity(), enrolled))
    }

    pub(crate) fn db(&self) -> &'a DatabaseConnection {
        self.db
    }

    pub(crate) fn notifier(&self) -> &'a dyn Notifier {
        self.notifier
    }
}

/// Creates (or reactivates) the student's semester enrollment through `batch`
pub(crate) async fn admit_to_batch<C: ConnectionTrait>(
    conn: &C,
    outbox: &mut Outbox,
    semester: &semesters::Model,
    batch: &batches::Model,
    student: &students::Model,
    actor: &Actor,
) -> ServiceResult<semester_enrollments::Model> {
    let batch = lookup::lock_batch(conn, batch.id).await?;
    let existing = lookup::semester_enrollment(conn, semester.id, student.id).await?;

    if existing.as_ref().is_some_and(|e| e.status.is_active()) {
        return Err(ServiceError::AlreadyEnrolled {
            student: student.email.clone(),
            target: semester.name.clone(),
        });
    }

    let capacity = batch.capacity();
    let enrolled = lookup::active_in_batch(conn, batch.id).await?;
    if !capacity.can_enroll(enrolled) {
        return Err(ServiceError::CapacityExceeded {
            target: format!("Batch {}", batch.name),
            max: capacity.limit().unwrap_or_default(),
        });
    }

    let now = Utc::now().naive_utc();
    let enrollment = match existing {
        // The (semester, student) pair is unique, so a past enrollment is revived
        Some(previous) => {
            let mut active: semester_enrollments::ActiveModel = previous.into();
            active.batch_id = Set(batch.id);
            active.status = Set(EnrollmentStatus::Active);
            active.enrollment_date = Set(now);
            active.enrolled_by = Set(Some(actor.username.clone()));
            active.update(conn).await?
        }
        None => semester_enrollments::ActiveModel {
            semester_id: Set(semester.id),
            student_id: Set(student.id),
            batch_id: Set(batch.id),
            enrollment_date: Set(now),
            status: Set(EnrollmentStatus::Active),
            enrolled_by: Set(Some(actor.username.clone())),
            notes: Set(None),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::AlreadyEnrolled {
                    student: student.email.clone(),
                    target: semester.name.clone(),
                }
            } else {
                e.into()
            }
        })?,
    };

    info!(
        "Enrolled {} in {} (batch {})",
        student.email, semester.name, batch.name
    );
    outbox.push(
        &student.email,
        format!(
            "You have been enrolled in {} (Batch: {})",
            semester.name, batch.name
        ),
    );

    Ok(enrollment)
}

/// Enrolls the student in a semester subject, creating the semester enrollment if needed
pub(crate) async fn admit_to_subject<C: ConnectionTrait>(
    conn: &C,
    outbox: &mut Outbox,
    semester: &semesters::Model,
    semester_subject: &semester_subjects::Model,
    subject: &subjects::Model,
    student: &students::Model,
    actor: &Actor,
) -> ServiceResult<subject_enrollments::Model> {
    let semester_subject = lookup::lock_semester_subject(conn, semester_subject.id).await?;
    let existing = subject_enrollments::Entity::find()
        .filter(subject_enrollments::Column::SemesterSubjectId.eq(semester_subject.id))
        .filter(subject_enrollments::Column::StudentId.eq(student.id))
        .one(conn)
        .await?;

    if existing.as_ref().is_some_and(|e| e.status.is_active()) {
        return Err(ServiceError::AlreadyEnrolled {
            student: student.email.clone(),
            target: subject.name.clone(),
        });
    }

    let capacity = semester_subject.capacity();
    let enrolled = lookup::active_in_subject(conn, semester_subject.id).await?;
    if !capacity.can_enroll(enrolled) {
        return Err(ServiceError::CapacityExceeded {
            target: subject.name.clone(),
            max: capacity.limit().unwrap_or_default(),
        });
    }

    let backing = ensure_semester_enrollment(conn, outbox, semester, student, actor).await?;

    let now = Utc::now().naive_utc();
    let enrollment = match existing {
        Some(previous) => {
            let mut active: subject_enrollments::ActiveModel = previous.into();
            active.semester_enrollment_id = Set(backing.id);
            active.status = Set(EnrollmentStatus::Active);
            active.enrollment_date = Set(now);
            active.enrolled_by = Set(Some(actor.username.clone()));
            active.update(conn).await?
        }
        None => subject_enrollments::ActiveModel {
            semester_subject_id: Set(semester_subject.id),
            student_id: Set(student.id),
            semester_enrollment_id: Set(backing.id),
            enrollment_date: Set(now),
            status: Set(EnrollmentStatus::Active),
            enrolled_by: Set(Some(actor.username.clone())),
            notes: Set(None),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::AlreadyEnrolled {
                    student: student.email.clone(),
                    target: subject.name.clone(),
                }
            } else {
                e.into()
            }
        })?,
    };

    info!("Enrolled {} in subject {}", student.email, subject.name);
    outbox.push(
        &student.email,
        format!("You have been enrolled in {}", subject.name),
    );

    Ok(enrollment)
}

/// Get-or-create for the semester enrollment backing a subject enrollment
///
/// A new enrollment goes into the first batch with room, default batch first.
async fn ensure_semester_enrollment<C: ConnectionTrait>(
    conn: &C,
    outbox: &mut Outbox,
    semester: &semesters::Model,
    student: &students::Model,
    actor: &Actor,
) -> ServiceResult<semester_enrollments::Model> {
    match lookup::semester_enrollment(conn, semester.id, student.id).await? {
        Some(enrollment) if enrollment.status.is_active() => return Ok(enrollment),
        Some(enrollment) => {
            return Err(ServiceError::InvariantViolation(format!(
                "{} holds a {} enrollment in {}; re-enroll them through a batch first",
                student.email, enrollment.status, semester.name
            )));
        }
        None => {}
    }

    let candidates = batches::Entity::find()
        .filter(batches::Column::SemesterId.eq(semester.id))
        .filter(batches::Column::IsActive.eq(true))
        .order_by_desc(batches::Column::IsDefault)
        .order_by_asc(batches::Column::Id)
        .all(conn)
        .await?;

    if candidates.is_empty() {
        return Err(ServiceError::InvariantViolation(format!(
            "{} has no batch to hold a semester enrollment for {}",
            semester.name, student.email
        )));
    }

    let mut total_capacity = 0;
    for batch in &candidates {
        let enrolled = lookup::active_in_batch(conn, batch.id).await?;
        let capacity = batch.capacity();
        if capacity.can_enroll(enrolled) {
            return admit_to_batch(conn, outbox, semester, batch, student, actor).await;
        }
        total_capacity += capacity.limit().unwrap_or_default();
    }

    Err(ServiceError::CapacityExceeded {
        target: format!("Every batch of {}", semester.name),
        max: total_capacity,
    })
}

/// Deletes the active subject enrollment, then the semester enrollment if it was the last one
pub(crate) async fn withdraw_from_subject<C: ConnectionTrait>(
    conn: &C,
    outbox: &mut Outbox,
    semester: &semesters::Model,
    semester_subject: &semester_subjects::Model,
    subject: &subjects::Model,
    student: &students::Model,
) -> ServiceResult<SubjectRemoval> {
    let deleted = subject_enrollments::Entity::delete_many()
        .filter(subject_enrollments::Column::SemesterSubjectId.eq(semester_subject.id))
        .filter(subject_enrollments::Column::StudentId.eq(student.id))
        .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
        .exec(conn)
        .await?
        .rows_affected;

    if deleted == 0 {
        return Ok(SubjectRemoval::NotEnrolled);
    }

    let remaining = subject_enrollments::Entity::find()
        .inner_join(semester_subjects::Entity)
        .filter(semester_subjects::Column::SemesterId.eq(semester.id))
        .filter(subject_enrollments::Column::StudentId.eq(student.id))
        .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
        .count(conn)
        .await?;

    let mut semester_enrollment_removed = false;
    if remaining == 0
        && let Some(enrollment) = lookup::semester_enrollment(conn, semester.id, student.id).await?
        && enrollment.status.is_active()
    {
        delete_enrollment(conn, &enrollment).await?;
        semester_enrollment_removed = true;

        info!(
            "Removed {} from semester {} due to no remaining subject enrollments",
            student.email, semester.name
        );
        outbox.push(
            &student.email,
            format!(
                "You have been removed from semester {} due to no remaining subject enrollments",
                semester.name
            ),
        );
    }

    info!("Removed {} from subject {}", student.email, subject.name);
    outbox.push(
        &student.email,
        format!("You have been removed from {}", subject.name),
    );

    Ok(SubjectRemoval::Removed {
        semester_enrollment_removed,
    })
}

/// Deletes the student's subject enrollments, then their semester enrollment
///
/// With `batch` set, only an enrollment held through that batch qualifies.
pub(crate) async fn withdraw_from_semester<C: ConnectionTrait>(
    conn: &C,
    outbox: &mut Outbox,
    semester: &semesters::Model,
    batch: Option<&batches::Model>,
    student: &students::Model,
) -> ServiceResult<SemesterRemoval> {
    let mut query = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::SemesterId.eq(semester.id))
        .filter(semester_enrollments::Column::StudentId.eq(student.id))
        .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active));
    if let Some(batch) = batch {
        query = query.filter(semester_enrollments::Column::BatchId.eq(batch.id));
    }

    let enrollment = query
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotEnrolled {
            student: student.email.clone(),
            target: batch.map_or_else(|| semester.name.clone(), |b| b.name.clone()),
        })?;

    let batch_name = match batch {
        Some(batch) => batch.name.clone(),
        None => batches::Entity::find_by_id(enrollment.batch_id)
            .one(conn)
            .await?
            .map(|b| b.name)
            .unwrap_or_default(),
    };

    let subject_enrollments_removed = delete_enrollment(conn, &enrollment).await?;

    info!(
        "Removed {} from {} (batch {batch_name}, {subject_enrollments_removed} subject enrollment(s))",
        student.email, semester.name
    );
    outbox.push(
        &student.email,
        format!(
            "You have been removed from {} (Batch: {batch_name})",
            semester.name
        ),
    );

    Ok(SemesterRemoval {
        enrollment,
        subject_enrollments_removed,
    })
}

/// Moves an active enrollment from one batch of the semester to another
pub(crate) async fn relocate<C: ConnectionTrait>(
    conn: &C,
    outbox: &mut Outbox,
    semester: &semesters::Model,
    from: &batches::Model,
    to: &batches::Model,
    student: &students::Model,
) -> ServiceResult<semester_enrollments::Model> {
    if from.id == to.id {
        return Err(ServiceError::validation(
            "Source and destination batches cannot be the same",
        ));
    }

    let enrollment = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::SemesterId.eq(semester.id))
        .filter(semester_enrollments::Column::StudentId.eq(student.id))
        .filter(semester_enrollments::Column::BatchId.eq(from.id))
        .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotEnrolled {
            student: student.email.clone(),
            target: from.name.clone(),
        })?;

    let to = lookup::lock_batch(conn, to.id).await?;
    let capacity = to.capacity();
    let enrolled = lookup::active_in_batch(conn, to.id).await?;
    if !capacity.can_enroll(enrolled) {
        return Err(ServiceError::CapacityExceeded {
            target: format!("Batch {}", to.name),
            max: capacity.limit().unwrap_or_default(),
        });
    }

    let mut active: semester_enrollments::ActiveModel = enrollment.into();
    active.batch_id = Set(to.id);
    let enrollment = active.update(conn).await?;

    info!(
        "Moved {} from {} to {} in {}",
        student.email, from.name, to.name, semester.name
    );
    outbox.push(
        &student.email,
        format!(
            "You have been moved to {} in {}",
            to.name, semester.name
        ),
    );

    Ok(enrollment)
}

/// Deletes a semester enrollment and every subject enrollment pointing at it
async fn delete_enrollment<C: ConnectionTrait>(
    conn: &C,
    enrollment: &semester_enrollments::Model,
) -> ServiceResult<u64> {
    let removed = subject_enrollments::Entity::delete_many()
        .filter(subject_enrollments::Column::SemesterEnrollmentId.eq(enrollment.id))
        .exec(conn)
        .await?
        .rows_affected;

    semester_enrollments::Entity::delete_by_id(enrollment.id)
        .exec(conn)
        .await?;

    Ok(removed)
}

/// Deletes a semester in foreign key order:
/// subject enrollments, semester enrollments, semester subjects, batches, semester
pub(crate) async fn purge_semester<C: ConnectionTrait>(
    conn: &C,
    semester: &semesters::Model,
) -> ServiceResult<CascadeCounts> {
    let semester_subject_ids: Vec<i32> = semester_subjects::Entity::find()
        .select_only()
        .column(semester_subjects::Column::Id)
        .filter(semester_subjects::Column::SemesterId.eq(semester.id))
        .into_tuple()
        .all(conn)
        .await?;

    let semester_enrollment_ids: Vec<i32> = semester_enrollments::Entity::find()
        .select_only()
        .column(semester_enrollments::Column::Id)
        .filter(semester_enrollments::Column::SemesterId.eq(semester.id))
        .into_tuple()
        .all(conn)
        .await?;

    let subject_enrollments = subject_enrollments::Entity::delete_many()
        .filter(
            Condition::any()
                .add(subject_enrollments::Column::SemesterSubjectId.is_in(semester_subject_ids))
                .add(
                    subject_enrollments::Column::SemesterEnrollmentId
                        .is_in(semester_enrollment_ids),
                ),
        )
        .exec(conn)
        .await?
        .rows_affected;

    let semester_enrollments = semester_enrollments::Entity::delete_many()
        .filter(semester_enrollments::Column::SemesterId.eq(semester.id))
        .exec(conn)
        .await?
        .rows_affected;

    let semester_subjects = semester_subjects::Entity::delete_many()
        .filter(semester_subjects::Column::SemesterId.eq(semester.id))
        .exec(conn)
        .await?
        .rows_affected;

    let batches = batches::Entity::delete_many()
        .filter(batches::Column::SemesterId.eq(semester.id))
        .exec(conn)
        .await?
        .rows_affected;

    semesters::Entity::delete_by_id(semester.id)
        .exec(conn)
        .await?;

    let counts = CascadeCounts {
        subject_enrollments,
        semester_enrollments,
        semester_subjects,
        batches,
    };
    info!("Deleted semester {} ({counts:?})", semester.name);

    Ok(counts)
}
