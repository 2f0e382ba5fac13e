use crate::{
    entities::{batches, semester_enrollments, semester_subjects, students, subject_enrollments, subjects, teachers},
    services::{
        enrollment::withdraw_from_subject,
        error::{ServiceError, ServiceResult},
        lookup,
        notify::{Notifier, Outbox},
    },
};
use chrono::Utc;
use log::info;
use models::{actor::Actor, capacity::Occupancy, status::EnrollmentStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentInput {
    pub subject_id: i32,
    pub teacher_email: Option<String>,
    #[serde(default = "default_credits")]
    pub credits: i32,
    #[serde(default = "default_hours_per_week")]
    pub hours_per_week: i32,
    /// 0 means no limit
    #[serde(default)]
    pub max_students: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentChanges {
    /// `None` leaves the teacher as is; use `remove_teacher` to clear it
    pub teacher_email: Option<String>,
    pub credits: i32,
    pub hours_per_week: i32,
    pub max_students: i32,
}

fn default_credits() -> i32 {
    1
}

fn default_hours_per_week() -> i32 {
    3
}

fn validate_numbers(credits: i32, hours_per_week: i32, max_students: i32) -> ServiceResult<()> {
    if credits < 1 {
        return Err(ServiceError::validation("Credits must be at least 1"));
    }
    if hours_per_week < 1 {
        return Err(ServiceError::validation("Hours per week must be at least 1"));
    }
    if max_students < 0 {
        return Err(ServiceError::validation(
            "Maximum students cannot be negative (use 0 for no limit)",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentSummary {
    pub semester_subject: semester_subjects::Model,
    pub subject: subjects::Model,
    pub teacher: Option<teachers::Model>,
    pub occupancy: Occupancy,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectMember {
    pub student: students::Model,
    pub enrollment: subject_enrollments::Model,
    pub batch_name: Option<String>,
}

/// Subjects offered in a semester and the teachers assigned to them
pub struct SemesterSubjectService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a dyn Notifier,
}

impl<'a> SemesterSubjectService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a dyn Notifier) -> Self {
        Self { db, notifier }
    }

    pub async fn assign(
        &self,
        semester_id: i32,
        input: AssignmentInput,
        actor: &Actor,
    ) -> ServiceResult<semester_subjects::Model> {
        validate_numbers(input.credits, input.hours_per_week, input.max_students)?;
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let subject = subjects::Entity::find_by_id(input.subject_id)
            .filter(subjects::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject", input.subject_id))?;

        let duplicates = semester_subjects::Entity::find()
            .filter(semester_subjects::Column::SemesterId.eq(semester.id))
            .filter(semester_subjects::Column::SubjectId.eq(subject.id))
            .count(&txn)
            .await?;
        if duplicates > 0 {
            return Err(ServiceError::validation(format!(
                "Subject '{}' is already added to this semester.",
                subject.name
            )));
        }

        let teacher = match input.teacher_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                Some(lookup::active_teacher_by_email(&txn, email).await?)
            }
            _ => None,
        };

        let now = Utc::now().naive_utc();
        let assignment = semester_subjects::ActiveModel {
            semester_id: Set(semester.id),
            subject_id: Set(subject.id),
            teacher_id: Set(teacher.as_ref().map(|t| t.id)),
            credits: Set(input.credits),
            hours_per_week: Set(input.hours_per_week),
            max_students: Set(input.max_students),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(teacher) = &teacher {
            outbox.push(
                &teacher.email,
                format!(
                    "You have been assigned to teach {} in {}",
                    subject.name, semester.name
                ),
            );
        }
        outbox.push(
            &actor.username,
            format!("Added {} to {}", subject.name, semester.name),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;

        info!("Assigned {} to semester {}", subject.name, semester.name);
        Ok(assignment)
    }

    /// Updates teacher and numbers; notifies both teachers when the teacher changes
    pub async fn edit(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
        changes: AssignmentChanges,
        actor: &Actor,
    ) -> ServiceResult<semester_subjects::Model> {
        validate_numbers(changes.credits, changes.hours_per_week, changes.max_students)?;
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let (assignment, subject) =
            lookup::semester_subject_in_semester(&txn, semester.id, semester_subject_id).await?;
        let assignment = lookup::lock_semester_subject(&txn, assignment.id).await?;

        let enrolled = lookup::active_in_subject(&txn, assignment.id).await?;
        if changes.max_students > 0 && (changes.max_students as u64) < enrolled {
            return Err(ServiceError::validation(format!(
                "Cannot set maximum students to {}. Current enrollments: {enrolled}",
                changes.max_students
            )));
        }

        let previous_teacher = lookup::teacher(&txn, assignment.teacher_id).await?;
        let new_teacher = match changes.teacher_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                Some(lookup::active_teacher_by_email(&txn, email).await?)
            }
            _ => previous_teacher.clone(),
        };

        let teacher_changed =
            previous_teacher.as_ref().map(|t| t.id) != new_teacher.as_ref().map(|t| t.id);

        let mut active: semester_subjects::ActiveModel = assignment.into();
        active.teacher_id = Set(new_teacher.as_ref().map(|t| t.id));
        active.credits = Set(changes.credits);
        active.hours_per_week = Set(changes.hours_per_week);
        active.max_students = Set(changes.max_students);
        active.updated_at = Set(Utc::now().naive_utc());
        let assignment = active.update(&txn).await?;

        if teacher_changed {
            if let Some(old) = &previous_teacher {
                outbox.push(
                    &old.email,
                    format!(
                        "You have been unassigned from {} in {}",
                        subject.name, semester.name
                    ),
                );
            }
            if let Some(new) = &new_teacher {
                outbox.push(
                    &new.email,
                    format!(
                        "You have been assigned to teach {} in {}",
                        subject.name, semester.name
                    ),
                );
            }
        }
        outbox.push(
            &actor.username,
            format!("Updated {} in {}", subject.name, semester.name),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;

        info!("Updated assignment of {} in {}", subject.name, semester.name);
        Ok(assignment)
    }

    pub async fn remove_teacher(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
        actor: &Actor,
    ) -> ServiceResult<semester_subjects::Model> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let (assignment, subject) =
            lookup::semester_subject_in_semester(&txn, semester.id, semester_subject_id).await?;

        let Some(teacher) = lookup::teacher(&txn, assignment.teacher_id).await? else {
            return Err(ServiceError::validation(format!(
                "No teacher is assigned to {}",
                subject.name
            )));
        };

        let mut active: semester_subjects::ActiveModel = assignment.into();
        active.teacher_id = Set(None);
        active.updated_at = Set(Utc::now().naive_utc());
        let assignment = active.update(&txn).await?;

        outbox.push(
            &teacher.email,
            format!(
                "You have been removed from teaching {} in {}",
                subject.name, semester.name
            ),
        );
        outbox.push(
            &actor.username,
            format!(
                "Removed {} from teaching {}",
                teacher.full_name(),
                subject.name
            ),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;

        info!("Removed teacher from {} in {}", subject.name, semester.name);
        Ok(assignment)
    }

    /// Unenrolls every active student, then deletes the assignment
    ///
    /// Returns how many students were unenrolled.
    pub async fn delete(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
        actor: &Actor,
    ) -> ServiceResult<usize> {
        let txn = self.db.begin().await?;
        let mut outbox = Outbox::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let (assignment, subject) =
            lookup::semester_subject_in_semester(&txn, semester.id, semester_subject_id).await?;
        let teacher = lookup::teacher(&txn, assignment.teacher_id).await?;

        let enrolled = students::Entity::find()
            .inner_join(subject_enrollments::Entity)
            .filter(subject_enrollments::Column::SemesterSubjectId.eq(assignment.id))
            .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .all(&txn)
            .await?;

        for student in &enrolled {
            withdraw_from_subject(&txn, &mut outbox, &semester, &assignment, &subject, student)
                .await?;
        }

        // Records that are no longer active still reference the assignment
        subject_enrollments::Entity::delete_many()
            .filter(subject_enrollments::Column::SemesterSubjectId.eq(assignment.id))
            .exec(&txn)
            .await?;
        semester_subjects::Entity::delete_by_id(assignment.id)
            .exec(&txn)
            .await?;

        if let Some(teacher) = &teacher {
            outbox.push(
                &teacher.email,
                format!(
                    "{} has been removed from {}",
                    subject.name, semester.name
                ),
            );
        }
        outbox.push(
            &actor.username,
            format!(
                "Removed {} from {} ({} student(s) unenrolled)",
                subject.name,
                semester.name,
                enrolled.len()
            ),
        );

        txn.commit().await?;
        outbox.deliver(self.notifier).await;

        info!(
            "Deleted assignment of {} in {} ({} student(s) unenrolled)",
            subject.name,
            semester.name,
            enrolled.len()
        );
        Ok(enrolled.len())
    }

    pub async fn list(&self, semester_id: i32) -> ServiceResult<Vec<AssignmentSummary>> {
        let semester = lookup::semester(self.db, semester_id).await?;

        let rows = semester_subjects::Entity::find()
            .filter(semester_subjects::Column::SemesterId.eq(semester.id))
            .find_also_related(subjects::Entity)
            .order_by_asc(subjects::Column::Name)
            .all(self.db)
            .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (semester_subject, subject) in rows {
            let Some(subject) = subject else { continue };
            let teacher = lookup::teacher(self.db, semester_subject.teacher_id).await?;
            let enrolled = lookup::active_in_subject(self.db, semester_subject.id).await?;

            summaries.push(AssignmentSummary {
                occupancy: Occupancy::new(semester_subject.capacity(), enrolled),
                semester_subject,
                subject,
                teacher,
            });
        }
        Ok(summaries)
    }

    /// Active members of a semester subject with the batch they sit in
    pub async fn students(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
    ) -> ServiceResult<Vec<SubjectMember>> {
        let (assignment, _) =
            lookup::semester_subject_in_semester(self.db, semester_id, semester_subject_id).await?;

        let rows = subject_enrollments::Entity::find()
            .filter(subject_enrollments::Column::SemesterSubjectId.eq(assignment.id))
            .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .find_also_related(students::Entity)
            .order_by_asc(students::Column::FirstName)
            .order_by_asc(students::Column::LastName)
            .all(self.db)
            .await?;

        let mut members = Vec::with_capacity(rows.len());
        for (enrollment, student) in rows {
            let Some(student) = student else { continue };

            let batch_name = match semester_enrollments::Entity::find_by_id(
                enrollment.semester_enrollment_id,
            )
            .find_also_related(batches::Entity)
            .one(self.db)
            .await?
            {
                Some((_, Some(batch))) => Some(batch.name),
                _ => None,
            };

            members.push(SubjectMember {
                student,
                enrollment,
                batch_name,
            });
        }
        Ok(members)
    }
}
