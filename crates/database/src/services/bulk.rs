use crate::services::{
    enrollment::{
        EnrollmentService, SubjectRemoval, admit_to_batch, admit_to_subject, relocate,
        withdraw_from_semester, withdraw_from_subject,
    },
    error::{ServiceError, ServiceResult},
    lookup,
    notify::Outbox,
    report::BulkReport,
};
use log::info;
use models::{actor::Actor, email_list::parse_email_list};
use sea_orm::{DatabaseTransaction, TransactionTrait};

/// Commits or rolls back the savepoint of one list item
///
/// Domain errors are handed back for the report; storage errors abort the
/// whole operation.
async fn settle<T>(
    savepoint: DatabaseTransaction,
    item: Outbox,
    result: ServiceResult<T>,
    outbox: &mut Outbox,
) -> ServiceResult<Result<T, ServiceError>> {
    match result {
        Ok(value) => {
            savepoint.commit().await?;
            outbox.append(item);
            Ok(Ok(value))
        }
        Err(ServiceError::Database(e)) => Err(ServiceError::Database(e)),
        Err(e) => {
            savepoint.rollback().await?;
            Ok(Err(e))
        }
    }
}

impl EnrollmentService<'_> {
    /// Enrolls every listed student into one batch
    ///
    /// Students are admitted in input order until the batch is full; every
    /// later eligible student is reported under `capacity_exhausted`.
    pub async fn add_students_to_batch(
        &self,
        semester_id: i32,
        batch_id: i32,
        student_ids: &[i32],
        actor: &Actor,
    ) -> ServiceResult<BulkReport<i32>> {
        let txn = self.db().begin().await?;
        let mut outbox = Outbox::new();
        let mut report = BulkReport::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let batch = lookup::batch_in_semester(&txn, semester.id, batch_id).await?;

        for &student_id in student_ids {
            let savepoint = txn.begin().await?;
            let mut item = Outbox::new();

            let result = async {
                let student = lookup::active_student(&savepoint, student_id).await?;
                admit_to_batch(&savepoint, &mut item, &semester, &batch, &student, actor).await
            }
            .await;

            match settle(savepoint, item, result, &mut outbox).await? {
                Ok(_) => report.succeeded.push(student_id),
                Err(e) => report.record_error(student_id, &e),
            }
        }

        if report.is_success() {
            outbox.push(
                &actor.username,
                format!(
                    "Enrolled {} student(s) in batch {}",
                    report.succeeded.len(),
                    batch.name
                ),
            );
        }

        txn.commit().await?;
        outbox.deliver(self.notifier()).await;

        info!(
            "Added students to batch {}: {:?}",
            batch.name,
            report.counts()
        );
        Ok(report)
    }

    pub async fn remove_students_from_batch(
        &self,
        semester_id: i32,
        batch_id: i32,
        student_ids: &[i32],
        actor: &Actor,
    ) -> ServiceResult<BulkReport<i32>> {
        let txn = self.db().begin().await?;
        let mut outbox = Outbox::new();
        let mut report = BulkReport::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let batch = lookup::batch_in_semester(&txn, semester.id, batch_id).await?;

        for &student_id in student_ids {
            let savepoint = txn.begin().await?;
            let mut item = Outbox::new();

            let result = async {
                let student = lookup::active_student(&savepoint, student_id).await?;
                withdraw_from_semester(&savepoint, &mut item, &semester, Some(&batch), &student)
                    .await
            }
            .await;

            match settle(savepoint, item, result, &mut outbox).await? {
                Ok(_) => report.succeeded.push(student_id),
                Err(e) => report.record_error(student_id, &e),
            }
        }

        if report.is_success() {
            outbox.push(
                &actor.username,
                format!(
                    "Removed {} student(s) from batch {}",
                    report.succeeded.len(),
                    batch.name
                ),
            );
        }

        txn.commit().await?;
        outbox.deliver(self.notifier()).await;

        info!(
            "Removed students from batch {}: {:?}",
            batch.name,
            report.counts()
        );
        Ok(report)
    }

    pub async fn move_students_between_batches(
        &self,
        semester_id: i32,
        from_batch_id: i32,
        to_batch_id: i32,
        student_ids: &[i32],
        actor: &Actor,
    ) -> ServiceResult<BulkReport<i32>> {
        if from_batch_id == to_batch_id {
            return Err(ServiceError::validation(
                "Source and destination batches cannot be the same",
            ));
        }

        let txn = self.db().begin().await?;
        let mut outbox = Outbox::new();
        let mut report = BulkReport::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let from = lookup::batch_in_semester(&txn, semester.id, from_batch_id).await?;
        let to = lookup::batch_in_semester(&txn, semester.id, to_batch_id).await?;

        for &student_id in student_ids {
            let savepoint = txn.begin().await?;
            let mut item = Outbox::new();

            let result = async {
                let student = lookup::active_student(&savepoint, student_id).await?;
                relocate(&savepoint, &mut item, &semester, &from, &to, &student).await
            }
            .await;

            match settle(savepoint, item, result, &mut outbox).await? {
                Ok(_) => report.succeeded.push(student_id),
                Err(e) => report.record_error(student_id, &e),
            }
        }

        if report.is_success() {
            outbox.push(
                &actor.username,
                format!(
                    "Moved {} student(s) from {} to {}",
                    report.succeeded.len(),
                    from.name,
                    to.name
                ),
            );
        }

        txn.commit().await?;
        outbox.deliver(self.notifier()).await;

        info!(
            "Moved students from {} to {}: {:?}",
            from.name,
            to.name,
            report.counts()
        );
        Ok(report)
    }

    pub async fn enroll_students_in_subject(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
        student_ids: &[i32],
        actor: &Actor,
    ) -> ServiceResult<BulkReport<i32>> {
        let txn = self.db().begin().await?;
        let mut outbox = Outbox::new();
        let mut report = BulkReport::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let (semester_subject, subject) =
            lookup::semester_subject_in_semester(&txn, semester.id, semester_subject_id).await?;

        for &student_id in student_ids {
            let savepoint = txn.begin().await?;
            let mut item = Outbox::new();

            let result = async {
                let student = lookup::active_student(&savepoint, student_id).await?;
                admit_to_subject(
                    &savepoint,
                    &mut item,
                    &semester,
                    &semester_subject,
                    &subject,
                    &student,
                    actor,
                )
                .await
            }
            .await;

            match settle(savepoint, item, result, &mut outbox).await? {
                Ok(_) => report.succeeded.push(student_id),
                Err(e) => report.record_error(student_id, &e),
            }
        }

        if report.is_success() {
            outbox.push(
                &actor.username,
                format!(
                    "Enrolled {} student(s) in {}",
                    report.succeeded.len(),
                    subject.name
                ),
            );
        }

        txn.commit().await?;
        outbox.deliver(self.notifier()).await;

        info!(
            "Enrolled students in subject {}: {:?}",
            subject.name,
            report.counts()
        );
        Ok(report)
    }

    pub async fn unenroll_students_from_subject(
        &self,
        semester_id: i32,
        semester_subject_id: i32,
        student_ids: &[i32],
        actor: &Actor,
    ) -> ServiceResult<BulkReport<i32>> {
        let txn = self.db().begin().await?;
        let mut outbox = Outbox::new();
        let mut report = BulkReport::new();

        let semester = lookup::semester(&txn, semester_id).await?;
        let (semester_subject, subject) =
            lookup::semester_subject_in_semester(&txn, semester.id, semester_subject_id).await?;

        for &student_id in student_ids {
            let savepoint = txn.begin().await?;
            let mut item = Outbox::new();

            let result = async {
                let student = lookup::active_student(&savepoint, student_id).await?;
                withdraw_from_subject(
                    &savepoint,
                    &mut item,
                    &semester,
                    &semester_subject,
                    &subject,
                    &student,
                )
                .await
            }
            .await;

            match settle(savepoint, item, result, &mut outbox).await? {
                Ok(SubjectRemoval::NotEnrolled) => report.not_enrolled.push(student_id),
                Ok(SubjectRemoval::Removed { .. }) => report.succeeded.push(student_id),
                Err(e) => report.record_error(student_id, &e),
            }
        }

        if report.is_success() {
            outbox.push(
                &actor.username,
                format!(
                    "Removed {} student(s) from {}",
                    report.succeeded.len(),
                    subject.name
                ),
            );
        }

        txn.commit().await?;
        outbox.deliver(self.notifier()).await;

        info!(
            "Removed students from subject {}: {:?}",
            subject.name,
            report.counts()
        );
        Ok(report)
    }

    /// Enrolls students listed by email into one batch
    ///
    /// `emails` is split on commas, semicolons and newlines. Malformed entries
    /// are reported under `invalid`, unknown or inactive students under
    /// `not_found`. The whole run shares one transaction.
    pub async fn bulk_enroll(
        &self,
        semester_id: i32,
        batch_id: i32,
        emails: &str,
        actor: &Actor,
    ) -> ServiceResult<BulkReport<String>> {
        let list = parse_email_list(emails);
        if list.valid.is_empty() && list.invalid.is_empty() {
            return Err(ServiceError::validation("No email addresses provided"));
        }

        let txn = self.db().begin().await?;
        let mut outbox = Outbox::new();
        let mut report = BulkReport::new();
        report.invalid = list.invalid;

        let semester = lookup::semester(&txn, semester_id).await?;
        let batch = lookup::batch_in_semester(&txn, semester.id, batch_id).await?;

        for email in list.valid {
            let savepoint = txn.begin().await?;
            let mut item = Outbox::new();

            let result = async {
                let student = lookup::active_student_by_email(&savepoint, &email).await?;
                admit_to_batch(&savepoint, &mut item, &semester, &batch, &student, actor).await
            }
            .await;

            match settle(savepoint, item, result, &mut outbox).await? {
                Ok(_) => report.succeeded.push(email),
                Err(e) => report.record_error(email, &e),
            }
        }

        if report.is_success() {
            outbox.push(
                &actor.username,
                format!(
                    "Bulk enrolled {} student(s) in {} (Batch: {})",
                    report.succeeded.len(),
                    semester.name,
                    batch.name
                ),
            );
        }

        txn.commit().await?;
        outbox.deliver(self.notifier()).await;

        info!(
            "Bulk enrollment into {} / {}: {:?}",
            semester.name,
            batch.name,
            report.counts()
        );
        Ok(report)
    }
}
