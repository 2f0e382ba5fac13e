mod common;

use common::{admin, assign, batch, fixture, student, subject};
use database::{
    entities::semester_enrollments,
    services::{EnrollmentService, StudentService},
};
use pretty_assertions::assert_eq;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn test_bulk_add_stops_at_capacity() {
    let f = fixture().await;
    let pair = batch(&f.db, &f.notifier, f.semester.id, "Pair", 2).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let carol = student(&f.db, "Carol").await;

    let report = EnrollmentService::new(&f.db, &f.notifier)
        .add_students_to_batch(
            f.semester.id,
            pair.id,
            &[alice.id, bob.id, carol.id],
            &admin(),
        )
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec![alice.id, bob.id]);
    assert_eq!(report.capacity_exhausted, vec![carol.id]);
    assert!(report.is_success());
    assert_eq!(report.total(), 3);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["capacity_exhausted"], serde_json::json!([carol.id]));
    assert_eq!(json["failed"], serde_json::json!([]));

    let enrolled = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::BatchId.eq(pair.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(enrolled, 2);
}

#[tokio::test]
async fn test_bulk_add_sorts_failures() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let dropped = student(&f.db, "Dora").await;
    StudentService::deactivate(&f.db, dropped.id).await.unwrap();
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    let report = service
        .add_students_to_batch(
            f.semester.id,
            f.default_batch.id,
            &[alice.id, bob.id, dropped.id, 9999],
            &admin(),
        )
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec![bob.id]);
    assert_eq!(report.already_enrolled, vec![alice.id]);
    assert_eq!(report.not_found, vec![dropped.id, 9999]);
    assert!(report.failed.is_empty());

    let warnings = report.warnings();
    assert!(warnings.contains(&format!("Already enrolled: {}", alice.id)));
    assert!(warnings.contains(&format!("Students not found: {}, 9999", dropped.id)));

    // One summary line for the actor, one welcome for Bob
    assert_eq!(
        f.notifier.messages_for("registrar").last().cloned(),
        Some(format!("Enrolled 1 student(s) in batch {}", f.default_batch.name))
    );
    assert_eq!(f.notifier.messages_for(&bob.email).len(), 1);
}

#[tokio::test]
async fn test_bulk_remove_reports_strangers() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    let report = service
        .remove_students_from_batch(f.semester.id, f.default_batch.id, &[alice.id, bob.id], &admin())
        .await
        .unwrap();
    assert_eq!(report.succeeded, vec![alice.id]);
    assert_eq!(report.not_enrolled, vec![bob.id]);
}

#[tokio::test]
async fn test_bulk_move_partial() {
    let f = fixture().await;
    let target = batch(&f.db, &f.notifier, f.semester.id, "Evening", 1).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .add_students_to_batch(f.semester.id, f.default_batch.id, &[alice.id, bob.id], &admin())
        .await
        .unwrap();

    let report = service
        .move_students_between_batches(
            f.semester.id,
            f.default_batch.id,
            target.id,
            &[alice.id, bob.id],
            &admin(),
        )
        .await
        .unwrap();
    assert_eq!(report.succeeded, vec![alice.id]);
    assert_eq!(report.capacity_exhausted, vec![bob.id]);

    let err = service
        .move_students_between_batches(f.semester.id, target.id, target.id, &[alice.id], &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn test_bulk_subject_enrollment_and_removal() {
    let f = fixture().await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 2).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let carol = student(&f.db, "Carol").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    let report = service
        .enroll_students_in_subject(
            f.semester.id,
            assignment.id,
            &[alice.id, bob.id, alice.id, carol.id],
            &admin(),
        )
        .await
        .unwrap();
    assert_eq!(report.succeeded, vec![alice.id, bob.id]);
    assert_eq!(report.already_enrolled, vec![alice.id]);
    assert_eq!(report.capacity_exhausted, vec![carol.id]);

    let report = service
        .unenroll_students_from_subject(
            f.semester.id,
            assignment.id,
            &[alice.id, carol.id],
            &admin(),
        )
        .await
        .unwrap();
    assert_eq!(report.succeeded, vec![alice.id]);
    assert_eq!(report.not_enrolled, vec![carol.id]);

    // Algebra was Alice's only subject
    let alice_rows = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::StudentId.eq(alice.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(alice_rows, 0);
}

#[tokio::test]
async fn test_bulk_enroll_by_email() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;

    let report = EnrollmentService::new(&f.db, &f.notifier)
        .bulk_enroll(
            f.semester.id,
            f.default_batch.id,
            "ALICE@school.org; bob@school.org\nnobody@school.org, not-an-email",
            &admin(),
        )
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec![alice.email.clone(), bob.email.clone()]);
    assert_eq!(report.not_found, vec!["nobody@school.org".to_string()]);
    assert_eq!(report.invalid, vec!["not-an-email".to_string()]);
    assert_eq!(report.counts().succeeded, 2);
}

#[tokio::test]
async fn test_bulk_enroll_by_email_stops_at_capacity() {
    let f = fixture().await;
    let pair = batch(&f.db, &f.notifier, f.semester.id, "Pair", 2).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let carol = student(&f.db, "Carol").await;

    let report = EnrollmentService::new(&f.db, &f.notifier)
        .bulk_enroll(
            f.semester.id,
            pair.id,
            "alice@school.org, bob@school.org, Alice@school.org\nnobody@school.org; carol@school.org",
            &admin(),
        )
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec![alice.email.clone(), bob.email.clone()]);
    assert_eq!(report.already_enrolled, vec![alice.email.clone()]);
    assert_eq!(report.not_found, vec!["nobody@school.org".to_string()]);
    assert_eq!(report.capacity_exhausted, vec![carol.email.clone()]);
    assert!(report.is_success());

    let seated = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::BatchId.eq(pair.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(seated, 2);
    assert_eq!(
        f.notifier.messages_for("registrar").last().map(String::as_str),
        Some("Bulk enrolled 2 student(s) in Fall 2024 (Batch: Pair)")
    );
}

#[tokio::test]
async fn test_bulk_enroll_requires_addresses() {
    let f = fixture().await;

    let err = EnrollmentService::new(&f.db, &f.notifier)
        .bulk_enroll(f.semester.id, f.default_batch.id, " ,; \n", &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn test_bulk_with_nothing_done_skips_summary() {
    let f = fixture().await;

    let report = EnrollmentService::new(&f.db, &f.notifier)
        .add_students_to_batch(f.semester.id, f.default_batch.id, &[4242], &admin())
        .await
        .unwrap();
    assert!(!report.is_success());
    assert_eq!(report.not_found, vec![4242]);

    let registrar = f.notifier.messages_for("registrar");
    assert!(registrar.iter().all(|m| !m.starts_with("Enrolled")));
}
