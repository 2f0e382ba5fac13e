mod common;

use async_trait::async_trait;
use common::{admin, assign, batch, fixture, student, subject};
use database::{
    entities::{batches, semester_enrollments, semester_subjects, semesters, subject_enrollments},
    services::{
        EnrollmentService, ServiceError, StudentService,
        enrollment::{CascadeCounts, SubjectRemoval},
        notify::{MemoryNotifier, NotifyError, Notifier},
        semester::BatchInput,
        SemesterService,
    },
};
use models::{capacity::Capacity, status::EnrollmentStatus};
use pretty_assertions::assert_eq;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn test_batch_capacity_is_enforced() {
    let f = fixture().await;
    let small = batch(&f.db, &f.notifier, f.semester.id, "Morning", 1).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    let enrollment = service
        .enroll_in_batch(f.semester.id, small.id, alice.id, &admin())
        .await
        .unwrap();
    assert_eq!(enrollment.batch_id, small.id);
    assert_eq!(enrollment.status, EnrollmentStatus::Active);
    assert_eq!(enrollment.enrolled_by.as_deref(), Some("registrar"));

    let err = service
        .enroll_in_batch(f.semester.id, small.id, bob.id, &admin())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ServiceError::CapacityExceeded { max: 1, .. }),
        "{err:?}"
    );

    let occupancy = service.batch_occupancy(small.id).await.unwrap();
    assert_eq!(occupancy.enrolled, 1);
    assert_eq!(occupancy.available_spots, Some(0));
    assert!(!occupancy.can_enroll);

    // Freeing the seat lets the next student in
    service
        .unenroll_from_batch(f.semester.id, small.id, alice.id, &admin())
        .await
        .unwrap();
    let enrollment = service
        .enroll_in_batch(f.semester.id, small.id, bob.id, &admin())
        .await
        .unwrap();
    assert_eq!(enrollment.student_id, bob.id);
    assert_eq!(enrollment.batch_id, small.id);

    let occupancy = service.batch_occupancy(small.id).await.unwrap();
    assert_eq!(occupancy.enrolled, 1);
    assert!(!occupancy.can_enroll);
}

#[tokio::test]
async fn test_double_enrollment_is_rejected() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    // A second batch of the same semester is still the same semester
    let other = batch(&f.db, &f.notifier, f.semester.id, "Evening", 10).await;
    let err = service
        .enroll_in_batch(f.semester.id, other.id, alice.id, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "already_enrolled");

    let rows = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::StudentId.eq(alice.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_subject_enrollment_creates_semester_enrollment() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    let enrollment = service
        .enroll_in_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap();

    let backing = semester_enrollments::Entity::find_by_id(enrollment.semester_enrollment_id)
        .one(&f.db)
        .await
        .unwrap()
        .expect("semester enrollment was created");
    assert_eq!(backing.semester_id, f.semester.id);
    assert_eq!(backing.student_id, alice.id);
    assert_eq!(backing.batch_id, f.default_batch.id);
    assert_eq!(backing.status, EnrollmentStatus::Active);

    let messages = f.notifier.messages_for(&alice.email);
    assert!(messages.contains(&"You have been enrolled in Algebra".to_string()));
    assert!(messages.contains(&format!(
        "You have been enrolled in {} (Batch: {})",
        f.semester.name, f.default_batch.name
    )));
}

#[tokio::test]
async fn test_subject_enrollment_uses_next_batch_with_room() {
    let f = fixture().await;
    let extra = batch(&f.db, &f.notifier, f.semester.id, "Overflow", 5).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;

    SemesterService::new(&f.db, &f.notifier)
        .edit_batch(
            f.semester.id,
            f.default_batch.id,
            BatchInput {
                name: f.default_batch.name.clone(),
                max_students: Some(1),
            },
            &admin(),
        )
        .await
        .unwrap();

    let service = EnrollmentService::new(&f.db, &f.notifier);
    service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    let enrollment = service
        .enroll_in_subject(f.semester.id, assignment.id, bob.id, &admin())
        .await
        .unwrap();
    let backing = semester_enrollments::Entity::find_by_id(enrollment.semester_enrollment_id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(backing.batch_id, extra.id);
}

#[tokio::test]
async fn test_subject_enrollment_fails_when_every_batch_is_full() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;

    SemesterService::new(&f.db, &f.notifier)
        .edit_batch(
            f.semester.id,
            f.default_batch.id,
            BatchInput {
                name: f.default_batch.name.clone(),
                max_students: Some(1),
            },
            &admin(),
        )
        .await
        .unwrap();

    let service = EnrollmentService::new(&f.db, &f.notifier);
    service
        .enroll_in_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap();

    let err = service
        .enroll_in_subject(f.semester.id, assignment.id, bob.id, &admin())
        .await
        .unwrap_err();
    match err {
        ServiceError::CapacityExceeded { target, max } => {
            assert_eq!(target, format!("Every batch of {}", f.semester.name));
            assert_eq!(max, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Nothing of Bob's survived the failed attempt
    let rows = subject_enrollments::Entity::find()
        .filter(subject_enrollments::Column::StudentId.eq(bob.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn test_subject_capacity_of_one() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let lab = subject(&f.db, "Lab").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, lab.id, 1).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap();
    let err = service
        .enroll_in_subject(f.semester.id, assignment.id, bob.id, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "capacity_exceeded");

    let occupancy = service.subject_occupancy(assignment.id).await.unwrap();
    assert_eq!(occupancy.enrolled, 1);
    assert_eq!(occupancy.capacity, Capacity::Bounded(1));
    assert_eq!(occupancy.available_spots, Some(0));
}

#[tokio::test]
async fn test_zero_max_students_means_unlimited() {
    let f = fixture().await;
    let open = subject(&f.db, "Open Seminar").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, open.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    for name in ["Alice", "Bob", "Carol", "Dave"] {
        let s = student(&f.db, name).await;
        service
            .enroll_in_subject(f.semester.id, assignment.id, s.id, &admin())
            .await
            .unwrap();
    }

    let occupancy = service.subject_occupancy(assignment.id).await.unwrap();
    assert_eq!(occupancy.enrolled, 4);
    assert_eq!(occupancy.capacity, Capacity::Unlimited);
    assert_eq!(occupancy.available_spots, None);
    assert!(occupancy.can_enroll);
    assert_eq!(occupancy.utilization, 0.0);
}

#[tokio::test]
async fn test_unenroll_from_subject_is_idempotent() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let algebra = subject(&f.db, "Algebra").await;
    let biology = subject(&f.db, "Biology").await;
    let a = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let b = assign(&f.db, &f.notifier, f.semester.id, biology.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_subject(f.semester.id, a.id, alice.id, &admin())
        .await
        .unwrap();
    service
        .enroll_in_subject(f.semester.id, b.id, alice.id, &admin())
        .await
        .unwrap();

    let first = service
        .unenroll_from_subject(f.semester.id, a.id, alice.id, &admin())
        .await
        .unwrap();
    assert_eq!(
        first,
        SubjectRemoval::Removed {
            semester_enrollment_removed: false
        }
    );

    let second = service
        .unenroll_from_subject(f.semester.id, a.id, alice.id, &admin())
        .await
        .unwrap();
    assert_eq!(second, SubjectRemoval::NotEnrolled);

    // Biology still holds the semester enrollment
    let semester_rows = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::StudentId.eq(alice.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(semester_rows, 1);
}

#[tokio::test]
async fn test_last_subject_removal_drops_semester_enrollment() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap();

    let removal = service
        .unenroll_from_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap();
    assert_eq!(
        removal,
        SubjectRemoval::Removed {
            semester_enrollment_removed: true
        }
    );

    let semester_rows = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::StudentId.eq(alice.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(semester_rows, 0);

    let messages = f.notifier.messages_for(&alice.email);
    assert!(messages.contains(&format!(
        "You have been removed from semester {} due to no remaining subject enrollments",
        f.semester.name
    )));
    assert!(messages.contains(&"You have been removed from Algebra".to_string()));
}

#[tokio::test]
async fn test_remove_from_semester_deletes_subject_enrollments() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let algebra = subject(&f.db, "Algebra").await;
    let biology = subject(&f.db, "Biology").await;
    let a = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let b = assign(&f.db, &f.notifier, f.semester.id, biology.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    for id in [a.id, b.id] {
        service
            .enroll_in_subject(f.semester.id, id, alice.id, &admin())
            .await
            .unwrap();
    }

    let removal = service
        .remove_from_semester(f.semester.id, alice.id, &admin())
        .await
        .unwrap();
    assert_eq!(removal.subject_enrollments_removed, 2);
    assert_eq!(removal.enrollment.batch_id, f.default_batch.id);

    let remaining = subject_enrollments::Entity::find()
        .filter(subject_enrollments::Column::StudentId.eq(alice.id))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let err = service
        .remove_from_semester(f.semester.id, alice.id, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_enrolled");
}

#[tokio::test]
async fn test_unenroll_from_batch_requires_matching_batch() {
    let f = fixture().await;
    let other = batch(&f.db, &f.notifier, f.semester.id, "Evening", 10).await;
    let alice = student(&f.db, "Alice").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    let err = service
        .unenroll_from_batch(f.semester.id, other.id, alice.id, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_enrolled");

    service
        .unenroll_from_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();
    assert_eq!(
        service
            .batch_occupancy(f.default_batch.id)
            .await
            .unwrap()
            .enrolled,
        0
    );
}

#[tokio::test]
async fn test_move_keeps_enrollment_date_and_subjects() {
    let f = fixture().await;
    let target = batch(&f.db, &f.notifier, f.semester.id, "Evening", 10).await;
    let alice = student(&f.db, "Alice").await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    let subject_enrollment = service
        .enroll_in_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap();
    let before = semester_enrollments::Entity::find_by_id(subject_enrollment.semester_enrollment_id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();

    let moved = service
        .move_between_batches(
            f.semester.id,
            alice.id,
            f.default_batch.id,
            target.id,
            &admin(),
        )
        .await
        .unwrap();

    assert_eq!(moved.id, before.id);
    assert_eq!(moved.batch_id, target.id);
    assert_eq!(moved.enrollment_date, before.enrollment_date);

    let still_enrolled = subject_enrollments::Entity::find_by_id(subject_enrollment.id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_enrolled.status, EnrollmentStatus::Active);
    assert_eq!(still_enrolled.semester_enrollment_id, before.id);
}

#[tokio::test]
async fn test_move_into_full_batch_is_rejected() {
    let f = fixture().await;
    let target = batch(&f.db, &f.notifier, f.semester.id, "Tiny", 1).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, target.id, alice.id, &admin())
        .await
        .unwrap();
    service
        .enroll_in_batch(f.semester.id, f.default_batch.id, bob.id, &admin())
        .await
        .unwrap();

    let err = service
        .move_between_batches(f.semester.id, bob.id, f.default_batch.id, target.id, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "capacity_exceeded");

    let err = service
        .move_between_batches(
            f.semester.id,
            bob.id,
            f.default_batch.id,
            f.default_batch.id,
            &admin(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");

    let bob_row = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::StudentId.eq(bob.id))
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob_row.batch_id, f.default_batch.id);
}

#[tokio::test]
async fn test_status_change_cascades_to_subjects() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 1).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    let subject_enrollment = service
        .enroll_in_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap();

    let enrollment = service
        .change_enrollment_status(f.semester.id, alice.id, EnrollmentStatus::Dropped, &admin())
        .await
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Dropped);

    let cascaded = subject_enrollments::Entity::find_by_id(subject_enrollment.id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cascaded.status, EnrollmentStatus::Dropped);

    // Dropped records no longer count toward capacity
    let occupancy = service.subject_occupancy(assignment.id).await.unwrap();
    assert_eq!(occupancy.enrolled, 0);
    assert!(occupancy.can_enroll);

    let err = service
        .change_enrollment_status(f.semester.id, alice.id, EnrollmentStatus::Active, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn test_reenrolling_revives_a_dropped_enrollment() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    let original = service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();
    service
        .change_enrollment_status(f.semester.id, alice.id, EnrollmentStatus::Dropped, &admin())
        .await
        .unwrap();

    let revived = service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();
    assert_eq!(revived.id, original.id);
    assert_eq!(revived.status, EnrollmentStatus::Active);
}

#[tokio::test]
async fn test_subject_enrollment_refuses_dropped_semester_enrollment() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let algebra = subject(&f.db, "Algebra").await;
    let assignment = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();
    service
        .change_enrollment_status(f.semester.id, alice.id, EnrollmentStatus::Inactive, &admin())
        .await
        .unwrap();

    let err = service
        .enroll_in_subject(f.semester.id, assignment.id, alice.id, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invariant_violation");
}

#[tokio::test]
async fn test_every_active_subject_enrollment_has_active_semester_enrollment() {
    let f = fixture().await;
    let algebra = subject(&f.db, "Algebra").await;
    let biology = subject(&f.db, "Biology").await;
    let a = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let b = assign(&f.db, &f.notifier, f.semester.id, biology.id, 2).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    let mut ids = Vec::new();
    for name in ["Alice", "Bob", "Carol"] {
        ids.push(student(&f.db, name).await.id);
    }
    for &id in &ids {
        service
            .enroll_in_subject(f.semester.id, a.id, id, &admin())
            .await
            .unwrap();
        // Carol bounces off Biology's limit
        let _ = service.enroll_in_subject(f.semester.id, b.id, id, &admin()).await;
    }
    service
        .unenroll_from_subject(f.semester.id, a.id, ids[0], &admin())
        .await
        .unwrap();
    service
        .unenroll_from_subject(f.semester.id, a.id, ids[2], &admin())
        .await
        .unwrap();

    let active = subject_enrollments::Entity::find()
        .filter(subject_enrollments::Column::Status.eq(EnrollmentStatus::Active))
        .all(&f.db)
        .await
        .unwrap();
    assert!(!active.is_empty());

    for enrollment in active {
        let backing = semester_enrollments::Entity::find_by_id(enrollment.semester_enrollment_id)
            .one(&f.db)
            .await
            .unwrap()
            .expect("dangling subject enrollment");
        assert_eq!(backing.student_id, enrollment.student_id);
        assert_eq!(backing.status, EnrollmentStatus::Active);
    }

    // Carol lost her only subject and with it the semester
    let carol_rows = semester_enrollments::Entity::find()
        .filter(semester_enrollments::Column::StudentId.eq(ids[2]))
        .count(&f.db)
        .await
        .unwrap();
    assert_eq!(carol_rows, 0);
}

#[tokio::test]
async fn test_delete_semester_cascade_counts_children() {
    let f = fixture().await;
    let evening = batch(&f.db, &f.notifier, f.semester.id, "Evening", 10).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let algebra = subject(&f.db, "Algebra").await;
    let biology = subject(&f.db, "Biology").await;
    let a = assign(&f.db, &f.notifier, f.semester.id, algebra.id, 0).await;
    let b = assign(&f.db, &f.notifier, f.semester.id, biology.id, 0).await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, evening.id, bob.id, &admin())
        .await
        .unwrap();
    for id in [a.id, b.id] {
        service
            .enroll_in_subject(f.semester.id, id, alice.id, &admin())
            .await
            .unwrap();
    }
    service
        .enroll_in_subject(f.semester.id, a.id, bob.id, &admin())
        .await
        .unwrap();

    let counts = service
        .delete_semester_cascade(f.semester.id, &admin())
        .await
        .unwrap();
    assert_eq!(
        counts,
        CascadeCounts {
            subject_enrollments: 3,
            semester_enrollments: 2,
            semester_subjects: 2,
            batches: 2,
        }
    );

    assert_eq!(semesters::Entity::find().count(&f.db).await.unwrap(), 0);
    assert_eq!(batches::Entity::find().count(&f.db).await.unwrap(), 0);
    assert_eq!(semester_subjects::Entity::find().count(&f.db).await.unwrap(), 0);
    assert_eq!(
        f.notifier.messages_for("registrar").last().cloned(),
        Some(format!("Deleted semester: {}", f.semester.name))
    );
}

#[tokio::test]
async fn test_inactive_student_cannot_enroll() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    StudentService::deactivate(&f.db, alice.id).await.unwrap();

    let err = EnrollmentService::new(&f.db, &f.notifier)
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_batch_of_another_semester_is_not_found() {
    let f = fixture().await;
    let spring = common::semester(&f.db, &f.notifier, f.department.id, "Spring 2025").await;
    let alice = student(&f.db, "Alice").await;

    let err = EnrollmentService::new(&f.db, &f.notifier)
        .enroll_in_batch(spring.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ServiceError::EntityNotFound { entity: "Batch", .. }),
        "{err:?}"
    );
}

struct BrokenNotifier;

#[async_trait]
impl Notifier for BrokenNotifier {
    async fn notify(&self, recipient: &str, _message: &str) -> Result<(), NotifyError> {
        Err(NotifyError {
            recipient: recipient.to_string(),
            reason: "mail server unreachable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_notification_failure_does_not_undo_enrollment() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;

    let enrollment = EnrollmentService::new(&f.db, &BrokenNotifier)
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    let stored = semester_enrollments::Entity::find_by_id(enrollment.id)
        .one(&f.db)
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_failed_operation_sends_nothing() {
    let f = fixture().await;
    let small = batch(&f.db, &f.notifier, f.semester.id, "Tiny", 1).await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let service = EnrollmentService::new(&f.db, &f.notifier);

    service
        .enroll_in_batch(f.semester.id, small.id, alice.id, &admin())
        .await
        .unwrap();

    let quiet = MemoryNotifier::new();
    let _ = EnrollmentService::new(&f.db, &quiet)
        .enroll_in_batch(f.semester.id, small.id, bob.id, &admin())
        .await
        .unwrap_err();
    assert!(quiet.sent().is_empty());
}
