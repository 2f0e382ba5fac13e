mod common;

use common::{admin, fixture, student};
use database::services::{EnrollmentService, InboxService, notify::DbNotifier};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_stored_notifications_reach_the_inbox() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let notifier = DbNotifier::new(f.db.clone());

    EnrollmentService::new(&f.db, &notifier)
        .enroll_in_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    let unread = InboxService::unread(&f.db, &alice.email).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(
        unread[0].message,
        "You have been enrolled in Fall 2024 (Batch: Fall 2024 - Default Batch)"
    );
    assert!(!unread[0].is_read);

    // Nobody else sees Alice's messages
    let registrar = InboxService::unread(&f.db, "registrar").await.unwrap();
    assert!(registrar.iter().all(|n| n.recipient == "registrar"));
}

#[tokio::test]
async fn test_mark_read_and_clear() {
    let f = fixture().await;
    let alice = student(&f.db, "Alice").await;
    let bob = student(&f.db, "Bob").await;
    let notifier = DbNotifier::new(f.db.clone());
    let service = EnrollmentService::new(&f.db, &notifier);

    for s in [&alice, &bob] {
        service
            .enroll_in_batch(f.semester.id, f.default_batch.id, s.id, &admin())
            .await
            .unwrap();
    }
    service
        .unenroll_from_batch(f.semester.id, f.default_batch.id, alice.id, &admin())
        .await
        .unwrap();

    let unread = InboxService::unread(&f.db, &alice.email).await.unwrap();
    assert_eq!(unread.len(), 2);

    let marked = InboxService::mark_all_read(&f.db, &alice.email).await.unwrap();
    assert_eq!(marked, unread.len() as u64);
    assert!(InboxService::unread(&f.db, &alice.email).await.unwrap().is_empty());
    assert_eq!(
        InboxService::mark_all_read(&f.db, &alice.email).await.unwrap(),
        0
    );

    // Read messages are still there until cleared
    let cleared = InboxService::clear(&f.db, &alice.email).await.unwrap();
    assert_eq!(cleared, marked);

    assert_eq!(InboxService::unread(&f.db, &bob.email).await.unwrap().len(), 1);
}
