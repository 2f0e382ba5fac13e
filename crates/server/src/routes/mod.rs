pub mod batches;
pub mod dashboard;
pub mod departments;
pub mod health;
pub mod me;
pub mod notifications;
pub mod semester_subjects;
pub mod semesters;
pub mod students;
pub mod subjects;
pub mod teachers;

use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Every route that sits behind the bearer-token layer
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me::me))
        .route("/dashboard", get(dashboard::dashboard))
        .route(
            "/notifications",
            get(notifications::unread_notifications).delete(notifications::clear_notifications),
        )
        .route(
            "/notifications/read",
            post(notifications::mark_notifications_read),
        )
        .route(
            "/departments",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/departments/{id}",
            get(departments::get_department)
                .put(departments::update_department)
                .delete(departments::delete_department),
        )
        .route(
            "/teachers",
            get(teachers::list_teachers).post(teachers::create_teacher),
        )
        .route(
            "/teachers/{id}",
            get(teachers::get_teacher)
                .put(teachers::update_teacher)
                .delete(teachers::delete_teacher),
        )
        .route(
            "/teachers/{id}/deactivate",
            post(teachers::deactivate_teacher),
        )
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route(
            "/students/{id}/deactivate",
            post(students::deactivate_student),
        )
        .route(
            "/subjects",
            get(subjects::list_subjects).post(subjects::create_subject),
        )
        .route(
            "/subjects/{id}",
            get(subjects::get_subject)
                .put(subjects::update_subject)
                .delete(subjects::delete_subject),
        )
        .route(
            "/semesters",
            get(semesters::list_semesters).post(semesters::create_semester),
        )
        .route(
            "/semesters/{slug}",
            get(semesters::get_semester)
                .put(semesters::update_semester)
                .delete(semesters::delete_semester),
        )
        .route(
            "/semesters/{slug}/analytics",
            get(semesters::semester_analytics),
        )
        .route("/semesters/{slug}/export", get(semesters::export_semester))
        .route("/semesters/{slug}/bulk-enroll", post(semesters::bulk_enroll))
        .route(
            "/semesters/{slug}/enrollments/{student_id}/status",
            put(semesters::change_enrollment_status),
        )
        .route(
            "/semesters/{slug}/batches",
            get(batches::list_batches).post(batches::add_batch),
        )
        .route(
            "/semesters/{slug}/batches/move-students",
            post(batches::move_students),
        )
        .route(
            "/semesters/{slug}/batches/{id}",
            put(batches::edit_batch).delete(batches::delete_batch),
        )
        .route(
            "/semesters/{slug}/batches/{id}/students",
            get(batches::batch_students)
                .post(batches::add_batch_students)
                .delete(batches::remove_batch_students),
        )
        .route(
            "/semesters/{slug}/subjects",
            get(semester_subjects::list_assignments).post(semester_subjects::assign_subject),
        )
        .route(
            "/semesters/{slug}/subjects/{id}",
            put(semester_subjects::edit_assignment).delete(semester_subjects::delete_assignment),
        )
        .route(
            "/semesters/{slug}/subjects/{id}/teacher",
            axum::routing::delete(semester_subjects::remove_teacher),
        )
        .route(
            "/semesters/{slug}/subjects/{id}/students",
            get(semester_subjects::subject_students)
                .post(semester_subjects::add_subject_students)
                .delete(semester_subjects::remove_subject_students),
        )
}
