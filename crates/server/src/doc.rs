use crate::routes::{
    batches, dashboard, departments, health, me, notifications, semester_subjects, semesters,
    students, subjects, teachers,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        me::me,
        dashboard::dashboard,
        notifications::unread_notifications,
        notifications::mark_notifications_read,
        notifications::clear_notifications,
        departments::list_departments,
        departments::get_department,
        departments::create_department,
        departments::update_department,
        departments::delete_department,
        teachers::list_teachers,
        teachers::get_teacher,
        teachers::create_teacher,
        teachers::update_teacher,
        teachers::deactivate_teacher,
        teachers::delete_teacher,
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::deactivate_student,
        students::delete_student,
        subjects::list_subjects,
        subjects::get_subject,
        subjects::create_subject,
        subjects::update_subject,
        subjects::delete_subject,
        semesters::list_semesters,
        semesters::create_semester,
        semesters::get_semester,
        semesters::update_semester,
        semesters::delete_semester,
        semesters::semester_analytics,
        semesters::export_semester,
        semesters::bulk_enroll,
        semesters::change_enrollment_status,
        batches::list_batches,
        batches::add_batch,
        batches::edit_batch,
        batches::delete_batch,
        batches::batch_students,
        batches::add_batch_students,
        batches::remove_batch_students,
        batches::move_students,
        semester_subjects::list_assignments,
        semester_subjects::assign_subject,
        semester_subjects::edit_assignment,
        semester_subjects::delete_assignment,
        semester_subjects::remove_teacher,
        semester_subjects::subject_students,
        semester_subjects::add_subject_students,
        semester_subjects::remove_subject_students
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Authentication", description = "Authentication related endpoints"),
        (name = "Dashboard", description = "School-wide statistics"),
        (name = "Notifications", description = "The caller's notification inbox"),
        (name = "Departments", description = "Academic departments"),
        (name = "Teachers", description = "Teaching staff"),
        (name = "Students", description = "Student records"),
        (name = "Subjects", description = "Subject catalog"),
        (name = "Semesters", description = "Semesters, analytics and exports"),
        (name = "Batches", description = "Batches within a semester and their members"),
        (name = "Semester Subjects", description = "Subjects offered in a semester and their members"),
        (name = "Enrollments", description = "Bulk enrollment and enrollment status"),
    ),
    info(
        title = "School Enrollment API",
        version = "1.0.0",
        description = "Semesters, batches and subject enrollment for a school",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_nested_semester_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/semesters/{slug}/batches/move-students"));
        assert!(paths.contains_key("/semesters/{slug}/subjects/{id}/students"));
        assert!(paths.contains_key("/semesters/{slug}/enrollments/{student_id}/status"));
        assert!(paths.contains_key("/notifications/read"));
        assert!(paths.contains_key("/dashboard"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("jwt"))
        );
    }
}
