pub mod analytics;
mod bulk;
pub mod codes;
pub mod department;
pub mod enrollment;
pub mod error;
pub mod inbox;
pub mod lookup;
pub mod notify;
pub mod report;
pub mod semester;
pub mod semester_subject;
pub mod student;
pub mod subject;
pub mod teacher;

pub use analytics::AnalyticsService;
pub use department::DepartmentService;
pub use enrollment::EnrollmentService;
pub use error::{ServiceError, ServiceResult};
pub use inbox::InboxService;
pub use semester::SemesterService;
pub use semester_subject::SemesterSubjectService;
pub use student::StudentService;
pub use subject::SubjectService;
pub use teacher::TeacherService;
