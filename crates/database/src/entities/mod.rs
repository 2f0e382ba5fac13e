pub mod batch;
pub mod department;
pub mod notification;
pub mod semester;
pub mod semester_enrollment;
pub mod semester_subject;
pub mod student;
pub mod subject;
pub mod subject_enrollment;
pub mod teacher;

pub use batch as batches;
pub use department as departments;
pub use notification as notifications;
pub use semester as semesters;
pub use semester_enrollment as semester_enrollments;
pub use semester_subject as semester_subjects;
pub use student as students;
pub use subject as subjects;
pub use subject_enrollment as subject_enrollments;
pub use teacher as teachers;
