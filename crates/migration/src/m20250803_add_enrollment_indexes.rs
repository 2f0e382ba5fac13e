use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A student holds at most one enrollment per semester
        manager
            .create_index(
                Index::create()
                    .name("uq_semester_enrollments_semester_student")
                    .table(SemesterEnrollments::Table)
                    .col(SemesterEnrollments::SemesterId)
                    .col(SemesterEnrollments::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ... and at most one enrollment per semester subject
        manager
            .create_index(
                Index::create()
                    .name("uq_subject_enrollments_subject_student")
                    .table(SubjectEnrollments::Table)
                    .col(SubjectEnrollments::SemesterSubjectId)
                    .col(SubjectEnrollments::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_semesters_name_year_department")
                    .table(Semesters::Table)
                    .col(Semesters::Name)
                    .col(Semesters::AcademicYear)
                    .col(Semesters::DepartmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_batches_name_semester")
                    .table(Batches::Table)
                    .col(Batches::Name)
                    .col(Batches::SemesterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_semester_subjects_semester_subject")
                    .table(SemesterSubjects::Table)
                    .col(SemesterSubjects::SemesterId)
                    .col(SemesterSubjects::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookup indexes for capacity counts and per-batch listings
        manager
            .create_index(
                Index::create()
                    .name("idx_semester_enrollments_batch_status")
                    .table(SemesterEnrollments::Table)
                    .col(SemesterEnrollments::BatchId)
                    .col(SemesterEnrollments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_semester_enrollments_student_id")
                    .table(SemesterEnrollments::Table)
                    .col(SemesterEnrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subject_enrollments_semester_enrollment_id")
                    .table(SubjectEnrollments::Table)
                    .col(SubjectEnrollments::SemesterEnrollmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subject_enrollments_subject_status")
                    .table(SubjectEnrollments::Table)
                    .col(SubjectEnrollments::SemesterSubjectId)
                    .col(SubjectEnrollments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_batches_semester_id")
                    .table(Batches::Table)
                    .col(Batches::SemesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_semesters_department_status")
                    .table(Semesters::Table)
                    .col(Semesters::DepartmentId)
                    .col(Semesters::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for name in [
            "idx_semesters_department_status",
            "idx_batches_semester_id",
            "idx_subject_enrollments_subject_status",
            "idx_subject_enrollments_semester_enrollment_id",
            "idx_semester_enrollments_student_id",
            "idx_semester_enrollments_batch_status",
            "uq_semester_subjects_semester_subject",
            "uq_batches_name_semester",
            "uq_semesters_name_year_department",
            "uq_subject_enrollments_subject_student",
            "uq_semester_enrollments_semester_student",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Semesters {
    Table,
    Name,
    AcademicYear,
    DepartmentId,
    Status,
}

#[derive(Iden)]
enum Batches {
    Table,
    Name,
    SemesterId,
}

#[derive(Iden)]
enum SemesterSubjects {
    Table,
    SemesterId,
    SubjectId,
}

#[derive(Iden)]
enum SemesterEnrollments {
    Table,
    SemesterId,
    StudentId,
    BatchId,
    Status,
}

#[derive(Iden)]
enum SubjectEnrollments {
    Table,
    SemesterSubjectId,
    StudentId,
    SemesterEnrollmentId,
    Status,
}
