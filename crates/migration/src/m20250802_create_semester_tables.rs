use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create semesters table
        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semesters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Semesters::SemesterCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Semesters::Name).string().not_null())
                    .col(ColumnDef::new(Semesters::DepartmentId).integer().not_null())
                    .col(ColumnDef::new(Semesters::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Semesters::StartDate).date().not_null())
                    .col(ColumnDef::new(Semesters::EndDate).date())
                    .col(
                        ColumnDef::new(Semesters::Status)
                            .text()
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(ColumnDef::new(Semesters::Description).text())
                    .col(
                        ColumnDef::new(Semesters::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Semesters::CreatedBy).string())
                    .col(
                        ColumnDef::new(Semesters::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Semesters::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Semesters::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semesters-department_id")
                            .from(Semesters::Table, Semesters::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create batches table
        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Batches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Batches::BatchCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Batches::Name).string().not_null())
                    .col(ColumnDef::new(Batches::SemesterId).integer().not_null())
                    .col(ColumnDef::new(Batches::AcademicYear).string().not_null())
                    .col(
                        ColumnDef::new(Batches::MaxStudents)
                            .integer()
                            .not_null()
                            .default(50),
                    )
                    .col(
                        ColumnDef::new(Batches::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Batches::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Batches::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Batches::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Batches::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-batches-semester_id")
                            .from(Batches::Table, Batches::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create semester_subjects table
        manager
            .create_table(
                Table::create()
                    .table(SemesterSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SemesterSubjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SemesterSubjects::SemesterId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterSubjects::SubjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SemesterSubjects::TeacherId).integer())
                    .col(
                        ColumnDef::new(SemesterSubjects::Credits)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(SemesterSubjects::HoursPerWeek)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    // 0 means no limit
                    .col(
                        ColumnDef::new(SemesterSubjects::MaxStudents)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SemesterSubjects::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SemesterSubjects::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterSubjects::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_subjects-semester_id")
                            .from(SemesterSubjects::Table, SemesterSubjects::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_subjects-subject_id")
                            .from(SemesterSubjects::Table, SemesterSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_subjects-teacher_id")
                            .from(SemesterSubjects::Table, SemesterSubjects::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create semester_enrollments table (student <-> semester through a batch)
        manager
            .create_table(
                Table::create()
                    .table(SemesterEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SemesterEnrollments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::SemesterId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::StudentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::BatchId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::EnrollmentDate)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::Status)
                            .text()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(SemesterEnrollments::EnrolledBy).string())
                    .col(ColumnDef::new(SemesterEnrollments::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_enrollments-semester_id")
                            .from(SemesterEnrollments::Table, SemesterEnrollments::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_enrollments-student_id")
                            .from(SemesterEnrollments::Table, SemesterEnrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-semester_enrollments-batch_id")
                            .from(SemesterEnrollments::Table, SemesterEnrollments::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create subject_enrollments table (student <-> subject, backed by a semester enrollment)
        manager
            .create_table(
                Table::create()
                    .table(SubjectEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubjectEnrollments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubjectEnrollments::SemesterSubjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectEnrollments::StudentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectEnrollments::SemesterEnrollmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectEnrollments::EnrollmentDate)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectEnrollments::Status)
                            .text()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(SubjectEnrollments::EnrolledBy).string())
                    .col(ColumnDef::new(SubjectEnrollments::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_enrollments-semester_subject_id")
                            .from(
                                SubjectEnrollments::Table,
                                SubjectEnrollments::SemesterSubjectId,
                            )
                            .to(SemesterSubjects::Table, SemesterSubjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_enrollments-student_id")
                            .from(SubjectEnrollments::Table, SubjectEnrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_enrollments-semester_enrollment_id")
                            .from(
                                SubjectEnrollments::Table,
                                SubjectEnrollments::SemesterEnrollmentId,
                            )
                            .to(SemesterEnrollments::Table, SemesterEnrollments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ownership flows semester -> {batch, semester subject} -> semester enrollment -> subject enrollment
        manager
            .drop_table(Table::drop().table(SubjectEnrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SemesterEnrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SemesterSubjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Batches::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
}

#[derive(Iden)]
enum Teachers {
    Table,
    Id,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
}

#[derive(Iden)]
enum Semesters {
    Table,
    Id,
    SemesterCode,
    Name,
    DepartmentId,
    AcademicYear,
    StartDate,
    EndDate,
    Status,
    Description,
    IsActive,
    CreatedBy,
    Slug,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Batches {
    Table,
    Id,
    BatchCode,
    Name,
    SemesterId,
    AcademicYear,
    MaxStudents,
    IsDefault,
    IsActive,
    Slug,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SemesterSubjects {
    Table,
    Id,
    SemesterId,
    SubjectId,
    TeacherId,
    Credits,
    HoursPerWeek,
    MaxStudents,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SemesterEnrollments {
    Table,
    Id,
    SemesterId,
    StudentId,
    BatchId,
    EnrollmentDate,
    Status,
    EnrolledBy,
    Notes,
}

#[derive(Iden)]
enum SubjectEnrollments {
    Table,
    Id,
    SemesterSubjectId,
    StudentId,
    SemesterEnrollmentId,
    EnrollmentDate,
    Status,
    EnrolledBy,
    Notes,
}
