use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create teachers table
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teachers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Teachers::TeacherCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::FirstName).string().not_null())
                    .col(ColumnDef::new(Teachers::LastName).string().not_null())
                    .col(ColumnDef::new(Teachers::Gender).text().not_null())
                    .col(ColumnDef::new(Teachers::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Teachers::Mobile).string().not_null())
                    .col(ColumnDef::new(Teachers::JoiningDate).date().not_null())
                    .col(ColumnDef::new(Teachers::Qualification).string().not_null())
                    .col(
                        ColumnDef::new(Teachers::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Teachers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::Address).text())
                    .col(
                        ColumnDef::new(Teachers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Teachers::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Teachers::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Teachers::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::DepartmentCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(ColumnDef::new(Departments::HeadTeacherId).integer())
                    .col(ColumnDef::new(Departments::StartDate).date().not_null())
                    .col(ColumnDef::new(Departments::Description).text())
                    .col(
                        ColumnDef::new(Departments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Departments::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Departments::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Departments::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-departments-head_teacher_id")
                            .from(Departments::Table, Departments::HeadTeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::StudentCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Gender).text().not_null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Students::StudentClass).string().not_null())
                    .col(ColumnDef::new(Students::Section).string().not_null())
                    .col(
                        ColumnDef::new(Students::AdmissionNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::JoiningDate).date().not_null())
                    .col(ColumnDef::new(Students::MobileNumber).string().not_null())
                    .col(
                        ColumnDef::new(Students::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Students::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Students::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subjects::SubjectCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::ClassName).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text())
                    .col(
                        ColumnDef::new(Subjects::Credits)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Subjects::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Subjects::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Subjects::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Teachers {
    Table,
    Id,
    TeacherCode,
    FirstName,
    LastName,
    Gender,
    DateOfBirth,
    Mobile,
    JoiningDate,
    Qualification,
    Username,
    Email,
    Address,
    IsActive,
    Slug,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    DepartmentCode,
    Name,
    HeadTeacherId,
    StartDate,
    Description,
    IsActive,
    Slug,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    StudentCode,
    FirstName,
    LastName,
    Email,
    Gender,
    DateOfBirth,
    StudentClass,
    Section,
    AdmissionNumber,
    JoiningDate,
    MobileNumber,
    IsActive,
    Slug,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
    SubjectCode,
    Name,
    ClassName,
    Description,
    Credits,
    IsActive,
    Slug,
    CreatedAt,
    UpdatedAt,
}
