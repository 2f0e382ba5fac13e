use models::status::EnrollmentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Links a student to a semester through exactly one batch
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "semester_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub semester_id: i32,
    pub student_id: i32,
    pub batch_id: i32,
    pub enrollment_date: DateTime,
    #[sea_orm(column_type = "Text")]
    pub status: EnrollmentStatus,
    pub enrolled_by: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::semester::Entity",
        from = "Column::SemesterId",
        to = "super::semester::Column::Id",
        on_delete = "Restrict"
    )]
    Semester,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Restrict"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id",
        on_delete = "Restrict"
    )]
    Batch,
    #[sea_orm(has_many = "super::subject_enrollment::Entity")]
    SubjectEnrollments,
}

impl Related<super::semester::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<super::subject_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
