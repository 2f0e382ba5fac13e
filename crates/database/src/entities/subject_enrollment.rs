use models::status::EnrollmentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's place in a semester subject, always backed by a semester enrollment
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub semester_subject_id: i32,
    pub student_id: i32,
    pub semester_enrollment_id: i32,
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
        belongs_to = "super::semester_subject::Entity",
        from = "Column::SemesterSubjectId",
        to = "super::semester_subject::Column::Id",
        on_delete = "Restrict"
    )]
    SemesterSubject,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Restrict"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::semester_enrollment::Entity",
        from = "Column::SemesterEnrollmentId",
        to = "super::semester_enrollment::Column::Id",
        on_delete = "Restrict"
    )]
    SemesterEnrollment,
}

impl Related<super::semester_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterSubject.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::semester_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterEnrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
