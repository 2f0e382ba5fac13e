use models::status::SemesterStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "semesters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub semester_code: String,
    pub name: String,
    pub department_id: i32,
    pub academic_year: String, // e.g. 2024-2025
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Text")]
    pub status: SemesterStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<String>,
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_delete = "Restrict"
    )]
    Department,
    #[sea_orm(has_many = "super::batch::Entity")]
    Batches,
    #[sea_orm(has_many = "super::semester_subject::Entity")]
    SemesterSubjects,
    #[sea_orm(has_many = "super::semester_enrollment::Entity")]
    SemesterEnrollments,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl Related<super::semester_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterSubjects.def()
    }
}

impl Related<super::semester_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
