use models::capacity::Capacity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A subject offered in a semester, optionally taught by one teacher
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "semester_subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub semester_id: i32,
    pub subject_id: i32,
    pub teacher_id: Option<i32>,
    pub credits: i32,
    pub hours_per_week: i32,
    pub max_students: i32, // 0 = unlimited
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn capacity(&self) -> Capacity {
        Capacity::limit_or_unlimited(self.max_students)
    }
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
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Restrict"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "SetNull"
    )]
    Teacher,
    #[sea_orm(has_many = "super::subject_enrollment::Entity")]
    SubjectEnrollments,
}

impl Related<super::semester::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::subject_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
