use models::capacity::Capacity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub batch_code: String,
    pub name: String,
    pub semester_id: i32,
    pub academic_year: String,
    pub max_students: i32,
    pub is_default: bool,
    pub is_active: bool,
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// A batch's `max_students` is always a hard limit
    pub fn capacity(&self) -> Capacity {
        Capacity::bounded(self.max_students)
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
    #[sea_orm(has_many = "super::semester_enrollment::Entity")]
    SemesterEnrollments,
}

impl Related<super::semester::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl Related<super::semester_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
