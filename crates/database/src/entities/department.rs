use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub department_code: String,
    pub name: String,
    pub head_teacher_id: Option<i32>,
    pub start_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::HeadTeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "SetNull"
    )]
    HeadTeacher,
    #[sea_orm(has_many = "super::semester::Entity")]
    Semesters,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HeadTeacher.def()
    }
}

impl Related<super::semester::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semesters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
