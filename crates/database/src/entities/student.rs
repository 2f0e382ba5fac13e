use models::status::Gender;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub student_code: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub gender: Gender,
    pub date_of_birth: Date,
    pub student_class: String,
    pub section: String,
    pub admission_number: String,
    pub joining_date: Date,
    pub mobile_number: String,
    pub is_active: bool,
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::semester_enrollment::Entity")]
    SemesterEnrollments,
    #[sea_orm(has_many = "super::subject_enrollment::Entity")]
    SubjectEnrollments,
}

impl Related<super::semester_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterEnrollments.def()
    }
}

impl Related<super::subject_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
