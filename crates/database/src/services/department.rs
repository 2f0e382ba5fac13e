use crate::{
    entities::{departments, semesters, teachers},
    services::{
        codes::{RandomSuffix, generate_unique_code},
        enrollment::purge_semester,
        error::{ServiceError, ServiceResult},
    },
};
use chrono::{NaiveDate, Utc};
use log::info;
use models::codes::{CodeKind, department_infix, slugify};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentInput {
    pub name: String,
    pub head_teacher_id: Option<i32>,
    pub start_date: NaiveDate,
    pub description: Option<String>,
}

impl DepartmentInput {
    fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("Department name is required"));
        }
        Ok(())
    }
}

pub struct DepartmentService;

impl DepartmentService {
    pub async fn create(
        db: &DatabaseConnection,
        input: DepartmentInput,
    ) -> ServiceResult<departments::Model> {
        input.validate()?;
        let txn = db.begin().await?;

        Self::check_head_teacher(&txn, input.head_teacher_id).await?;

        let infix = department_infix(&input.name);
        let code = generate_unique_code::<departments::Entity, _>(
            &txn,
            departments::Column::DepartmentCode,
            CodeKind::Department,
            Some(&infix),
            &mut RandomSuffix,
        )
        .await?;

        let now = Utc::now().naive_utc();
        let name = input.name.trim().to_string();
        let department = departments::ActiveModel {
            slug: Set(slugify(&format!("{name}-{code}"))),
            department_code: Set(code),
            name: Set(name),
            head_teacher_id: Set(input.head_teacher_id),
            start_date: Set(input.start_date),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(
            "Created department {} ({})",
            department.name, department.department_code
        );
        Ok(department)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> ServiceResult<departments::Model> {
        departments::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", id))
    }

    pub async fn get_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> ServiceResult<departments::Model> {
        departments::Entity::find()
            .filter(departments::Column::Slug.eq(slug))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", slug))
    }

    pub async fn list(db: &DatabaseConnection) -> ServiceResult<Vec<departments::Model>> {
        Ok(departments::Entity::find()
            .order_by_asc(departments::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: DepartmentInput,
    ) -> ServiceResult<departments::Model> {
        input.validate()?;
        let txn = db.begin().await?;

        let department = departments::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", id))?;
        Self::check_head_teacher(&txn, input.head_teacher_id).await?;

        let name = input.name.trim().to_string();
        let slug = slugify(&format!("{name}-{}", department.department_code));

        let mut active: departments::ActiveModel = department.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.head_teacher_id = Set(input.head_teacher_id);
        active.start_date = Set(input.start_date);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now().naive_utc());
        let department = active.update(&txn).await?;

        txn.commit().await?;
        info!("Updated department {}", department.name);
        Ok(department)
    }

    /// Deletes the department after removing each of its semesters
    ///
    /// Returns how many semesters went with it.
    pub async fn delete(db: &DatabaseConnection, id: i32) -> ServiceResult<usize> {
        let txn = db.begin().await?;

        let department = departments::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", id))?;

        let semesters = semesters::Entity::find()
            .filter(semesters::Column::DepartmentId.eq(department.id))
            .all(&txn)
            .await?;
        for semester in &semesters {
            purge_semester(&txn, semester).await?;
        }

        departments::Entity::delete_by_id(department.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!(
            "Deleted department {} and {} semester(s)",
            department.name,
            semesters.len()
        );
        Ok(semesters.len())
    }

    async fn check_head_teacher<C: sea_orm::ConnectionTrait>(
        conn: &C,
        head_teacher_id: Option<i32>,
    ) -> ServiceResult<()> {
        if let Some(id) = head_teacher_id
            && teachers::Entity::find_by_id(id).one(conn).await?.is_none()
        {
            return Err(ServiceError::not_found("Teacher", id));
        }
        Ok(())
    }
}
