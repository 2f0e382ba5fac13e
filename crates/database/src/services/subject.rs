use crate::{
    entities::{semester_subjects, subjects},
    services::{
        codes::{RandomSuffix, generate_unique_code},
        error::{ServiceError, ServiceResult},
    },
};
use chrono::Utc;
use log::info;
use models::codes::{CodeKind, slugify};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectInput {
    pub name: String,
    pub class_name: String,
    pub description: Option<String>,
    pub credits: i32,
}

impl SubjectInput {
    fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("Subject name is required"));
        }
        if self.credits < 1 {
            return Err(ServiceError::validation("Credits must be at least 1"));
        }
        Ok(())
    }
}

pub struct SubjectService;

impl SubjectService {
    pub async fn create(
        db: &DatabaseConnection,
        input: SubjectInput,
    ) -> ServiceResult<subjects::Model> {
        input.validate()?;
        let txn = db.begin().await?;

        let code = generate_unique_code::<subjects::Entity, _>(
            &txn,
            subjects::Column::SubjectCode,
            CodeKind::Subject,
            None,
            &mut RandomSuffix,
        )
        .await?;

        let now = Utc::now().naive_utc();
        let name = input.name.trim().to_string();
        let subject = subjects::ActiveModel {
            slug: Set(slugify(&format!("{name}-{code}"))),
            subject_code: Set(code),
            name: Set(name),
            class_name: Set(input.class_name),
            description: Set(input.description),
            credits: Set(input.credits),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!("Created subject {} ({})", subject.name, subject.subject_code);
        Ok(subject)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> ServiceResult<subjects::Model> {
        subjects::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject", id))
    }

    pub async fn get_by_slug(db: &DatabaseConnection, slug: &str) -> ServiceResult<subjects::Model> {
        subjects::Entity::find()
            .filter(subjects::Column::Slug.eq(slug))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject", slug))
    }

    pub async fn list(db: &DatabaseConnection) -> ServiceResult<Vec<subjects::Model>> {
        Ok(subjects::Entity::find()
            .filter(subjects::Column::IsActive.eq(true))
            .order_by_asc(subjects::Column::Name)
            .all(db)
            .await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: SubjectInput,
    ) -> ServiceResult<subjects::Model> {
        input.validate()?;
        let subject = Self::get(db, id).await?;

        let name = input.name.trim().to_string();
        let slug = slugify(&format!("{name}-{}", subject.subject_code));

        let mut active: subjects::ActiveModel = subject.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.class_name = Set(input.class_name);
        active.description = Set(input.description);
        active.credits = Set(input.credits);
        active.updated_at = Set(Utc::now().naive_utc());
        let subject = active.update(db).await?;

        info!("Updated subject {}", subject.name);
        Ok(subject)
    }

    /// Refused while any semester offers the subject
    pub async fn delete(db: &DatabaseConnection, id: i32) -> ServiceResult<()> {
        let subject = Self::get(db, id).await?;

        let assignments = semester_subjects::Entity::find()
            .filter(semester_subjects::Column::SubjectId.eq(subject.id))
            .count(db)
            .await?;
        if assignments > 0 {
            return Err(ServiceError::validation(format!(
                "Cannot delete {}: it is assigned to {assignments} semester(s)",
                subject.name
            )));
        }

        subjects::Entity::delete_by_id(subject.id).exec(db).await?;
        info!("Deleted subject {}", subject.name);
        Ok(())
    }
}
