use crate::{
    entities::teachers,
    services::{
        codes::{RandomSuffix, generate_unique_code},
        error::{ServiceError, ServiceResult},
    },
};
use chrono::{NaiveDate, Utc};
use log::info;
use models::{
    codes::{CodeKind, slugify},
    status::Gender,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherInput {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub mobile: String,
    pub joining_date: NaiveDate,
    pub qualification: String,
    pub username: String,
    pub email: String,
    pub address: Option<String>,
}

impl TeacherInput {
    fn validate(&self) -> ServiceResult<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ServiceError::validation("Teacher name is required"));
        }
        if self.username.trim().is_empty() {
            return Err(ServiceError::validation("Teacher username is required"));
        }
        if !self.email.contains('@') {
            return Err(ServiceError::validation(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

pub struct TeacherService;

impl TeacherService {
    pub async fn create(
        db: &DatabaseConnection,
        input: TeacherInput,
    ) -> ServiceResult<teachers::Model> {
        input.validate()?;
        let txn = db.begin().await?;

        let email = input.email.trim().to_lowercase();
        let username = input.username.trim().to_string();
        Self::check_unique(&txn, None, &username, &email).await?;

        let code = generate_unique_code::<teachers::Entity, _>(
            &txn,
            teachers::Column::TeacherCode,
            CodeKind::Teacher,
            None,
            &mut RandomSuffix,
        )
        .await?;

        let now = Utc::now().naive_utc();
        let teacher = teachers::ActiveModel {
            slug: Set(slugify(&format!(
                "{} {}-{code}",
                input.first_name, input.last_name
            ))),
            teacher_code: Set(code),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            gender: Set(input.gender),
            date_of_birth: Set(input.date_of_birth),
            mobile: Set(input.mobile),
            joining_date: Set(input.joining_date),
            qualification: Set(input.qualification),
            username: Set(username),
            email: Set(email),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(
            "Created teacher {} ({})",
            teacher.full_name(),
            teacher.teacher_code
        );
        Ok(teacher)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> ServiceResult<teachers::Model> {
        teachers::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teacher", id))
    }

    pub async fn get_by_slug(db: &DatabaseConnection, slug: &str) -> ServiceResult<teachers::Model> {
        teachers::Entity::find()
            .filter(teachers::Column::Slug.eq(slug))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teacher", slug))
    }

    pub async fn get_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> ServiceResult<teachers::Model> {
        teachers::Entity::find()
            .filter(teachers::Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teacher", email))
    }

    /// Active teachers matching `search` on name, email or code
    pub async fn search(
        db: &DatabaseConnection,
        search: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> ServiceResult<(Vec<teachers::Model>, u64)> {
        let mut query = teachers::Entity::find().filter(teachers::Column::IsActive.eq(true));

        if let Some(search) = search.map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(
                Condition::any()
                    .add(teachers::Column::FirstName.contains(search))
                    .add(teachers::Column::LastName.contains(search))
                    .add(teachers::Column::Email.contains(search))
                    .add(teachers::Column::TeacherCode.contains(search)),
            );
        }

        let query = query
            .order_by_asc(teachers::Column::FirstName)
            .order_by_asc(teachers::Column::LastName);

        let total = query.clone().count(db).await?;
        let teachers = query
            .paginate(db, per_page.max(1))
            .fetch_page(page.max(1) - 1)
            .await?;

        Ok((teachers, total))
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: TeacherInput,
    ) -> ServiceResult<teachers::Model> {
        input.validate()?;
        let txn = db.begin().await?;

        let teacher = teachers::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teacher", id))?;

        let email = input.email.trim().to_lowercase();
        let username = input.username.trim().to_string();
        Self::check_unique(&txn, Some(teacher.id), &username, &email).await?;

        let slug = slugify(&format!(
            "{} {}-{}",
            input.first_name, input.last_name, teacher.teacher_code
        ));

        let mut active: teachers::ActiveModel = teacher.into();
        active.first_name = Set(input.first_name.trim().to_string());
        active.last_name = Set(input.last_name.trim().to_string());
        active.gender = Set(input.gender);
        active.date_of_birth = Set(input.date_of_birth);
        active.mobile = Set(input.mobile);
        active.joining_date = Set(input.joining_date);
        active.qualification = Set(input.qualification);
        active.username = Set(username);
        active.email = Set(email);
        active.address = Set(input.address);
        active.slug = Set(slug);
        active.updated_at = Set(Utc::now().naive_utc());
        let teacher = active.update(&txn).await?;

        txn.commit().await?;
        info!("Updated teacher {}", teacher.full_name());
        Ok(teacher)
    }

    /// Hides the teacher from assignment lookups without deleting history
    pub async fn deactivate(db: &DatabaseConnection, id: i32) -> ServiceResult<teachers::Model> {
        let teacher = Self::get(db, id).await?;

        let mut active: teachers::ActiveModel = teacher.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().naive_utc());
        let teacher = active.update(db).await?;

        info!("Deactivated teacher {}", teacher.full_name());
        Ok(teacher)
    }

    /// Department heads and subject assignments pointing at the teacher are cleared
    pub async fn delete(db: &DatabaseConnection, id: i32) -> ServiceResult<()> {
        let teacher = Self::get(db, id).await?;
        teachers::Entity::delete_by_id(teacher.id).exec(db).await?;

        info!("Deleted teacher {}", teacher.full_name());
        Ok(())
    }

    async fn check_unique<C: ConnectionTrait>(
        conn: &C,
        exclude: Option<i32>,
        username: &str,
        email: &str,
    ) -> ServiceResult<()> {
        let mut query = teachers::Entity::find().filter(
            Condition::any()
                .add(teachers::Column::Username.eq(username))
                .add(teachers::Column::Email.eq(email)),
        );
        if let Some(id) = exclude {
            query = query.filter(teachers::Column::Id.ne(id));
        }

        if let Some(existing) = query.one(conn).await? {
            let field = if existing.username == username {
                format!("username {username}")
            } else {
                format!("email {email}")
            };
            return Err(ServiceError::validation(format!(
                "A teacher with {field} already exists"
            )));
        }
        Ok(())
    }
}
