use crate::{
    entities::{semester_enrollments, semesters, students, subject_enrollments},
    services::{
        codes::{RandomSuffix, generate_unique_code},
        enrollment::withdraw_from_semester,
        error::{ServiceError, ServiceResult},
        notify::{Notifier, Outbox},
    },
};
use chrono::{NaiveDate, Utc};
use log::info;
use models::{
    actor::Actor,
    codes::{CodeKind, slugify},
    email_list::parse_email_list,
    status::{EnrollmentStatus, Gender},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StudentInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub student_class: String,
    pub section: String,
    pub admission_number: String,
    pub joining_date: NaiveDate,
    pub mobile_number: String,
}

impl StudentInput {
    /// Normalised email, or a validation error
    fn validate(&self) -> ServiceResult<String> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ServiceError::validation("Student name is required"));
        }

        let list = parse_email_list(&self.email);
        match list.valid.as_slice() {
            [email] if list.invalid.is_empty() => Ok(email.clone()),
            _ => Err(ServiceError::validation(format!(
                "Invalid email address: {}",
                self.email
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentSearch {
    pub query: Option<String>,
    /// Leave out students actively enrolled in this semester
    pub exclude_semester_id: Option<i32>,
    pub page: u64,
    pub per_page: u64,
}

pub struct StudentService;

impl StudentService {
    pub async fn create(
        db: &DatabaseConnection,
        input: StudentInput,
    ) -> ServiceResult<students::Model> {
        let email = input.validate()?;
        let txn = db.begin().await?;

        Self::check_unique_email(&txn, None, &email).await?;

        let code = generate_unique_code::<students::Entity, _>(
            &txn,
            students::Column::StudentCode,
            CodeKind::Student,
            None,
            &mut RandomSuffix,
        )
        .await?;

        let now = Utc::now().naive_utc();
        let student = students::ActiveModel {
            slug: Set(slugify(&format!(
                "{} {}-{code}",
                input.first_name, input.last_name
            ))),
            student_code: Set(code),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            email: Set(email),
            gender: Set(input.gender),
            date_of_birth: Set(input.date_of_birth),
            student_class: Set(input.student_class),
            section: Set(input.section),
            admission_number: Set(input.admission_number),
            joining_date: Set(input.joining_date),
            mobile_number: Set(input.mobile_number),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(
            "Created student {} ({})",
            student.full_name(),
            student.student_code
        );
        Ok(student)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> ServiceResult<students::Model> {
        students::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", id))
    }

    pub async fn get_by_slug(db: &DatabaseConnection, slug: &str) -> ServiceResult<students::Model> {
        students::Entity::find()
            .filter(students::Column::Slug.eq(slug))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", slug))
    }

    pub async fn get_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> ServiceResult<students::Model> {
        students::Entity::find()
            .filter(students::Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", email))
    }

    /// Active students matching the query on name, email or code
    pub async fn search(
        db: &DatabaseConnection,
        search: StudentSearch,
    ) -> ServiceResult<(Vec<students::Model>, u64)> {
        let mut query = students::Entity::find().filter(students::Column::IsActive.eq(true));

        if let Some(text) = search.query.as_deref().map(str::trim)
            && !text.is_empty()
        {
            query = query.filter(
                Condition::any()
                    .add(students::Column::FirstName.contains(text))
                    .add(students::Column::LastName.contains(text))
                    .add(students::Column::Email.contains(text))
                    .add(students::Column::StudentCode.contains(text)),
            );
        }

        if let Some(semester_id) = search.exclude_semester_id {
            let enrolled: Vec<i32> = semester_enrollments::Entity::find()
                .select_only()
                .column(semester_enrollments::Column::StudentId)
                .filter(semester_enrollments::Column::SemesterId.eq(semester_id))
                .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
                .into_tuple()
                .all(db)
                .await?;

            if !enrolled.is_empty() {
                query = query.filter(students::Column::Id.is_not_in(enrolled));
            }
        }

        let query = query
            .order_by_asc(students::Column::FirstName)
            .order_by_asc(students::Column::LastName);

        let total = query.clone().count(db).await?;
        let students = query
            .paginate(db, search.per_page.max(1))
            .fetch_page(search.page.max(1) - 1)
            .await?;

        Ok((students, total))
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: StudentInput,
    ) -> ServiceResult<students::Model> {
        let email = input.validate()?;
        let txn = db.begin().await?;

        let student = students::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", id))?;
        Self::check_unique_email(&txn, Some(student.id), &email).await?;

        let slug = slugify(&format!(
            "{} {}-{}",
            input.first_name, input.last_name, student.student_code
        ));

        let mut active: students::ActiveModel = student.into();
        active.first_name = Set(input.first_name.trim().to_string());
        active.last_name = Set(input.last_name.trim().to_string());
        active.email = Set(email);
        active.gender = Set(input.gender);
        active.date_of_birth = Set(input.date_of_birth);
        active.student_class = Set(input.student_class);
        active.section = Set(input.section);
        active.admission_number = Set(input.admission_number);
        active.joining_date = Set(input.joining_date);
        active.mobile_number = Set(input.mobile_number);
        active.slug = Set(slug);
        active.updated_at = Set(Utc::now().naive_utc());
        let student = active.update(&txn).await?;

        txn.commit().await?;
        info!("Updated student {}", student.full_name());
        Ok(student)
    }

    /// Inactive students can no longer be found by enrollment operations
    pub async fn deactivate(db: &DatabaseConnection, id: i32) -> ServiceResult<students::Model> {
        let student = Self::get(db, id).await?;

        let mut active: students::ActiveModel = student.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().naive_utc());
        let student = active.update(db).await?;

        info!("Deactivated student {}", student.full_name());
        Ok(student)
    }

    /// Removes the student from every semester, then deletes the record
    pub async fn delete(
        db: &DatabaseConnection,
        notifier: &dyn Notifier,
        id: i32,
        actor: &Actor,
    ) -> ServiceResult<()> {
        let txn = db.begin().await?;
        let mut outbox = Outbox::new();

        let student = students::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", id))?;

        let active_semesters = semesters::Entity::find()
            .inner_join(semester_enrollments::Entity)
            .filter(semester_enrollments::Column::StudentId.eq(student.id))
            .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .all(&txn)
            .await?;
        for semester in &active_semesters {
            withdraw_from_semester(&txn, &mut outbox, semester, None, &student).await?;
        }

        // Inactive, dropped and completed records still reference the student
        subject_enrollments::Entity::delete_many()
            .filter(subject_enrollments::Column::StudentId.eq(student.id))
            .exec(&txn)
            .await?;
        semester_enrollments::Entity::delete_many()
            .filter(semester_enrollments::Column::StudentId.eq(student.id))
            .exec(&txn)
            .await?;
        students::Entity::delete_by_id(student.id).exec(&txn).await?;

        outbox.push(
            &actor.username,
            format!("Deleted student: {}", student.full_name()),
        );

        txn.commit().await?;
        outbox.deliver(notifier).await;

        info!(
            "Deleted student {} (left {} semester(s))",
            student.full_name(),
            active_semesters.len()
        );
        Ok(())
    }

    async fn check_unique_email<C: ConnectionTrait>(
        conn: &C,
        exclude: Option<i32>,
        email: &str,
    ) -> ServiceResult<()> {
        let mut query = students::Entity::find().filter(students::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(students::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(ServiceError::validation(format!(
                "A student with email {email} already exists"
            )));
        }
        Ok(())
    }
}
