use crate::{
    entities::{batches, departments, semester_enrollments, semesters, students, subject_enrollments},
    services::{
        codes::{RandomSuffix, generate_unique_code},
        enrollment::{CascadeCounts, EnrollmentService},
        error::{ServiceError, ServiceResult},
        lookup,
        notify::{Notifier, Outbox},
    },
};
use chrono::{NaiveDate, Utc};
use log::info;
use models::{
    actor::Actor,
    capacity::Occupancy,
    codes::{CodeKind, slugify},
    status::{EnrollmentStatus, SemesterStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::Expr,
};
use serde::{Deserialize, Serialize};

/// Capacity of a batch created without an explicit limit
pub const DEFAULT_BATCH_CAPACITY: i32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct SemesterInput {
    pub name: String,
    pub department_id: i32,
    pub academic_year: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: SemesterStatus,
    pub description: Option<String>,
}

impl SemesterInput {
    fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("Semester name is required"));
        }
        if self.academic_year.trim().is_empty() {
            return Err(ServiceError::validation("Academic year is required"));
        }
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(ServiceError::validation(
                "End date cannot be before the start date",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SemesterFilter {
    pub status: Option<SemesterStatus>,
    pub department_id: Option<i32>,
    pub search: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchInput {
    pub name: String,
    pub max_students: Option<i32>,
}

impl BatchInput {
    fn validate(&self) -> ServiceResult<i32> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("Please provide a batch name"));
        }

        let max_students = self.max_students.unwrap_or(DEFAULT_BATCH_CAPACITY);
        if max_students < 1 {
            return Err(ServiceError::validation(
                "A batch must hold at least one student",
            ));
        }
        Ok(max_students)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub batch: batches::Model,
    pub occupancy: Occupancy,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchMember {
    pub student: students::Model,
    pub enrollment: semester_enrollments::Model,
}

/// Semesters and their batches
pub struct SemesterService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a dyn Notifier,
}

impl<'a> SemesterService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a dyn Notifier) -> Self {
        Self { db, notifier }
    }

    /// Creates the semester together with its default batch
    pub async fn create(
        &self,
        input: SemesterInput,
        actor: &Actor,
    ) -> ServiceResult<semesters::Model> {
        input.validate()?;
        let txn = self.db.begin().await?;

        let department = departments::Entity::find_by_id(input.department_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", input.department_id))?;

        let name = input.name.trim().to_string();
        let academic_year = input.academic_year.trim().to_string();
        Self::check_unique(&txn, None, &name, &academic_year, department.id).await?;

        let code = generate_unique_code::<semesters::Entity, _>(
            &txn,
            semesters::Column::SemesterCode,
            CodeKind::Semester,
            None,
            &mut RandomSuffix,
        )
        .await?;

        let now = Utc::now().naive_utc();
        let semester = semesters::ActiveModel {
            slug: Set(slugify(&format!("{name}-{code}"))),
            semester_code: Set(code),
            name: Set(name),
            department_id: Set(department.id),
            academic_year: Set(academic_year),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(input.status),
            description: Set(input.description),
            is_active: Set(true),
            created_by: Set(Some(actor.username.clone())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let default_batch = insert_batch(
            &txn,
            &semester,
            &format!("{} - Default Batch", semester.name),
            DEFAULT_BATCH_CAPACITY,
            true,
        )
        .await?;

        txn.commit().await?;
        info!(
            "Created semester {} ({}) with batch {}",
            semester.name, semester.semester_code, default_batch.name
        );

        let mut outbox = Outbox::new();
        outbox.push(
            &actor.username,
            format!("Created semester: {}", semester.name),
        );
        outbox.deliver(self.notifier).await;

        Ok(semester)
    }

    pub async fn update(
        &self,
        semester_id: i32,
        input: SemesterInput,
        actor: &Actor,
    ) -> ServiceResult<semesters::Model> {
        input.validate()?;
        let txn = self.db.begin().await?;

        let semester = lookup::semester(&txn, semester_id).await?;
        let department = departments::Entity::find_by_id(input.department_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", input.department_id))?;

        let name = input.name.trim().to_string();
        let academic_year = input.academic_year.trim().to_string();
        Self::check_unique(&txn, Some(semester.id), &name, &academic_year, department.id).await?;

        let slug = slugify(&format!("{name}-{}", semester.semester_code));

        let mut active: semesters::ActiveModel = semester.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.department_id = Set(department.id);
        active.academic_year = Set(academic_year.clone());
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.status = Set(input.status);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now().naive_utc());
        let semester = active.update(&txn).await?;

        // Batches carry the semester's academic year
        batches::Entity::update_many()
            .col_expr(batches::Column::AcademicYear, Expr::value(academic_year))
            .filter(batches::Column::SemesterId.eq(semester.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!("Updated semester {}", semester.name);

        let mut outbox = Outbox::new();
        outbox.push(
            &actor.username,
            format!("Updated semester: {}", semester.name),
        );
        outbox.deliver(self.notifier).await;

        Ok(semester)
    }

    pub async fn get(&self, semester_id: i32) -> ServiceResult<semesters::Model> {
        lookup::semester(self.db, semester_id).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<semesters::Model> {
        lookup::semester_by_slug(self.db, slug).await
    }

    /// Newest first
    pub async fn list(
        &self,
        filter: SemesterFilter,
    ) -> ServiceResult<(Vec<semesters::Model>, u64)> {
        let mut condition = Condition::all();

        if let Some(status) = filter.status {
            condition = condition.add(semesters::Column::Status.eq(status));
        }

        if let Some(department_id) = filter.department_id {
            condition = condition.add(semesters::Column::DepartmentId.eq(department_id));
        }

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            condition = condition.add(
                Condition::any()
                    .add(semesters::Column::Name.contains(search))
                    .add(semesters::Column::SemesterCode.contains(search))
                    .add(semesters::Column::AcademicYear.contains(search)),
            );
        }

        let query = semesters::Entity::find()
            .filter(condition)
            .order_by_desc(semesters::Column::StartDate)
            .order_by_desc(semesters::Column::Id);

        let total = query.clone().count(self.db).await?;
        let semesters = query
            .paginate(self.db, filter.per_page.max(1))
            .fetch_page(filter.page.max(1) - 1)
            .await?;

        Ok((semesters, total))
    }

    /// Deletes the semester with all batches, subjects and enrollments
    pub async fn delete(&self, semester_id: i32, actor: &Actor) -> ServiceResult<CascadeCounts> {
        EnrollmentService::new(self.db, self.notifier)
            .delete_semester_cascade(semester_id, actor)
            .await
    }

    pub async fn batches(&self, semester_id: i32) -> ServiceResult<Vec<BatchSummary>> {
        let semester = lookup::semester(self.db, semester_id).await?;
        let batches = batches::Entity::find()
            .filter(batches::Column::SemesterId.eq(semester.id))
            .order_by_desc(batches::Column::IsDefault)
            .order_by_asc(batches::Column::Name)
            .all(self.db)
            .await?;

        let mut summaries = Vec::with_capacity(batches.len());
        for batch in batches {
            let enrolled = lookup::active_in_batch(self.db, batch.id).await?;
            summaries.push(BatchSummary {
                occupancy: Occupancy::new(batch.capacity(), enrolled),
                batch,
            });
        }
        Ok(summaries)
    }

    /// Active members of a batch, by name
    pub async fn batch_students(
        &self,
        semester_id: i32,
        batch_id: i32,
    ) -> ServiceResult<Vec<BatchMember>> {
        let batch = lookup::batch_in_semester(self.db, semester_id, batch_id).await?;

        let rows = semester_enrollments::Entity::find()
            .filter(semester_enrollments::Column::BatchId.eq(batch.id))
            .filter(semester_enrollments::Column::Status.eq(EnrollmentStatus::Active))
            .find_also_related(students::Entity)
            .order_by_asc(students::Column::FirstName)
            .order_by_asc(students::Column::LastName)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, student)| {
                student.map(|student| BatchMember {
                    student,
                    enrollment,
                })
            })
            .collect())
    }

    pub async fn add_batch(
        &self,
        semester_id: i32,
        input: BatchInput,
        actor: &Actor,
    ) -> ServiceResult<batches::Model> {
        let max_students = input.validate()?;
        let txn = self.db.begin().await?;

        let semester = lookup::semester(&txn, semester_id).await?;
        let name = input.name.trim().to_string();
        Self::check_batch_name(&txn, semester.id, None, &name).await?;

        let batch = insert_batch(&txn, &semester, &name, max_students, false).await?;

        txn.commit().await?;
        info!("Added batch {} to {}", batch.name, semester.name);

        let mut outbox = Outbox::new();
        outbox.push(
            &actor.username,
            format!("Created batch {} in {}", batch.name, semester.name),
        );
        outbox.deliver(self.notifier).await;

        Ok(batch)
    }

    /// Renames or resizes a batch; it can never shrink below its active members
    pub async fn edit_batch(
        &self,
        semester_id: i32,
        batch_id: i32,
        input: BatchInput,
        actor: &Actor,
    ) -> ServiceResult<batches::Model> {
        let txn = self.db.begin().await?;

        let semester = lookup::semester(&txn, semester_id).await?;
        let batch = lookup::batch_in_semester(&txn, semester.id, batch_id).await?;
        let batch = lookup::lock_batch(&txn, batch.id).await?;

        let input = BatchInput {
            max_students: input.max_students.or(Some(batch.max_students)),
            ..input
        };
        let max_students = input.validate()?;

        let name = input.name.trim().to_string();
        Self::check_batch_name(&txn, semester.id, Some(batch.id), &name).await?;

        let enrolled = lookup::active_in_batch(&txn, batch.id).await?;
        if (max_students as u64) < enrolled {
            return Err(ServiceError::validation(format!(
                "Cannot set maximum students to {max_students}. Current enrollments: {enrolled}"
            )));
        }

        let slug = slugify(&format!("{name}-{}", batch.batch_code));

        let mut active: batches::ActiveModel = batch.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.max_students = Set(max_students);
        active.updated_at = Set(Utc::now().naive_utc());
        let batch = active.update(&txn).await?;

        txn.commit().await?;
        info!("Updated batch {} in {}", batch.name, semester.name);

        let mut outbox = Outbox::new();
        outbox.push(
            &actor.username,
            format!("Updated batch {} in {}", batch.name, semester.name),
        );
        outbox.deliver(self.notifier).await;

        Ok(batch)
    }

    /// Refused while the batch has active members or is the semester's last batch
    pub async fn delete_batch(
        &self,
        semester_id: i32,
        batch_id: i32,
        actor: &Actor,
    ) -> ServiceResult<()> {
        let txn = self.db.begin().await?;

        let semester = lookup::semester(&txn, semester_id).await?;
        let batch = lookup::batch_in_semester(&txn, semester.id, batch_id).await?;
        let batch = lookup::lock_batch(&txn, batch.id).await?;

        let enrolled = lookup::active_in_batch(&txn, batch.id).await?;
        if enrolled > 0 {
            return Err(ServiceError::validation(format!(
                "Cannot delete batch with {enrolled} enrolled students. Please remove students first."
            )));
        }

        let batch_count = batches::Entity::find()
            .filter(batches::Column::SemesterId.eq(semester.id))
            .count(&txn)
            .await?;
        if batch_count <= 1 {
            return Err(ServiceError::validation(
                "Cannot delete the last batch in a semester.",
            ));
        }

        // Past (non-active) enrollments still point at the batch
        let stale: Vec<i32> = semester_enrollments::Entity::find()
            .select_only()
            .column(semester_enrollments::Column::Id)
            .filter(semester_enrollments::Column::BatchId.eq(batch.id))
            .into_tuple()
            .all(&txn)
            .await?;
        if !stale.is_empty() {
            subject_enrollments::Entity::delete_many()
                .filter(subject_enrollments::Column::SemesterEnrollmentId.is_in(stale.clone()))
                .exec(&txn)
                .await?;
            semester_enrollments::Entity::delete_many()
                .filter(semester_enrollments::Column::Id.is_in(stale))
                .exec(&txn)
                .await?;
        }

        batches::Entity::delete_by_id(batch.id).exec(&txn).await?;

        txn.commit().await?;
        info!("Deleted batch {} from {}", batch.name, semester.name);

        let mut outbox = Outbox::new();
        outbox.push(
            &actor.username,
            format!("Deleted batch {} from {}", batch.name, semester.name),
        );
        outbox.deliver(self.notifier).await;

        Ok(())
    }

    async fn check_unique<C: ConnectionTrait>(
        conn: &C,
        exclude: Option<i32>,
        name: &str,
        academic_year: &str,
        department_id: i32,
    ) -> ServiceResult<()> {
        let mut query = semesters::Entity::find()
            .filter(semesters::Column::Name.eq(name))
            .filter(semesters::Column::AcademicYear.eq(academic_year))
            .filter(semesters::Column::DepartmentId.eq(department_id));
        if let Some(id) = exclude {
            query = query.filter(semesters::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(ServiceError::validation(format!(
                "Semester {name} already exists for {academic_year} in this department"
            )));
        }
        Ok(())
    }

    async fn check_batch_name<C: ConnectionTrait>(
        conn: &C,
        semester_id: i32,
        exclude: Option<i32>,
        name: &str,
    ) -> ServiceResult<()> {
        let mut query = batches::Entity::find()
            .filter(batches::Column::SemesterId.eq(semester_id))
            .filter(batches::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(batches::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(ServiceError::validation(format!(
                "A batch with name '{name}' already exists in this semester."
            )));
        }
        Ok(())
    }
}

async fn insert_batch<C: ConnectionTrait>(
    conn: &C,
    semester: &semesters::Model,
    name: &str,
    max_students: i32,
    is_default: bool,
) -> ServiceResult<batches::Model> {
    let code = generate_unique_code::<batches::Entity, _>(
        conn,
        batches::Column::BatchCode,
        CodeKind::Batch,
        None,
        &mut RandomSuffix,
    )
    .await?;

    let now = Utc::now().naive_utc();
    Ok(batches::ActiveModel {
        slug: Set(slugify(&format!("{name}-{code}"))),
        batch_code: Set(code),
        name: Set(name.to_string()),
        semester_id: Set(semester.id),
        academic_year: Set(semester.academic_year.clone()),
        max_students: Set(max_students),
        is_default: Set(is_default),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}
