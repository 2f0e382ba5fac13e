#![allow(dead_code)]

use chrono::NaiveDate;
use database::{
    entities::{batches, departments, semester_subjects, semesters, students, subjects, teachers},
    services::{
        DepartmentService, SemesterService, SemesterSubjectService, StudentService,
        SubjectService, TeacherService, department::DepartmentInput,
        semester::{BatchInput, SemesterInput}, semester_subject::AssignmentInput,
        student::StudentInput, subject::SubjectInput, teacher::TeacherInput,
    },
};
use migration::{Migrator, MigratorTrait};
use models::{actor::Actor, status::{Gender, SemesterStatus}};
use sea_orm::{
    ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter,
};
use database::services::notify::{MemoryNotifier, Notifier};

/// Fresh in-memory database with every migration applied
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn admin() -> Actor {
    Actor::admin("registrar")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub async fn department(db: &DatabaseConnection, name: &str) -> departments::Model {
    DepartmentService::create(
        db,
        DepartmentInput {
            name: name.to_string(),
            head_teacher_id: None,
            start_date: date(2020, 1, 1),
            description: None,
        },
    )
    .await
    .expect("Failed to create department")
}

pub fn student_input(first_name: &str, email: &str) -> StudentInput {
    StudentInput {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        gender: Gender::Female,
        date_of_birth: date(2008, 5, 17),
        student_class: "10".to_string(),
        section: "A".to_string(),
        admission_number: format!("ADM-{first_name}"),
        joining_date: date(2023, 6, 1),
        mobile_number: "5550100".to_string(),
    }
}

pub async fn student(db: &DatabaseConnection, first_name: &str) -> students::Model {
    let email = format!("{}@school.org", first_name.to_lowercase());
    StudentService::create(db, student_input(first_name, &email))
        .await
        .expect("Failed to create student")
}

pub async fn teacher(db: &DatabaseConnection, username: &str) -> teachers::Model {
    TeacherService::create(
        db,
        TeacherInput {
            first_name: username.to_string(),
            last_name: "Teacher".to_string(),
            gender: Gender::Male,
            date_of_birth: date(1980, 2, 2),
            mobile: "5550199".to_string(),
            joining_date: date(2015, 8, 1),
            qualification: "MSc".to_string(),
            username: username.to_string(),
            email: format!("{username}@staff.school.org"),
            address: None,
        },
    )
    .await
    .expect("Failed to create teacher")
}

pub async fn subject(db: &DatabaseConnection, name: &str) -> subjects::Model {
    SubjectService::create(
        db,
        SubjectInput {
            name: name.to_string(),
            class_name: "10".to_string(),
            description: None,
            credits: 3,
        },
    )
    .await
    .expect("Failed to create subject")
}

pub fn semester_input(department_id: i32, name: &str) -> SemesterInput {
    SemesterInput {
        name: name.to_string(),
        department_id,
        academic_year: "2024-2025".to_string(),
        start_date: date(2024, 9, 1),
        end_date: Some(date(2025, 1, 31)),
        status: SemesterStatus::Upcoming,
        description: None,
    }
}

pub async fn semester(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    department_id: i32,
    name: &str,
) -> semesters::Model {
    SemesterService::new(db, notifier)
        .create(semester_input(department_id, name), &admin())
        .await
        .expect("Failed to create semester")
}

pub async fn default_batch(db: &DatabaseConnection, semester_id: i32) -> batches::Model {
    batches::Entity::find()
        .filter(batches::Column::SemesterId.eq(semester_id))
        .filter(batches::Column::IsDefault.eq(true))
        .one(db)
        .await
        .expect("Failed to query batches")
        .expect("Semester has no default batch")
}

pub async fn batch(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    semester_id: i32,
    name: &str,
    max_students: i32,
) -> batches::Model {
    SemesterService::new(db, notifier)
        .add_batch(
            semester_id,
            BatchInput {
                name: name.to_string(),
                max_students: Some(max_students),
            },
            &admin(),
        )
        .await
        .expect("Failed to add batch")
}

pub async fn assign(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    semester_id: i32,
    subject_id: i32,
    max_students: i32,
) -> semester_subjects::Model {
    SemesterSubjectService::new(db, notifier)
        .assign(
            semester_id,
            AssignmentInput {
                subject_id,
                teacher_email: None,
                credits: 3,
                hours_per_week: 4,
                max_students,
            },
            &admin(),
        )
        .await
        .expect("Failed to assign subject")
}

/// A department with one semester; the semester has only its default batch
pub struct Fixture {
    pub db: DatabaseConnection,
    pub notifier: MemoryNotifier,
    pub department: departments::Model,
    pub semester: semesters::Model,
    pub default_batch: batches::Model,
}

pub async fn fixture() -> Fixture {
    let db = setup().await;
    let notifier = MemoryNotifier::new();
    let department = department(&db, "Physics").await;
    let semester = semester(&db, &notifier, department.id, "Fall 2024").await;
    let default_batch = default_batch(&db, semester.id).await;

    Fixture {
        db,
        notifier,
        department,
        semester,
        default_batch,
    }
}
