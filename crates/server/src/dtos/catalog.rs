use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::{departments, students, subjects, teachers},
    services::{
        department::DepartmentInput, student::StudentInput, subject::SubjectInput,
        teacher::TeacherInput,
    },
};
use models::status::Gender;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common::{PaginationMeta, default_page, default_per_page};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DepartmentRequest {
    pub name: String,
    pub head_teacher_id: Option<i32>,
    pub start_date: NaiveDate,
    pub description: Option<String>,
}

impl From<DepartmentRequest> for DepartmentInput {
    fn from(req: DepartmentRequest) -> Self {
        Self {
            name: req.name,
            head_teacher_id: req.head_teacher_id,
            start_date: req.start_date,
            description: req.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: i32,
    pub department_code: String,
    pub name: String,
    pub slug: String,
    pub head_teacher_id: Option<i32>,
    pub start_date: NaiveDate,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<departments::Model> for DepartmentResponse {
    fn from(m: departments::Model) -> Self {
        Self {
            id: m.id,
            department_code: m.department_code,
            name: m.name,
            slug: m.slug,
            head_teacher_id: m.head_teacher_id,
            start_date: m.start_date,
            description: m.description,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TeacherRequest {
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, example = "Female")]
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub mobile: String,
    pub joining_date: NaiveDate,
    pub qualification: String,
    pub username: String,
    pub email: String,
    pub address: Option<String>,
}

impl From<TeacherRequest> for TeacherInput {
    fn from(req: TeacherRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            gender: req.gender,
            date_of_birth: req.date_of_birth,
            mobile: req.mobile,
            joining_date: req.joining_date,
            qualification: req.qualification,
            username: req.username,
            email: req.email,
            address: req.address,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherResponse {
    pub id: i32,
    pub teacher_code: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[schema(value_type = String)]
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub mobile: String,
    pub joining_date: NaiveDate,
    pub qualification: String,
    pub username: String,
    pub email: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub slug: String,
}

impl From<teachers::Model> for TeacherResponse {
    fn from(m: teachers::Model) -> Self {
        Self {
            full_name: m.full_name(),
            id: m.id,
            teacher_code: m.teacher_code,
            first_name: m.first_name,
            last_name: m.last_name,
            gender: m.gender,
            date_of_birth: m.date_of_birth,
            mobile: m.mobile,
            joining_date: m.joining_date,
            qualification: m.qualification,
            username: m.username,
            email: m.email,
            address: m.address,
            is_active: m.is_active,
            slug: m.slug,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub teachers: Vec<TeacherResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(value_type = String, example = "Male")]
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub student_class: String,
    pub section: String,
    pub admission_number: String,
    pub joining_date: NaiveDate,
    pub mobile_number: String,
}

impl From<StudentRequest> for StudentInput {
    fn from(req: StudentRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            gender: req.gender,
            date_of_birth: req.date_of_birth,
            student_class: req.student_class,
            section: req.section,
            admission_number: req.admission_number,
            joining_date: req.joining_date,
            mobile_number: req.mobile_number,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub student_code: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub student_class: String,
    pub section: String,
    pub admission_number: String,
    pub joining_date: NaiveDate,
    pub mobile_number: String,
    pub is_active: bool,
    pub slug: String,
}

impl From<students::Model> for StudentResponse {
    fn from(m: students::Model) -> Self {
        Self {
            full_name: m.full_name(),
            id: m.id,
            student_code: m.student_code,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            gender: m.gender,
            date_of_birth: m.date_of_birth,
            student_class: m.student_class,
            section: m.section,
            admission_number: m.admission_number,
            joining_date: m.joining_date,
            mobile_number: m.mobile_number,
            is_active: m.is_active,
            slug: m.slug,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u64,

    pub search: Option<String>,

    /// Leave out students actively enrolled in this semester
    pub exclude_semester_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub students: Vec<StudentResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubjectRequest {
    pub name: String,
    pub class_name: String,
    pub description: Option<String>,
    pub credits: i32,
}

impl From<SubjectRequest> for SubjectInput {
    fn from(req: SubjectRequest) -> Self {
        Self {
            name: req.name,
            class_name: req.class_name,
            description: req.description,
            credits: req.credits,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub id: i32,
    pub subject_code: String,
    pub name: String,
    pub class_name: String,
    pub description: Option<String>,
    pub credits: i32,
    pub is_active: bool,
    pub slug: String,
}

impl From<subjects::Model> for SubjectResponse {
    fn from(m: subjects::Model) -> Self {
        Self {
            id: m.id,
            subject_code: m.subject_code,
            name: m.name,
            class_name: m.class_name,
            description: m.description,
            credits: m.credits,
            is_active: m.is_active,
            slug: m.slug,
        }
    }
}
