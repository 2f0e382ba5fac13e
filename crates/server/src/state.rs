use crate::config::AppConfig;
use database::services::{
    EnrollmentService, SemesterService, SemesterSubjectService, notify::Notifier,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn enrollments(&self) -> EnrollmentService<'_> {
        EnrollmentService::new(&self.db, self.notifier.as_ref())
    }

    pub fn semesters(&self) -> SemesterService<'_> {
        SemesterService::new(&self.db, self.notifier.as_ref())
    }

    pub fn assignments(&self) -> SemesterSubjectService<'_> {
        SemesterSubjectService::new(&self.db, self.notifier.as_ref())
    }
}
