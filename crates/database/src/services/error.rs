use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{target} has reached its capacity of {max} students")]
    CapacityExceeded { target: String, max: u64 },

    #[error("{student} is already enrolled in {target}")]
    AlreadyEnrolled { student: String, target: String },

    #[error("{student} is not enrolled in {target}")]
    NotEnrolled { student: String, target: String },

    #[error("{entity} not found: {key}")]
    EntityNotFound { entity: &'static str, key: String },

    #[error("Enrollment invariant violated: {0}")]
    InvariantViolation(String),

    #[error("{0}")]
    Validation(String),

    #[error("No unused {prefix} code found after {attempts} attempts")]
    CodeSpaceExhausted { prefix: &'static str, attempts: u32 },

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::EntityNotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::AlreadyEnrolled { .. } => "already_enrolled",
            Self::NotEnrolled { .. } => "not_enrolled",
            Self::EntityNotFound { .. } => "not_found",
            Self::InvariantViolation(_) => "invariant_violation",
            Self::Validation(_) => "validation",
            Self::CodeSpaceExhausted { .. } => "code_space_exhausted",
            Self::Export(_) => "export",
            Self::Database(_) => "database",
        }
    }
}

/// Whether the store rejected a write because of a unique index
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
