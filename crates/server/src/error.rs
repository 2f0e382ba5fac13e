use crate::dtos::common::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::services::ServiceError;
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Administrator role required")]
    Forbidden,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Service(err) => match err {
                ServiceError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::CapacityExceeded { .. }
                | ServiceError::AlreadyEnrolled { .. }
                | ServiceError::NotEnrolled { .. } => StatusCode::CONFLICT,
                ServiceError::InvariantViolation(_)
                | ServiceError::CodeSpaceExhausted { .. }
                | ServiceError::Export(_)
                | ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Text sent to the client; storage details stay in the log
    fn public_message(&self) -> String {
        match self {
            Self::Service(ServiceError::Database(_) | ServiceError::Export(_)) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }

        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sea_orm::DbErr;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::not_found("Student", 7), StatusCode::NOT_FOUND),
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                ServiceError::CapacityExceeded {
                    target: "Batch A".to_string(),
                    max: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::NotEnrolled {
                    student: "a@school.org".to_string(),
                    target: "Algebra".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::InvariantViolation("dangling".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Database(DbErr::Custom("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = ApiError::from(ServiceError::Database(DbErr::Custom(
            "relation \"students\" does not exist".to_string(),
        )));
        assert_eq!(err.public_message(), "Internal server error");

        let err = ApiError::from(ServiceError::validation("Semester name is required"));
        assert_eq!(err.public_message(), "Semester name is required");
    }
}
