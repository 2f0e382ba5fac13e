use database::services::report::BulkReport;
use models::capacity::Occupancy;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// The authenticated caller
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub subject: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_pages = total_items.div_ceil(per_page);

        Self {
            page,
            per_page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u64,

    /// Matches names, email addresses and codes
    pub search: Option<String>,
}

pub fn default_page() -> u64 {
    1
}

pub fn default_per_page() -> u64 {
    20
}

/// How full a batch or semester subject is
#[derive(Debug, Serialize, ToSchema)]
pub struct OccupancyResponse {
    pub enrolled: u64,
    /// `null` when the capacity is unlimited
    pub max_students: Option<u64>,
    pub available_spots: Option<u64>,
    pub can_enroll: bool,
    /// Percentage, one decimal
    pub utilization: f64,
}

impl From<Occupancy> for OccupancyResponse {
    fn from(occupancy: Occupancy) -> Self {
        Self {
            enrolled: occupancy.enrolled,
            max_students: occupancy.capacity.limit(),
            available_spots: occupancy.available_spots,
            can_enroll: occupancy.can_enroll,
            utilization: occupancy.utilization,
        }
    }
}

/// Per-item outcome of a list operation
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkResponse<K> {
    /// At least one item went through
    pub success: bool,
    pub message: String,
    pub succeeded: Vec<K>,
    pub already_enrolled: Vec<K>,
    pub not_enrolled: Vec<K>,
    pub not_found: Vec<K>,
    pub capacity_exhausted: Vec<K>,
    pub invalid: Vec<K>,
    /// Items rejected for any other reason; the reason is in `warnings`
    pub failed: Vec<K>,
    pub warnings: Vec<String>,
}

impl<K: Display> BulkResponse<K> {
    /// `verb` describes what happened to the succeeded items, e.g. "Enrolled"
    pub fn new(report: BulkReport<K>, verb: &str) -> Self {
        let warnings = report.warnings();
        let message = format!("{verb} {} student(s)", report.succeeded.len());

        Self {
            success: report.is_success(),
            message,
            warnings,
            succeeded: report.succeeded,
            already_enrolled: report.already_enrolled,
            not_enrolled: report.not_enrolled,
            not_found: report.not_found,
            capacity_exhausted: report.capacity_exhausted,
            invalid: report.invalid,
            failed: report.failed.into_iter().map(|(key, _)| key).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::services::ServiceError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(2, 20, 45);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let empty = PaginationMeta::new(0, 0, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_bulk_response_from_report() {
        let mut report = BulkReport::new();
        report.succeeded.push(1);
        report.record_error(
            2,
            &ServiceError::CapacityExceeded {
                target: "Batch A".to_string(),
                max: 1,
            },
        );

        let response = BulkResponse::new(report, "Enrolled");
        assert!(response.success);
        assert_eq!(response.message, "Enrolled 1 student(s)");
        assert_eq!(response.capacity_exhausted, vec![2]);
        assert_eq!(
            response.warnings,
            vec!["Capacity reached, not processed: 2".to_string()]
        );
    }
}
