use crate::services::error::ServiceError;
use serde::Serialize;
use std::fmt::Display;

/// Per-item outcome of an operation over a list of students
///
/// Items are grouped by what happened to them, in input order. Only storage
/// failures abort the whole operation; everything else ends up here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkReport<K> {
    pub succeeded: Vec<K>,
    pub already_enrolled: Vec<K>,
    pub not_enrolled: Vec<K>,
    pub not_found: Vec<K>,
    pub capacity_exhausted: Vec<K>,
    pub invalid: Vec<K>,
    pub failed: Vec<(K, String)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkCounts {
    pub succeeded: usize,
    pub already_enrolled: usize,
    pub not_enrolled: usize,
    pub not_found: usize,
    pub capacity_exhausted: usize,
    pub invalid: usize,
    pub failed: usize,
}

impl<K> Default for BulkReport<K> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            already_enrolled: Vec::new(),
            not_enrolled: Vec::new(),
            not_found: Vec::new(),
            capacity_exhausted: Vec::new(),
            invalid: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<K> BulkReport<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `key` under the category matching `err`
    pub fn record_error(&mut self, key: K, err: &ServiceError) {
        match err {
            ServiceError::CapacityExceeded { .. } => self.capacity_exhausted.push(key),
            ServiceError::AlreadyEnrolled { .. } => self.already_enrolled.push(key),
            ServiceError::NotEnrolled { .. } => self.not_enrolled.push(key),
            ServiceError::EntityNotFound { .. } => self.not_found.push(key),
            other => self.failed.push((key, other.to_string())),
        }
    }

    pub fn counts(&self) -> BulkCounts {
        BulkCounts {
            succeeded: self.succeeded.len(),
            already_enrolled: self.already_enrolled.len(),
            not_enrolled: self.not_enrolled.len(),
            not_found: self.not_found.len(),
            capacity_exhausted: self.capacity_exhausted.len(),
            invalid: self.invalid.len(),
            failed: self.failed.len(),
        }
    }

    /// A run succeeds when at least one item went through
    pub fn is_success(&self) -> bool {
        !self.succeeded.is_empty()
    }

    /// Total number of items seen
    pub fn total(&self) -> usize {
        let c = self.counts();
        c.succeeded
            + c.already_enrolled
            + c.not_enrolled
            + c.not_found
            + c.capacity_exhausted
            + c.invalid
            + c.failed
    }
}

impl<K: Display> BulkReport<K> {
    /// One human-readable line per non-empty failure category
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.capacity_exhausted.is_empty() {
            warnings.push(format!(
                "Capacity reached, not processed: {}",
                join(&self.capacity_exhausted)
            ));
        }
        if !self.already_enrolled.is_empty() {
            warnings.push(format!(
                "Already enrolled: {}",
                join(&self.already_enrolled)
            ));
        }
        if !self.not_enrolled.is_empty() {
            warnings.push(format!("Not enrolled: {}", join(&self.not_enrolled)));
        }
        if !self.not_found.is_empty() {
            warnings.push(format!("Students not found: {}", join(&self.not_found)));
        }
        if !self.invalid.is_empty() {
            warnings.push(format!("Invalid entries: {}", join(&self.invalid)));
        }
        for (key, reason) in &self.failed {
            warnings.push(format!("Error processing {key}: {reason}"));
        }

        warnings
    }
}

fn join<K: Display>(keys: &[K]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_errors_are_categorised() {
        let mut report = BulkReport::new();
        report.succeeded.push(1);
        report.record_error(
            2,
            &ServiceError::CapacityExceeded {
                target: "A".into(),
                max: 1,
            },
        );
        report.record_error(3, &ServiceError::not_found("Student", 3));
        report.record_error(4, &ServiceError::validation("nope"));

        assert_eq!(
            report.counts(),
            BulkCounts {
                succeeded: 1,
                capacity_exhausted: 1,
                not_found: 1,
                failed: 1,
                ..Default::default()
            }
        );
        assert_eq!(report.total(), 4);
        assert!(report.is_success());
    }

    #[test]
    fn test_warnings() {
        let mut report: BulkReport<String> = BulkReport::new();
        report.not_found.push("x@school.org".into());
        report.not_found.push("y@school.org".into());
        report.invalid.push("bogus".into());

        assert!(!report.is_success());
        assert_eq!(
            report.warnings(),
            vec![
                "Students not found: x@school.org, y@school.org",
                "Invalid entries: bogus",
            ]
        );
    }
}
