use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// How many active enrollments a batch or semester subject may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Bounded(u64),
    Unlimited,
}

impl Capacity {
    /// Batch capacity: `max_students` is always a hard limit
    pub fn bounded(max_students: i32) -> Self {
        Self::Bounded(u64::try_from(max_students).unwrap_or(0))
    }

    /// Semester subject capacity: 0 means no limit
    pub fn limit_or_unlimited(max_students: i32) -> Self {
        match max_students {
            m if m <= 0 => Self::Unlimited,
            m => Self::Bounded(m as u64),
        }
    }

    pub fn limit(self) -> Option<u64> {
        match self {
            Self::Bounded(max) => Some(max),
            Self::Unlimited => None,
        }
    }

    pub fn can_enroll(self, active: u64) -> bool {
        match self {
            Self::Bounded(max) => active < max,
            Self::Unlimited => true,
        }
    }

    /// Remaining places, `None` when unlimited
    pub fn available_spots(self, active: u64) -> Option<u64> {
        self.limit().map(|max| max.saturating_sub(active))
    }

    /// Percentage of places taken, rounded to one decimal
    pub fn utilization(self, active: u64) -> f64 {
        match self {
            Self::Bounded(max) if max > 0 => {
                ((active as f64 / max as f64) * 1000.0).round() / 10.0
            }
            _ => 0.0,
        }
    }
}

/// Snapshot of how full a batch or semester subject is
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Occupancy {
    pub enrolled: u64,
    pub capacity: Capacity,
    pub available_spots: Option<u64>,
    pub can_enroll: bool,
    pub utilization: f64,
}

impl Occupancy {
    pub fn new(capacity: Capacity, enrolled: u64) -> Self {
        Self {
            enrolled,
            capacity,
            available_spots: capacity.available_spots(enrolled),
            can_enroll: capacity.can_enroll(enrolled),
            utilization: capacity.utilization(enrolled),
        }
    }
}

impl Display for Capacity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Bounded(max) => write!(f, "{max}"),
            Self::Unlimited => write!(f, "Unlimited"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_capacity() {
        let cap = Capacity::bounded(2);
        assert!(cap.can_enroll(0));
        assert!(cap.can_enroll(1));
        assert!(!cap.can_enroll(2));
        assert_eq!(cap.available_spots(1), Some(1));
        assert_eq!(cap.available_spots(5), Some(0));
    }

    #[test]
    fn test_zero_batch_capacity_admits_nobody() {
        let cap = Capacity::bounded(0);
        assert!(!cap.can_enroll(0));
        assert_eq!(cap.utilization(0), 0.0);
    }

    #[test]
    fn test_subject_zero_means_unlimited() {
        let cap = Capacity::limit_or_unlimited(0);
        assert_eq!(cap, Capacity::Unlimited);
        assert!(cap.can_enroll(10_000));
        assert_eq!(cap.available_spots(10_000), None);
        assert_eq!(cap.to_string(), "Unlimited");
    }

    #[test]
    fn test_occupancy_snapshot() {
        let occupancy = Occupancy::new(Capacity::bounded(4), 3);
        assert_eq!(occupancy.available_spots, Some(1));
        assert!(occupancy.can_enroll);
        assert_eq!(occupancy.utilization, 75.0);

        let full = Occupancy::new(Capacity::bounded(4), 4);
        assert!(!full.can_enroll);
    }

    #[test]
    fn test_utilization_rounding() {
        assert_eq!(Capacity::bounded(3).utilization(1), 33.3);
        assert_eq!(Capacity::bounded(50).utilization(50), 100.0);
    }
}
