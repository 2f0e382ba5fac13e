use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Lifecycle of a semester or subject enrollment
///
/// Only [`EnrollmentStatus::Active`] counts toward capacity. Leaving `Active`
/// is terminal: no transition leads back to it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Inactive,
    Dropped,
    Completed,
}

impl EnrollmentStatus {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    /// Whether a record in `self` may be moved to `next`
    pub fn can_transition_to(self, next: Self) -> bool {
        self == Self::Active && next != Self::Active
    }
}

/// Status of an academic semester
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SemesterStatus {
    #[default]
    Upcoming,
    Running,
    Completed,
    Cancelled,
}

impl SemesterStatus {
    pub fn all() -> Vec<SemesterStatus> {
        SemesterStatus::iter().collect()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Gender {
    Male,
    Female,
    Others,
}

#[cfg(feature = "database")]
crate::column_value::string_column!(EnrollmentStatus);
#[cfg(feature = "database")]
crate::column_value::string_column!(SemesterStatus);
#[cfg(feature = "database")]
crate::column_value::string_column!(Gender);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_enrollment_status_strings() {
        assert_eq!(EnrollmentStatus::Active.to_string(), "active");
        assert_eq!(
            EnrollmentStatus::from_str("dropped").unwrap(),
            EnrollmentStatus::Dropped
        );
        assert!(EnrollmentStatus::from_str("pending").is_err());
    }

    #[test]
    fn test_only_active_can_transition() {
        use EnrollmentStatus::*;

        assert!(Active.can_transition_to(Inactive));
        assert!(Active.can_transition_to(Dropped));
        assert!(Active.can_transition_to(Completed));
        assert!(!Active.can_transition_to(Active));

        for from in [Inactive, Dropped, Completed] {
            for to in EnrollmentStatus::iter() {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_semester_status_serde() {
        let json = serde_json::to_string(&SemesterStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
        assert_eq!(SemesterStatus::all().len(), 4);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::from_str("Others").unwrap(), Gender::Others);
    }
}
