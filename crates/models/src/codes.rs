use serde::Serialize;
use strum::{AsRefStr, EnumIter, EnumProperty};

/// Entities that carry a generated human-readable code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, AsRefStr, EnumProperty)]
pub enum CodeKind {
    #[strum(props(prefix = "DEPT", digits = "5"))]
    Department,
    #[strum(props(prefix = "Teacher", digits = "5"))]
    Teacher,
    #[strum(props(prefix = "Student", digits = "6"))]
    Student,
    #[strum(props(prefix = "Subject", digits = "5"))]
    Subject,
    #[strum(props(prefix = "SEM", digits = "5"))]
    Semester,
    #[strum(props(prefix = "BATCH", digits = "5"))]
    Batch,
}

impl CodeKind {
    pub fn prefix(&self) -> &'static str {
        self.get_str("prefix").unwrap_or_default()
    }

    /// Number of random digits in the suffix
    pub fn digits(&self) -> usize {
        self.get_str("digits")
            .and_then(|d| d.parse().ok())
            .unwrap_or(5)
    }

    /// Size of the suffix space, i.e. how many distinct codes exist per infix
    pub fn suffix_space(&self) -> u64 {
        10u64.pow(self.digits() as u32)
    }

    /// Formats a code, e.g. `SEM-04217` or `DEPT-PHYSICS-00931`
    pub fn format(&self, infix: Option<&str>, suffix: &str) -> String {
        match infix {
            Some(infix) if !infix.is_empty() => format!("{}-{infix}-{suffix}", self.prefix()),
            _ => format!("{}-{suffix}", self.prefix()),
        }
    }
}

/// Infix used in department codes: the first 10 alphanumeric characters of the name
pub fn department_infix(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect::<String>()
        .to_uppercase()
}

/// Lowercase, dash-separated slug
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_code_format() {
        assert_eq!(CodeKind::Semester.format(None, "00042"), "SEM-00042");
        assert_eq!(CodeKind::Student.digits(), 6);
        assert_eq!(
            CodeKind::Department.format(Some("PHYSICS"), "12345"),
            "DEPT-PHYSICS-12345"
        );
    }

    #[test]
    fn test_every_kind_has_prefix() {
        for kind in CodeKind::iter() {
            assert!(!kind.prefix().is_empty(), "{kind:?}");
            assert!(kind.suffix_space() >= 100_000);
        }
    }

    #[test]
    fn test_department_infix() {
        assert_eq!(department_infix("Computer Science & AI"), "COMPUTERSC");
        assert_eq!(department_infix("--"), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fall 2024 - Default Batch-BATCH-00012"), "fall-2024-default-batch-batch-00012");
        assert_eq!(slugify("  Ada  Lovelace "), "ada-lovelace");
    }
}
