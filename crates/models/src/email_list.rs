use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[,;\n\r]+").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Result of splitting a free-form list of email addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailList {
    /// Well-formed addresses, lower-cased, in input order
    pub valid: Vec<String>,
    /// Entries that do not look like an email address, as typed
    pub invalid: Vec<String>,
}

/// Splits on commas, semicolons and newlines, skipping blank entries
pub fn parse_email_list(text: &str) -> EmailList {
    let mut list = EmailList::default();

    for entry in SEPARATORS.split(text.trim()) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        if EMAIL.is_match(entry) {
            list.valid.push(entry.to_lowercase());
        } else {
            list.invalid.push(entry.to_string());
        }
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mixed_separators() {
        let list = parse_email_list("a@x.edu, B@X.edu;c@x.edu\n\nd@x.edu\r\n");
        assert_eq!(list.valid, vec!["a@x.edu", "b@x.edu", "c@x.edu", "d@x.edu"]);
        assert!(list.invalid.is_empty());
    }

    #[test]
    fn test_invalid_entries_are_kept_verbatim() {
        let list = parse_email_list("good@school.org, not-an-email ,@missing.org");
        assert_eq!(list.valid, vec!["good@school.org"]);
        assert_eq!(list.invalid, vec!["not-an-email", "@missing.org"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_email_list("  \n ;, "), EmailList::default());
    }
}
