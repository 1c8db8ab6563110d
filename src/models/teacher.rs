//! Teacher model.
//!
//! A teacher is a named roster entry with the set of subjects they may be
//! assigned to. The subject list keeps insertion order for display but is
//! treated as a set: toggling adds or removes a single entry.

use serde::{Deserialize, Serialize};

/// Name of the placeholder teacher meaning "not decided yet".
///
/// Slots bound to this name never count toward double-booking.
pub const UNASSIGNED_TEACHER: &str = "未定";

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Display name, unique within the roster by convention.
    pub name: String,
    /// Subjects this teacher may be assigned to (eligibility set).
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Teacher {
    /// Creates a teacher with an empty eligibility set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subjects: Vec::new(),
        }
    }

    /// Adds an eligible subject (ignored if already present).
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        if !self.teaches(&subject) {
            self.subjects.push(subject);
        }
        self
    }

    /// Adds several eligible subjects.
    pub fn with_subjects<I, S>(self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        subjects.into_iter().fold(self, |t, s| t.with_subject(s))
    }

    /// Whether `subject` is in the eligibility set.
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// Flips membership of `subject`. Returns `true` if it is now held.
    pub fn toggle_subject(&mut self, subject: &str) -> bool {
        if self.teaches(subject) {
            self.subjects.retain(|s| s != subject);
            false
        } else {
            self.subjects.push(subject.to_string());
            true
        }
    }

    /// Whether this is the unassigned placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.name == UNASSIGNED_TEACHER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_builder() {
        let t = Teacher::new("半田").with_subjects(["数学", "理科", "数学"]);
        assert_eq!(t.name, "半田");
        assert_eq!(t.subjects, vec!["数学", "理科"]);
        assert!(t.teaches("理科"));
        assert!(!t.teaches("英語"));
        assert!(!t.is_placeholder());
    }

    #[test]
    fn test_toggle_subject() {
        let mut t = Teacher::new("堀上").with_subject("英語");
        assert!(t.toggle_subject("国語"));
        assert_eq!(t.subjects, vec!["英語", "国語"]);
        assert!(!t.toggle_subject("英語"));
        assert_eq!(t.subjects, vec!["国語"]);
    }

    #[test]
    fn test_missing_subjects_field_defaults_empty() {
        let t: Teacher = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert!(t.subjects.is_empty());
    }

    #[test]
    fn test_placeholder() {
        assert!(Teacher::new(UNASSIGNED_TEACHER).is_placeholder());
    }
}
