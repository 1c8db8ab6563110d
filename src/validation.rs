//! Integrity checks for a configuration + assignment pair.
//!
//! The editor never rejects inconsistent records while the user works, and
//! a loaded document may contain anything. This pass reports what is
//! inconsistent without changing it. Detects:
//! - Duplicate teacher names in the roster
//! - Records naming a teacher that is not on the roster
//! - Records whose teacher is not eligible for the record's subject
//! - Records whose subject is not in the subject list
//! - Records with a teacher but no subject
//! - Detached records (persisted key matches no grid cell)
//!
//! The placeholder teacher [`UNASSIGNED_TEACHER`] passes both teacher checks
//! whatever its roster entry says.
//!
//! Only the first two record checks are used to reject or repair documents
//! at load time; see [`crate::persistence::EligibilityPolicy`].

use serde::Serialize;
use std::collections::HashSet;

use crate::eligibility::is_eligible;
use crate::models::{AssignmentRecord, AssignmentStore, Configuration, SlotKey, UNASSIGNED_TEACHER};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Slot the error refers to, if any.
    pub slot: Option<SlotKey>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Two roster entries share a name.
    DuplicateTeacher,
    /// A record names a teacher missing from the roster.
    UnknownTeacher,
    /// A record's teacher may not teach its subject.
    IneligibleTeacher,
    /// A record's subject is not in the subject list.
    UnknownSubject,
    /// A record has a teacher but no subject.
    TeacherWithoutSubject,
    /// A persisted record whose key matches no grid cell.
    DetachedSlot,
}

impl ValidationErrorKind {
    /// Whether this kind breaks the subject → teacher eligibility rule.
    pub fn is_eligibility(&self) -> bool {
        matches!(
            self,
            ValidationErrorKind::UnknownTeacher | ValidationErrorKind::IneligibleTeacher
        )
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, slot: Option<&SlotKey>, message: impl Into<String>) -> Self {
        Self {
            kind,
            slot: slot.cloned(),
            message: message.into(),
        }
    }
}

/// Validates the configuration and every stored record.
///
/// Checks:
/// 1. No duplicate teacher names
/// 2. Every record's teacher is on the roster
/// 3. Every record's teacher is eligible for its subject
/// 4. Every record's subject is in the subject list
/// 5. No record has a teacher without a subject
/// 6. No detached records
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(config: &Configuration, store: &AssignmentStore) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for t in &config.teachers {
        if !names.insert(t.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTeacher,
                None,
                format!("Duplicate teacher name: {}", t.name),
            ));
        }
    }

    for (slot, record) in store.iter() {
        errors.extend(eligibility_error(config, slot, record));

        if !record.subject.is_empty() && !config.has_subject(&record.subject) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSubject,
                Some(slot),
                format!("Slot '{slot}' uses unknown subject '{}'", record.subject),
            ));
        }

        if record.has_teacher() && record.subject.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::TeacherWithoutSubject,
                Some(slot),
                format!("Slot '{slot}' has teacher '{}' but no subject", record.teacher),
            ));
        }
    }

    for (key, _) in store.detached() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DetachedSlot,
            None,
            format!("Record '{key}' matches no date/period/class combination"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Eligibility checks for a single record (checks 2 and 3).
pub(crate) fn eligibility_error(
    config: &Configuration,
    slot: &SlotKey,
    record: &AssignmentRecord,
) -> Option<ValidationError> {
    if !record.has_teacher() || record.teacher == UNASSIGNED_TEACHER {
        return None;
    }
    match is_eligible(&config.teachers, &record.teacher, &record.subject) {
        None => Some(ValidationError::new(
            ValidationErrorKind::UnknownTeacher,
            Some(slot),
            format!("Slot '{slot}' references unknown teacher '{}'", record.teacher),
        )),
        Some(false) => Some(ValidationError::new(
            ValidationErrorKind::IneligibleTeacher,
            Some(slot),
            format!(
                "Slot '{slot}': teacher '{}' is not eligible for '{}'",
                record.teacher, record.subject
            ),
        )),
        Some(true) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Teacher;

    fn sample_config() -> Configuration {
        Configuration::empty()
            .with_dates(["d1"])
            .with_periods(["p1"])
            .with_classes(["A", "B"])
            .with_subjects(["Math", "Science"])
            .with_teacher(Teacher::new("X").with_subject("Math"))
            .with_teacher(Teacher::new(UNASSIGNED_TEACHER).with_subjects(["Math", "Science"]))
    }

    fn slot(class: &str) -> SlotKey {
        SlotKey::new("d1", "p1", class)
    }

    #[test]
    fn test_valid_schedule() {
        let store = AssignmentStore::new()
            .with_record(slot("A"), AssignmentRecord::new("Math", "X"))
            .with_record(slot("B"), AssignmentRecord::new("Science", UNASSIGNED_TEACHER));
        assert!(validate_schedule(&sample_config(), &store).is_ok());
    }

    #[test]
    fn test_empty_records_are_valid() {
        let store = AssignmentStore::new()
            .with_record(slot("A"), AssignmentRecord::default())
            .with_record(slot("B"), AssignmentRecord::new("Math", ""));
        assert!(validate_schedule(&sample_config(), &store).is_ok());
    }

    #[test]
    fn test_duplicate_teacher() {
        let config = sample_config().with_teacher(Teacher::new("X"));
        let errors = validate_schedule(&config, &AssignmentStore::new()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateTeacher));
    }

    #[test]
    fn test_ineligible_teacher() {
        let store =
            AssignmentStore::new().with_record(slot("A"), AssignmentRecord::new("Science", "X"));
        let errors = validate_schedule(&sample_config(), &store).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::IneligibleTeacher);
        assert_eq!(errors[0].slot, Some(slot("A")));
        assert!(errors[0].kind.is_eligibility());
    }

    #[test]
    fn test_placeholder_passes_for_new_subject() {
        let config = sample_config().with_subjects(["Math", "Science", "Art"]);
        let store = AssignmentStore::new()
            .with_record(slot("A"), AssignmentRecord::new("Art", UNASSIGNED_TEACHER));
        assert!(validate_schedule(&config, &store).is_ok());

        let without_placeholder = Configuration::empty().with_subjects(["Art"]);
        assert!(validate_schedule(&without_placeholder, &store).is_ok());
    }

    #[test]
    fn test_unknown_teacher() {
        let store =
            AssignmentStore::new().with_record(slot("A"), AssignmentRecord::new("Math", "Ghost"));
        let errors = validate_schedule(&sample_config(), &store).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownTeacher));
    }

    #[test]
    fn test_unknown_subject_and_missing_subject() {
        let store = AssignmentStore::new()
            .with_record(slot("A"), AssignmentRecord::new("Art", ""))
            .with_record(slot("B"), AssignmentRecord::new("", "X"));
        let errors = validate_schedule(&sample_config(), &store).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownSubject));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::TeacherWithoutSubject));
        assert!(errors.iter().all(|e| !e.kind.is_eligibility()));
    }

    #[test]
    fn test_detached_slot() {
        let mut store = AssignmentStore::new();
        store.insert_detached("d9-p1-A".into(), AssignmentRecord::new("Math", "X"));
        let errors = validate_schedule(&sample_config(), &store).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DetachedSlot);
    }

    #[test]
    fn test_multiple_errors() {
        let config = sample_config().with_teacher(Teacher::new("X"));
        let store = AssignmentStore::new()
            .with_record(slot("A"), AssignmentRecord::new("Science", "X"))
            .with_record(slot("B"), AssignmentRecord::new("Math", "Ghost"));
        let errors = validate_schedule(&config, &store).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
