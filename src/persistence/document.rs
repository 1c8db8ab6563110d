//! Persisted document shapes.
//!
//! | Generation | Top level | `config.teachers` |
//! |------------|-----------|-------------------|
//! | 0 (bare) | slot-key → record map | none |
//! | 2 | `{version, config, schedule}` | `[string]` |
//! | 3 (current) | `{version, config, schedule}` | `[{name, subjects}]` |
//!
//! Slot keys are `"date-period-class"` in every generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{AssignmentRecord, Configuration, Teacher};

/// Version written by [`serialize`](super::serialize).
pub const CURRENT_VERSION: u32 = 3;

/// Persisted schedule: slot key → record.
pub type RawSchedule = BTreeMap<String, AssignmentRecord>;

/// A current-generation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    pub config: Configuration,
    pub schedule: RawSchedule,
}

/// Which document shape a load recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    /// A bare slot-key → record map with no configuration.
    Bare,
    /// Embedded configuration with a roster of plain names.
    ConfigV2,
    /// Embedded configuration with per-teacher eligibility.
    ConfigV3,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Generation::Bare => "generation 0 (bare schedule)",
            Generation::ConfigV2 => "generation 2 (name roster)",
            Generation::ConfigV3 => "generation 3",
        })
    }
}

/// Generation-2 configuration: teachers are bare names.
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigV2 {
    pub dates: Vec<String>,
    pub periods: Vec<String>,
    pub classes: Vec<String>,
    pub subjects: Vec<String>,
    pub teachers: Vec<String>,
}

impl ConfigV2 {
    /// Lifts the name roster into teachers with empty eligibility sets.
    pub fn into_configuration(self) -> Configuration {
        Configuration {
            dates: self.dates,
            periods: self.periods,
            classes: self.classes,
            subjects: self.subjects,
            teachers: self.teachers.into_iter().map(Teacher::new).collect(),
        }
    }
}

/// A record as it must appear in a bare schedule: only `subject` and
/// `teacher` keys, both optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BareRecord {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    teacher: Option<String>,
}

impl From<BareRecord> for AssignmentRecord {
    fn from(r: BareRecord) -> Self {
        AssignmentRecord::new(r.subject.unwrap_or_default(), r.teacher.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_field_names() {
        let doc = Document {
            version: CURRENT_VERSION,
            config: Configuration::empty().with_teacher(Teacher::new("X").with_subject("Math")),
            schedule: RawSchedule::new(),
        };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["version"], 3);
        assert_eq!(v["config"]["teachers"][0], json!({"name": "X", "subjects": ["Math"]}));
        assert!(v["config"]["dates"].is_array());
        assert!(v["schedule"].is_object());
    }

    #[test]
    fn test_config_v2_lift() {
        let v2: ConfigV2 = serde_json::from_value(json!({
            "dates": ["d1"], "periods": ["p1"], "classes": ["A"],
            "subjects": ["Math"], "teachers": ["X", "Y"]
        }))
        .unwrap();
        let c = v2.into_configuration();
        assert_eq!(c.teachers, vec![Teacher::new("X"), Teacher::new("Y")]);
        assert_eq!(c.subjects, vec!["Math"]);
    }

    #[test]
    fn test_bare_record_rejects_foreign_keys() {
        assert!(serde_json::from_value::<BareRecord>(json!({"dates": []})).is_err());
        let r: AssignmentRecord = serde_json::from_value::<BareRecord>(json!({"teacher": "X"}))
            .unwrap()
            .into();
        assert_eq!(r, AssignmentRecord::new("", "X"));
    }
}
