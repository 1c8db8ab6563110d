//! Assignment store.
//!
//! A sparse map from slot to `{subject, teacher}`. Cells without a record
//! read as empty. Records that were loaded under a persisted key matching
//! no grid cell are held aside as *detached* and written back verbatim.
//! They stay readable through any slot whose persisted key names them, and
//! the first edit through such a slot adopts the record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{Configuration, SlotKey};
use crate::error::{Result, TimetableError};

/// The subject/teacher pair bound to a slot.
///
/// Either field may be empty. Nothing here guarantees that the teacher is
/// eligible for the subject; see [`crate::validation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Subject token, or empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    /// Teacher name, or empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub teacher: String,
}

/// Which half of a record an assignment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentField {
    Subject,
    Teacher,
}

impl fmt::Display for AssignmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssignmentField::Subject => "subject",
            AssignmentField::Teacher => "teacher",
        })
    }
}

impl FromStr for AssignmentField {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "subject" => Ok(AssignmentField::Subject),
            "teacher" => Ok(AssignmentField::Teacher),
            other => Err(TimetableError::UnknownField(other.to_string())),
        }
    }
}

impl AssignmentRecord {
    /// Creates a record.
    pub fn new(subject: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            teacher: teacher.into(),
        }
    }

    /// Whether both fields are empty.
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty() && self.teacher.is_empty()
    }

    /// Whether a teacher is set.
    pub fn has_teacher(&self) -> bool {
        !self.teacher.is_empty()
    }
}

/// Slot → record map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentStore {
    records: BTreeMap<SlotKey, AssignmentRecord>,
    detached: BTreeMap<String, AssignmentRecord>,
}

impl AssignmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any previous one at `slot`.
    pub fn with_record(mut self, slot: SlotKey, record: AssignmentRecord) -> Self {
        self.records.insert(slot, record);
        self
    }

    pub(crate) fn insert(&mut self, slot: SlotKey, record: AssignmentRecord) {
        self.records.insert(slot, record);
    }

    /// Sets one field of the record at `slot`.
    ///
    /// Changing the subject clears the teacher, since the previous teacher
    /// was chosen for the old subject. Setting the teacher leaves the
    /// subject alone.
    pub fn assign(&mut self, slot: SlotKey, field: AssignmentField, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(%slot, %field, value = %value, "assign");
        self.adopt_detached(&slot);
        let record = self.records.entry(slot).or_default();
        match field {
            AssignmentField::Subject => {
                if record.subject != value {
                    record.teacher.clear();
                }
                record.subject = value;
            }
            AssignmentField::Teacher => record.teacher = value,
        }
    }

    /// The record at `slot`, or an empty record.
    pub fn get(&self, slot: &SlotKey) -> AssignmentRecord {
        self.record(slot).cloned().unwrap_or_default()
    }

    /// Borrowing lookup; `None` when nothing is stored.
    ///
    /// Falls back to a detached record held under the slot's persisted key.
    pub fn record(&self, slot: &SlotKey) -> Option<&AssignmentRecord> {
        self.records
            .get(slot)
            .or_else(|| self.detached.get(&slot.legacy_key()))
    }

    /// Removes the record at `slot`, detached or not.
    pub fn clear(&mut self, slot: &SlotKey) -> Option<AssignmentRecord> {
        self.records
            .remove(slot)
            .or_else(|| self.detached.remove(&slot.legacy_key()))
    }

    /// Number of stored records, detached ones included.
    pub fn len(&self) -> usize {
        self.records.len() + self.detached.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.detached.is_empty()
    }

    /// Iterates records keyed by slot, in slot order. Detached records are
    /// listed by [`detached`](Self::detached).
    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &AssignmentRecord)> {
        self.records.iter()
    }

    /// Mutable iteration, used by load-time repair.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&SlotKey, &mut AssignmentRecord)> {
        self.records.iter_mut()
    }

    /// Records held under persisted keys that match no grid cell.
    pub fn detached(&self) -> impl Iterator<Item = (&str, &AssignmentRecord)> {
        self.detached.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Number of detached records.
    pub fn detached_len(&self) -> usize {
        self.detached.len()
    }

    pub(crate) fn insert_detached(&mut self, key: String, record: AssignmentRecord) {
        self.detached.insert(key, record);
    }

    /// A record already keyed by `slot` wins over the detached one.
    fn adopt_detached(&mut self, slot: &SlotKey) {
        if self.detached.is_empty() {
            return;
        }
        if let Some(record) = self.detached.remove(&slot.legacy_key()) {
            self.records.entry(slot.clone()).or_insert(record);
        }
    }

    /// Moves detached records whose key now names a grid cell back into the store.
    ///
    /// An existing record at that cell wins over the detached one.
    /// Returns how many records were reattached.
    pub fn reattach(&mut self, config: &Configuration) -> usize {
        if self.detached.is_empty() {
            return 0;
        }
        let mut moved = 0;
        for slot in config.slots() {
            let key = slot.legacy_key();
            if let Some(record) = self.detached.remove(&key) {
                self.records.entry(slot).or_insert(record);
                moved += 1;
            }
        }
        if moved > 0 {
            tracing::info!(moved, remaining = self.detached.len(), "reattached records");
        }
        moved
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> SlotKey {
        SlotKey::new("12/25(木)", "1限 (13:00~)", "Sクラス")
    }

    #[test]
    fn test_get_missing_is_empty() {
        let store = AssignmentStore::new();
        let r = store.get(&slot());
        assert!(r.is_empty());
        assert!(store.record(&slot()).is_none());
    }

    #[test]
    fn test_subject_change_clears_teacher() {
        let mut store = AssignmentStore::new();
        store.assign(slot(), AssignmentField::Subject, "数学");
        store.assign(slot(), AssignmentField::Teacher, "片岡");
        assert_eq!(store.get(&slot()), AssignmentRecord::new("数学", "片岡"));

        store.assign(slot(), AssignmentField::Subject, "英語");
        assert_eq!(store.get(&slot()), AssignmentRecord::new("英語", ""));
    }

    #[test]
    fn test_same_subject_keeps_teacher() {
        let mut store = AssignmentStore::new();
        store.assign(slot(), AssignmentField::Subject, "数学");
        store.assign(slot(), AssignmentField::Teacher, "片岡");
        store.assign(slot(), AssignmentField::Subject, "数学");
        assert_eq!(store.get(&slot()).teacher, "片岡");
    }

    #[test]
    fn test_teacher_never_touches_subject() {
        let mut store = AssignmentStore::new();
        store.assign(slot(), AssignmentField::Subject, "理科");
        store.assign(slot(), AssignmentField::Teacher, "半田");
        store.assign(slot(), AssignmentField::Teacher, "");
        assert_eq!(store.get(&slot()), AssignmentRecord::new("理科", ""));
    }

    #[test]
    fn test_teacher_without_subject() {
        let mut store = AssignmentStore::new();
        store.assign(slot(), AssignmentField::Teacher, "井上");
        assert_eq!(store.get(&slot()), AssignmentRecord::new("", "井上"));
    }

    #[test]
    fn test_clear() {
        let mut store = AssignmentStore::new().with_record(slot(), AssignmentRecord::new("国語", "松川"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.clear(&slot()).unwrap().teacher, "松川");
        assert!(store.is_empty());
    }

    #[test]
    fn test_reattach() {
        let mut store = AssignmentStore::new();
        store.insert_detached("d9-p1-A".into(), AssignmentRecord::new("数学", "片岡"));
        let config = Configuration::empty()
            .with_dates(["d1"])
            .with_periods(["p1"])
            .with_classes(["A"]);
        assert_eq!(store.reattach(&config), 0);
        assert_eq!(store.detached_len(), 1);

        let config = config.with_dates(["d1", "d9"]);
        assert_eq!(store.reattach(&config), 1);
        assert_eq!(store.detached_len(), 0);
        assert_eq!(store.get(&SlotKey::new("d9", "p1", "A")).teacher, "片岡");
    }

    fn detached_store() -> AssignmentStore {
        let mut store = AssignmentStore::new();
        store.insert_detached("d1-p1-c1".into(), AssignmentRecord::new("Math", "X"));
        store
    }

    #[test]
    fn test_detached_record_is_readable() {
        let store = detached_store();
        let slot = SlotKey::new("d1", "p1", "c1");
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.get(&slot), AssignmentRecord::new("Math", "X"));
        assert!(store.record(&SlotKey::new("d1", "p1", "c2")).is_none());
    }

    #[test]
    fn test_assign_adopts_detached_record() {
        let mut store = detached_store();
        let slot = SlotKey::new("d1", "p1", "c1");
        store.assign(slot.clone(), AssignmentField::Teacher, "Y");
        assert_eq!(store.get(&slot), AssignmentRecord::new("Math", "Y"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.detached_len(), 0);
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_clear_removes_detached_record() {
        let mut store = detached_store();
        let slot = SlotKey::new("d1", "p1", "c1");
        assert_eq!(store.clear(&slot), Some(AssignmentRecord::new("Math", "X")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_tolerates_missing_and_null_fields() {
        let r: AssignmentRecord = serde_json::from_str(r#"{"teacher":"X"}"#).unwrap();
        assert_eq!(r, AssignmentRecord::new("", "X"));
        let r: AssignmentRecord = serde_json::from_str(r#"{"subject":null}"#).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("teacher".parse::<AssignmentField>().unwrap(), AssignmentField::Teacher);
        assert!("room".parse::<AssignmentField>().is_err());
    }
}
