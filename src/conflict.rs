//! Teacher double-booking detection.
//!
//! A conflict is a teacher bound to more than one class in the same
//! (date, period). The result is derived: it is recomputed in full from the
//! configuration and the assignment store on every call, and holds no
//! state of its own.
//!
//! # Algorithm
//!
//! For each (date, period) in the cross product of the current date and
//! period lists, count every non-empty, non-placeholder teacher across the
//! class list. Teachers with a count above one are recorded under the
//! (date, period, teacher) triple, together with the classes involved.
//!
//! Cost is O(|dates| · |periods| · |classes| · log n), which is trivial at
//! timetable scale.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{AssignmentRecord, AssignmentStore, Configuration, SlotKey, UNASSIGNED_TEACHER};

/// Identity of one conflict.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConflictKey {
    pub date: String,
    pub period: String,
    pub teacher: String,
}

impl ConflictKey {
    pub fn new(date: impl Into<String>, period: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            period: period.into(),
            teacher: teacher.into(),
        }
    }
}

/// All conflicts for a configuration + store pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    entries: BTreeMap<ConflictKey, Vec<String>>,
}

impl ConflictSet {
    /// Whether `teacher` is double-booked at (`date`, `period`).
    pub fn contains(&self, date: &str, period: &str, teacher: &str) -> bool {
        self.entries.contains_key(&ConflictKey::new(date, period, teacher))
    }

    /// Whether the cell should be flagged: its teacher is set and conflicting.
    pub fn is_slot_conflicting(&self, slot: &SlotKey, record: &AssignmentRecord) -> bool {
        record.has_teacher() && self.contains(&slot.date, &slot.period, &record.teacher)
    }

    /// Class labels involved in a conflict, in class-list order.
    pub fn classes(&self, date: &str, period: &str, teacher: &str) -> Option<&[String]> {
        self.entries
            .get(&ConflictKey::new(date, period, teacher))
            .map(Vec::as_slice)
    }

    /// Iterates conflicts in (date, period, teacher) order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConflictKey, &[String])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct (date, period, teacher) conflicts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timetable is free of double-bookings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Detects conflicts using the default placeholder teacher.
pub fn detect_conflicts(config: &Configuration, store: &AssignmentStore) -> ConflictSet {
    detect_conflicts_with(config, store, UNASSIGNED_TEACHER)
}

/// Detects conflicts, treating `sentinel` as the exempt placeholder.
pub fn detect_conflicts_with(
    config: &Configuration,
    store: &AssignmentStore,
    sentinel: &str,
) -> ConflictSet {
    let mut entries: BTreeMap<ConflictKey, Vec<String>> = BTreeMap::new();

    for date in &config.dates {
        for period in &config.periods {
            let mut bookings: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

            for class in &config.classes {
                let slot = SlotKey::new(date.as_str(), period.as_str(), class.as_str());
                let Some(record) = store.record(&slot) else {
                    continue;
                };
                if record.teacher.is_empty() || record.teacher == sentinel {
                    continue;
                }
                bookings.entry(record.teacher.as_str()).or_default().push(class);
            }

            for (teacher, classes) in bookings {
                if classes.len() > 1 {
                    entries.insert(
                        ConflictKey::new(date.as_str(), period.as_str(), teacher),
                        classes.into_iter().map(str::to_string).collect(),
                    );
                }
            }
        }
    }

    if !entries.is_empty() {
        tracing::debug!(count = entries.len(), "double-bookings detected");
    }
    ConflictSet { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentField;

    fn small_config() -> Configuration {
        Configuration::empty()
            .with_dates(["d1", "d2"])
            .with_periods(["p1", "p2"])
            .with_classes(["A", "B", "C"])
    }

    fn put(store: &mut AssignmentStore, d: &str, p: &str, c: &str, teacher: &str) {
        store.assign(SlotKey::new(d, p, c), AssignmentField::Teacher, teacher);
    }

    #[test]
    fn test_no_assignments_no_conflicts() {
        let c = small_config();
        assert!(detect_conflicts(&c, &AssignmentStore::new()).is_empty());
    }

    #[test]
    fn test_double_booking_detected_and_removed() {
        let c = small_config();
        let mut s = AssignmentStore::new();
        put(&mut s, "d1", "p1", "A", "T");
        put(&mut s, "d1", "p1", "B", "T");

        let conflicts = detect_conflicts(&c, &s);
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts.contains("d1", "p1", "T"));
        assert_eq!(conflicts.classes("d1", "p1", "T").unwrap(), ["A", "B"]);

        // Both cells are flagged, not only the second one.
        for class in ["A", "B"] {
            let slot = SlotKey::new("d1", "p1", class);
            assert!(conflicts.is_slot_conflicting(&slot, &s.get(&slot)));
        }

        s.clear(&SlotKey::new("d1", "p1", "B"));
        assert!(detect_conflicts(&c, &s).is_empty());
    }

    #[test]
    fn test_different_periods_do_not_conflict() {
        let c = small_config();
        let mut s = AssignmentStore::new();
        put(&mut s, "d1", "p1", "A", "T");
        put(&mut s, "d1", "p2", "B", "T");
        put(&mut s, "d2", "p1", "C", "T");
        assert!(detect_conflicts(&c, &s).is_empty());
    }

    #[test]
    fn test_placeholder_never_conflicts() {
        let c = small_config();
        let mut s = AssignmentStore::new();
        for class in ["A", "B", "C"] {
            put(&mut s, "d1", "p1", class, UNASSIGNED_TEACHER);
        }
        assert!(detect_conflicts(&c, &s).is_empty());
    }

    #[test]
    fn test_custom_sentinel() {
        let c = small_config();
        let mut s = AssignmentStore::new();
        put(&mut s, "d1", "p1", "A", "TBD");
        put(&mut s, "d1", "p1", "B", "TBD");
        assert!(detect_conflicts_with(&c, &s, "TBD").is_empty());
        assert!(detect_conflicts(&c, &s).contains("d1", "p1", "TBD"));
    }

    #[test]
    fn test_empty_teacher_ignored() {
        let c = small_config();
        let mut s = AssignmentStore::new();
        s.assign(SlotKey::new("d1", "p1", "A"), AssignmentField::Subject, "Math");
        s.assign(SlotKey::new("d1", "p1", "B"), AssignmentField::Subject, "Math");
        assert!(detect_conflicts(&c, &s).is_empty());
    }

    #[test]
    fn test_orphaned_dates_ignored() {
        let mut c = small_config();
        let mut s = AssignmentStore::new();
        put(&mut s, "d2", "p1", "A", "T");
        put(&mut s, "d2", "p1", "B", "T");
        assert_eq!(detect_conflicts(&c, &s).len(), 1);

        c = c.with_dates(["d1"]);
        assert!(detect_conflicts(&c, &s).is_empty());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_three_way_conflict_lists_all_classes() {
        let c = small_config();
        let mut s = AssignmentStore::new();
        for class in ["A", "B", "C"] {
            put(&mut s, "d2", "p2", class, "T");
        }
        put(&mut s, "d2", "p2", "A", "U");
        let conflicts = detect_conflicts(&c, &s);
        assert_eq!(conflicts.classes("d2", "p2", "T").unwrap(), ["B", "C"]);
        assert!(!conflicts.contains("d2", "p2", "U"));
    }

    #[test]
    fn test_lookup_misses() {
        let c = small_config();
        let mut s = AssignmentStore::new();
        put(&mut s, "d1", "p2", "A", "T");
        put(&mut s, "d1", "p2", "C", "T");
        let conflicts = detect_conflicts(&c, &s);
        assert_eq!(conflicts.classes("d1", "p2", "T").unwrap(), ["A", "C"]);
        assert!(conflicts.classes("d1", "p1", "T").is_none());
        assert!(!conflicts.contains("d2", "p2", "T"));
        assert!(!conflicts.contains("d1", "p2", "U"));
        let keys: Vec<_> = conflicts.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, [ConflictKey::new("d1", "p2", "T")]);
    }

    #[test]
    fn test_idempotent() {
        let c = Configuration::default();
        let mut s = AssignmentStore::new();
        put(&mut s, "12/25(木)", "1限 (13:00~)", "Sクラス", "片岡");
        put(&mut s, "12/25(木)", "1限 (13:00~)", "Aクラス", "片岡");
        let first = detect_conflicts(&c, &s);
        let second = detect_conflicts(&c, &s);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }
}
