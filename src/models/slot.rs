//! Slot identity.
//!
//! A slot is one cell of the timetable grid: a (date, period, class)
//! triple. Components are compared verbatim, with no trimming or case
//! folding.
//!
//! In memory the triple is kept as three separate strings, so two slots
//! are equal only if every component is equal. The hyphen-joined form
//! exists only for the persisted document format, where it is lossy
//! whenever a component itself contains `-`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the persisted slot-key format.
pub const SLOT_KEY_SEPARATOR: char = '-';

/// Identity of a single grid cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Date label (e.g. "12/25(木)").
    pub date: String,
    /// Period label (e.g. "1限 (13:00~)").
    pub period: String,
    /// Class label (e.g. "Sクラス").
    pub class: String,
}

impl SlotKey {
    /// Creates a slot key.
    pub fn new(
        date: impl Into<String>,
        period: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            period: period.into(),
            class: class.into(),
        }
    }

    /// The persisted key: components joined with `-` in (date, period, class) order.
    pub fn legacy_key(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.date,
            self.period,
            self.class,
            sep = SLOT_KEY_SEPARATOR
        )
    }

    /// Whether any component contains the separator, making the persisted
    /// key ambiguous.
    pub fn has_ambiguous_legacy_key(&self) -> bool {
        [&self.date, &self.period, &self.class]
            .iter()
            .any(|c| c.contains(SLOT_KEY_SEPARATOR))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.date, self.period, self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_key() {
        let slot = SlotKey::new("12/25(木)", "1限 (13:00~)", "Sクラス");
        assert_eq!(slot.legacy_key(), "12/25(木)-1限 (13:00~)-Sクラス");
        assert!(!slot.has_ambiguous_legacy_key());
    }

    #[test]
    fn test_component_equality_is_verbatim() {
        assert_ne!(SlotKey::new("d", "p", "c"), SlotKey::new("d ", "p", "c"));
        assert_eq!(SlotKey::new("d", "p", "c"), SlotKey::new("d", "p", "c"));
    }

    #[test]
    fn test_distinct_slots_sharing_legacy_key() {
        let a = SlotKey::new("a-b", "c", "d");
        let b = SlotKey::new("a", "b-c", "d");
        assert_ne!(a, b);
        assert_eq!(a.legacy_key(), b.legacy_key());
        assert!(a.has_ambiguous_legacy_key());
    }
}
