//! Timetable configuration.
//!
//! Holds the four ordered enumerations that span the grid (dates, periods,
//! classes, subjects) and the teacher roster. Edits never rewrite stored
//! assignments; records that stop matching the grid simply go inert.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{SlotKey, Teacher, UNASSIGNED_TEACHER};
use crate::error::{Result, TimetableError};

/// One of the comma-editable enumeration lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationField {
    Dates,
    Periods,
    Classes,
    Subjects,
}

impl EnumerationField {
    /// All fields in grid order.
    pub const ALL: [EnumerationField; 4] = [
        EnumerationField::Dates,
        EnumerationField::Periods,
        EnumerationField::Classes,
        EnumerationField::Subjects,
    ];

    /// Field name as used in the persisted document.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumerationField::Dates => "dates",
            EnumerationField::Periods => "periods",
            EnumerationField::Classes => "classes",
            EnumerationField::Subjects => "subjects",
        }
    }
}

impl fmt::Display for EnumerationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumerationField {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        EnumerationField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| TimetableError::UnknownField(s.to_string()))
    }
}

/// Grid enumerations plus the teacher roster.
///
/// Field order matches the generation-3 document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Date labels (grid row groups).
    pub dates: Vec<String>,
    /// Period labels within a date.
    pub periods: Vec<String>,
    /// Class labels (grid columns).
    pub classes: Vec<String>,
    /// Selectable subjects.
    pub subjects: Vec<String>,
    /// Roster, in display order.
    pub teachers: Vec<Teacher>,
}

impl Default for Configuration {
    /// The winter-course seed the editor starts with.
    fn default() -> Self {
        let subjects = ["英語", "数学", "国語", "理科", "社会"];
        Self {
            dates: strings(["12/25(木)", "12/26(金)", "12/27(土)", "12/28(日)"]),
            periods: strings(["1限 (13:00~)", "2限 (14:10~)", "3限 (15:20~)"]),
            classes: strings(["Sクラス", "Aクラス", "Bクラス", "Cクラス"]),
            subjects: strings(subjects),
            teachers: vec![
                Teacher::new("堀上").with_subject("英語"),
                Teacher::new("片岡").with_subject("数学"),
                Teacher::new("井上").with_subject("社会"),
                Teacher::new("半田").with_subjects(["数学", "理科"]),
                Teacher::new("松川").with_subject("国語"),
                Teacher::new(UNASSIGNED_TEACHER).with_subjects(subjects),
            ],
        }
    }
}

impl Configuration {
    /// Creates a configuration with all lists empty.
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            periods: Vec::new(),
            classes: Vec::new(),
            subjects: Vec::new(),
            teachers: Vec::new(),
        }
    }

    /// Sets the date list.
    pub fn with_dates<I, S>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dates = dates.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the period list.
    pub fn with_periods<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.periods = periods.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the class list.
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the subject list.
    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a roster entry.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Read access to an enumeration list.
    pub fn enumeration(&self, field: EnumerationField) -> &[String] {
        match field {
            EnumerationField::Dates => &self.dates,
            EnumerationField::Periods => &self.periods,
            EnumerationField::Classes => &self.classes,
            EnumerationField::Subjects => &self.subjects,
        }
    }

    /// Replaces an enumeration from comma-separated text.
    ///
    /// Items are trimmed and empty items dropped. Duplicates are kept as
    /// separate positions.
    pub fn set_enumeration(&mut self, field: EnumerationField, raw_text: &str) {
        let items = parse_list(raw_text);
        tracing::debug!(%field, count = items.len(), "enumeration replaced");
        let target = match field {
            EnumerationField::Dates => &mut self.dates,
            EnumerationField::Periods => &mut self.periods,
            EnumerationField::Classes => &mut self.classes,
            EnumerationField::Subjects => &mut self.subjects,
        };
        *target = items;
    }

    /// The enumeration as editable text (inverse of [`set_enumeration`](Self::set_enumeration)).
    pub fn enumeration_text(&self, field: EnumerationField) -> String {
        self.enumeration(field).join(", ")
    }

    /// Appends a teacher with no eligible subjects.
    ///
    /// Returns `false` (and changes nothing) if `name` is blank.
    pub fn add_teacher(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        tracing::debug!(name, "teacher added");
        self.teachers.push(Teacher::new(name));
        true
    }

    /// Adds or removes `subject` from the eligibility set of the teacher at `index`.
    ///
    /// Returns whether the teacher now holds the subject.
    pub fn toggle_teacher_subject(&mut self, index: usize, subject: &str) -> Result<bool> {
        let len = self.teachers.len();
        let teacher = self
            .teachers
            .get_mut(index)
            .ok_or(TimetableError::TeacherIndexOutOfRange { index, len })?;
        let held = teacher.toggle_subject(subject);
        tracing::debug!(teacher = %teacher.name, subject, held, "eligibility toggled");
        Ok(held)
    }

    /// Removes and returns the teacher at `index`; later entries shift down.
    pub fn remove_teacher(&mut self, index: usize) -> Result<Teacher> {
        let len = self.teachers.len();
        if index >= len {
            return Err(TimetableError::TeacherIndexOutOfRange { index, len });
        }
        let removed = self.teachers.remove(index);
        tracing::debug!(name = %removed.name, index, "teacher removed");
        Ok(removed)
    }

    /// Finds a teacher by exact name (first match).
    pub fn teacher(&self, name: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.name == name)
    }

    /// Position of the first teacher with this name.
    pub fn teacher_index(&self, name: &str) -> Option<usize> {
        self.teachers.iter().position(|t| t.name == name)
    }

    /// Whether `subject` is in the subject list.
    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// Whether the slot's date, period, and class are all present.
    pub fn contains_slot(&self, slot: &SlotKey) -> bool {
        self.dates.contains(&slot.date)
            && self.periods.contains(&slot.period)
            && self.classes.contains(&slot.class)
    }

    /// Every grid cell in date → period → class order.
    ///
    /// Duplicate labels yield repeated slots, one per position.
    pub fn slots(&self) -> impl Iterator<Item = SlotKey> + '_ {
        self.dates.iter().flat_map(move |d| {
            self.periods.iter().flat_map(move |p| {
                self.classes
                    .iter()
                    .map(move |c| SlotKey::new(d.as_str(), p.as_str(), c.as_str()))
            })
        })
    }

    /// Number of grid cells.
    pub fn slot_count(&self) -> usize {
        self.dates.len() * self.periods.len() * self.classes.len()
    }
}

fn parse_list(raw_text: &str) -> Vec<String> {
    raw_text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn strings<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
