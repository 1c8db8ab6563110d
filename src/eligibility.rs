//! Subject → teacher eligibility.
//!
//! When a cell has a subject, the teacher dropdown offers only teachers
//! whose eligibility set contains that subject. With no subject chosen the
//! full roster is returned; disabling the dropdown in that state is up to
//! the caller.

use crate::models::Teacher;

/// Teachers permitted to teach `subject`, in roster order.
///
/// An empty `subject` returns the whole roster.
pub fn eligible_teachers_for<'a>(subject: &str, roster: &'a [Teacher]) -> Vec<&'a Teacher> {
    if subject.is_empty() {
        return roster.iter().collect();
    }
    roster.iter().filter(|t| t.teaches(subject)).collect()
}

/// Whether the roster entry named `teacher` may teach `subject`.
///
/// `None` if no roster entry has that name. An empty subject accepts any
/// known teacher.
pub fn is_eligible(roster: &[Teacher], teacher: &str, subject: &str) -> Option<bool> {
    roster
        .iter()
        .find(|t| t.name == teacher)
        .map(|t| subject.is_empty() || t.teaches(subject))
}
