//! Timetable domain models.
//!
//! The grid is spanned by three enumerations from [`Configuration`]:
//! dates × periods × classes. Each cell is addressed by a [`SlotKey`] and
//! may hold one [`AssignmentRecord`] in the [`AssignmentStore`].
//!
//! # Mapping to the editor
//!
//! | u-timetable | Editor grid |
//! |-------------|-------------|
//! | `SlotKey` | One cell (row = date × period, column = class) |
//! | `AssignmentRecord` | The two dropdowns in a cell |
//! | `Teacher` | One row of the roster settings table |
//! | `Configuration` | The settings panel |

mod assignment;
mod config;
mod slot;
mod teacher;

pub use assignment::{AssignmentField, AssignmentRecord, AssignmentStore};
pub use config::{Configuration, EnumerationField};
pub use slot::{SlotKey, SLOT_KEY_SEPARATOR};
pub use teacher::{Teacher, UNASSIGNED_TEACHER};
