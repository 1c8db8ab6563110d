//! Course timetable core for the U-Engine ecosystem.
//!
//! Models a short-course timetable as a grid of (date, period, class)
//! slots, each holding a subject and a teacher, and checks it for teacher
//! double-booking. This crate is the data model and validation engine
//! behind a grid editor; rendering and widgets live elsewhere.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Configuration`, `Teacher`, `SlotKey`,
//!   `AssignmentRecord`, `AssignmentStore`
//! - **`eligibility`**: Subject → permitted teachers filter
//! - **`conflict`**: Double-booking detection (derived, never cached)
//! - **`validation`**: Integrity report (unknown/ineligible teachers, orphans)
//! - **`persistence`**: Versioned JSON documents, generations 0, 2 and 3
//! - **`session`**: Owned editing state tying the above together
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{AssignmentField, SlotKey};
//! use u_timetable::session::Session;
//!
//! let mut session = Session::default();
//! let a = SlotKey::new("12/25(木)", "1限 (13:00~)", "Sクラス");
//! let b = SlotKey::new("12/25(木)", "1限 (13:00~)", "Aクラス");
//! for slot in [a, b] {
//!     session.assign(slot.clone(), AssignmentField::Subject, "数学");
//!     session.assign(slot, AssignmentField::Teacher, "片岡");
//! }
//! assert!(session.conflicts().contains("12/25(木)", "1限 (13:00~)", "片岡"));
//! ```

pub mod conflict;
pub mod eligibility;
pub mod error;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod session;
pub mod validation;

pub use error::{Result, TimetableError};
