//! Editing session.
//!
//! Owns the configuration and the assignment store for one editor session
//! and routes every mutation through a method. Derived views (conflicts,
//! eligible teachers, validation) are computed from the owned values on
//! demand and never stored.

use std::path::{Path, PathBuf};

use crate::conflict::{detect_conflicts, ConflictSet};
use crate::eligibility::eligible_teachers_for;
use crate::error::Result;
use crate::models::{
    AssignmentField, AssignmentRecord, AssignmentStore, Configuration, EnumerationField, SlotKey,
    Teacher,
};
use crate::persistence::{self, LoadOptions, LoadReport, Loaded};
use crate::validation::{validate_schedule, ValidationResult};

/// Configuration + assignments being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    config: Configuration,
    store: AssignmentStore,
}

impl Session {
    /// Starts a session from existing values.
    pub fn new(config: Configuration, store: AssignmentStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    /// Owned copies of both stores.
    pub fn snapshot(&self) -> (Configuration, AssignmentStore) {
        (self.config.clone(), self.store.clone())
    }

    pub fn into_parts(self) -> (Configuration, AssignmentStore) {
        (self.config, self.store)
    }

    // Configuration edits. Each one re-resolves detached records, since a
    // label that reappears makes its records addressable again.

    pub fn set_enumeration(&mut self, field: EnumerationField, raw_text: &str) {
        self.config.set_enumeration(field, raw_text);
        self.store.reattach(&self.config);
    }

    pub fn add_teacher(&mut self, name: &str) -> bool {
        self.config.add_teacher(name)
    }

    pub fn toggle_teacher_subject(&mut self, index: usize, subject: &str) -> Result<bool> {
        self.config.toggle_teacher_subject(index, subject)
    }

    /// Removes a roster entry. Records naming that teacher are kept.
    pub fn remove_teacher(&mut self, index: usize) -> Result<Teacher> {
        self.config.remove_teacher(index)
    }

    // Assignment edits.

    pub fn assign(&mut self, slot: SlotKey, field: AssignmentField, value: impl Into<String>) {
        self.store.assign(slot, field, value);
    }

    pub fn clear(&mut self, slot: &SlotKey) -> Option<AssignmentRecord> {
        self.store.clear(slot)
    }

    pub fn record(&self, slot: &SlotKey) -> AssignmentRecord {
        self.store.get(slot)
    }

    // Derived views.

    /// Current double-bookings.
    pub fn conflicts(&self) -> ConflictSet {
        detect_conflicts(&self.config, &self.store)
    }

    /// Teachers offered for `slot`, filtered by its current subject.
    pub fn eligible_teachers(&self, slot: &SlotKey) -> Vec<&Teacher> {
        let subject = self.store.record(slot).map_or("", |r| r.subject.as_str());
        eligible_teachers_for(subject, &self.config.teachers)
    }

    pub fn validate(&self) -> ValidationResult {
        validate_schedule(&self.config, &self.store)
    }

    // Persistence. A failed load leaves the session untouched.

    pub fn save_json(&self) -> Result<String> {
        persistence::to_json_pretty(&self.config, &self.store)
    }

    pub fn load_json(&mut self, raw: &str, options: &LoadOptions) -> Result<LoadReport> {
        let loaded = persistence::deserialize(raw, &self.config, options)?;
        Ok(self.replace(loaded))
    }

    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        persistence::export_to_dir(dir, &self.config, &self.store)
    }

    pub fn import_file(&mut self, path: &Path, options: &LoadOptions) -> Result<LoadReport> {
        let loaded = persistence::import_file(path, &self.config, options)?;
        Ok(self.replace(loaded))
    }

    fn replace(&mut self, loaded: Loaded) -> LoadReport {
        self.config = loaded.config;
        self.store = loaded.store;
        loaded.report
    }
}
