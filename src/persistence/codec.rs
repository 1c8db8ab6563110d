//! Document encoding and generation-aware decoding.
//!
//! # Decoding order
//!
//! 1. Parse JSON. Failure → [`TimetableError::MalformedDocument`].
//! 2. If both `config` and `schedule` are present, try the generation-3
//!    shape, then the generation-2 shape. The declared `version` is
//!    informational only.
//! 3. Otherwise, accept the whole value as a bare schedule if every entry
//!    is a record.
//! 4. Nothing matched → [`TimetableError::UnrecognizedShape`].
//!
//! Persisted keys are then resolved to grid cells against the configuration
//! that will be active after the load. Unresolvable keys are kept detached.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use super::document::{BareRecord, ConfigV2, Document, Generation, RawSchedule, CURRENT_VERSION};
use crate::error::{Result, TimetableError};
use crate::models::{AssignmentRecord, AssignmentStore, Configuration, SlotKey};
use crate::validation::{eligibility_error, ValidationError};

/// What to do with records whose teacher may not teach their subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Keep such records as they are.
    #[default]
    Lenient,
    /// Reject the whole document.
    Strict,
    /// Keep the record but clear its teacher.
    Repair,
}

/// Load-time options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub eligibility: EligibilityPolicy,
}

impl LoadOptions {
    /// Options with the given eligibility policy.
    pub fn with_policy(eligibility: EligibilityPolicy) -> Self {
        Self { eligibility }
    }
}

/// Summary of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Shape the document was recognized as.
    pub generation: Generation,
    /// `version` as written in the document, if any.
    pub declared_version: Option<u64>,
    /// Records resolved to grid cells.
    pub records: usize,
    /// Records kept under keys matching no grid cell.
    pub detached: usize,
    /// Records whose teacher was cleared by [`EligibilityPolicy::Repair`].
    pub repaired: usize,
}

/// A decoded document, ready to replace the session state.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Configuration,
    pub store: AssignmentStore,
    pub report: LoadReport,
}

/// Builds a current-generation document.
///
/// Fails with [`TimetableError::AmbiguousSlotKey`] if two distinct slots
/// share a persisted key, since one record would silently overwrite the
/// other.
pub fn serialize(config: &Configuration, store: &AssignmentStore) -> Result<Document> {
    let mut schedule = RawSchedule::new();
    for (slot, record) in store.iter() {
        insert_unique(&mut schedule, slot.legacy_key(), record)?;
    }
    for (key, record) in store.detached() {
        insert_unique(&mut schedule, key.to_string(), record)?;
    }
    Ok(Document {
        version: CURRENT_VERSION,
        config: config.clone(),
        schedule,
    })
}

/// Serializes to pretty-printed JSON.
pub fn to_json_pretty(config: &Configuration, store: &AssignmentStore) -> Result<String> {
    let doc = serialize(config, store)?;
    serde_json::to_string_pretty(&doc).map_err(TimetableError::Encode)
}

/// Decodes a document of any supported generation.
///
/// `current` is the configuration kept when the document is a bare
/// schedule. Nothing is mutated; the caller swaps in the result.
pub fn deserialize(raw: &str, current: &Configuration, options: &LoadOptions) -> Result<Loaded> {
    let value: Value = serde_json::from_str(raw).map_err(TimetableError::MalformedDocument)?;
    let declared_version = value.get("version").and_then(Value::as_u64);

    let (generation, config, schedule) = classify(value, current)?;
    if let Some(v) = declared_version {
        let expected = match generation {
            Generation::Bare => None,
            Generation::ConfigV2 => Some(2),
            Generation::ConfigV3 => Some(CURRENT_VERSION as u64),
        };
        if expected.is_some_and(|e| e != v) {
            tracing::warn!(declared = v, %generation, "document version does not match its shape");
        }
    }

    let mut store = resolve_schedule(schedule, &config);
    let repaired = apply_policy(&config, &mut store, options.eligibility)?;

    let report = LoadReport {
        generation,
        declared_version,
        records: store.iter().count(),
        detached: store.detached_len(),
        repaired,
    };
    tracing::info!(
        %generation,
        records = report.records,
        detached = report.detached,
        repaired,
        "document loaded"
    );
    Ok(Loaded {
        config,
        store,
        report,
    })
}

fn classify(value: Value, current: &Configuration) -> Result<(Generation, Configuration, RawSchedule)> {
    let value = match value {
        Value::Object(mut map) if present(&map, "config") && present(&map, "schedule") => {
            let config_value = map.remove("config").unwrap_or(Value::Null);
            let schedule_value = map.remove("schedule").unwrap_or(Value::Null);
            return classify_embedded(config_value, schedule_value);
        }
        other => other,
    };

    match parse_schedule(value) {
        Some(schedule) => Ok((Generation::Bare, current.clone(), schedule)),
        None => Err(TimetableError::UnrecognizedShape(
            "neither a config+schedule document nor a bare schedule".into(),
        )),
    }
}

fn classify_embedded(
    config_value: Value,
    schedule_value: Value,
) -> Result<(Generation, Configuration, RawSchedule)> {
    let schedule = parse_schedule(schedule_value).ok_or_else(|| {
        TimetableError::UnrecognizedShape("'schedule' is not a slot-key → record map".into())
    })?;

    if let Ok(config) = Configuration::deserialize(&config_value) {
        return Ok((Generation::ConfigV3, config, schedule));
    }
    if let Ok(v2) = ConfigV2::deserialize(&config_value) {
        tracing::warn!(
            teachers = v2.teachers.len(),
            "name-only roster lifted; teachers start with no eligible subjects"
        );
        return Ok((Generation::ConfigV2, v2.into_configuration(), schedule));
    }
    Err(TimetableError::UnrecognizedShape(
        "'config' matches no known generation".into(),
    ))
}

fn present(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}

fn parse_schedule(value: Value) -> Option<RawSchedule> {
    let raw = BTreeMap::<String, BareRecord>::deserialize(value).ok()?;
    Some(raw.into_iter().map(|(k, r)| (k, r.into())).collect())
}

fn resolve_schedule(schedule: RawSchedule, config: &Configuration) -> AssignmentStore {
    let mut index: HashMap<String, Vec<SlotKey>> = HashMap::new();
    for slot in config.slots() {
        let candidates = index.entry(slot.legacy_key()).or_default();
        if !candidates.contains(&slot) {
            candidates.push(slot);
        }
    }

    let mut store = AssignmentStore::new();
    for (key, record) in schedule {
        let matched = index.get(&key).map(Vec::as_slice);
        match matched {
            Some([slot, rest @ ..]) => {
                if !rest.is_empty() {
                    tracing::warn!(
                        key = %key,
                        candidates = rest.len() + 1,
                        "ambiguous slot key; using first grid match"
                    );
                }
                store.insert(slot.clone(), record);
            }
            _ => store.insert_detached(key, record),
        }
    }
    if store.detached_len() > 0 {
        tracing::warn!(detached = store.detached_len(), "records match no grid cell");
    }
    store
}

fn apply_policy(
    config: &Configuration,
    store: &mut AssignmentStore,
    policy: EligibilityPolicy,
) -> Result<usize> {
    if policy == EligibilityPolicy::Lenient {
        return Ok(0);
    }

    let mut violations: Vec<ValidationError> = Vec::new();
    let mut repaired = 0;
    for (slot, record) in store.iter_mut() {
        let Some(err) = eligibility_error(config, slot, record) else {
            continue;
        };
        match policy {
            EligibilityPolicy::Strict => violations.push(err),
            EligibilityPolicy::Repair => {
                tracing::warn!(%slot, teacher = %record.teacher, "clearing ineligible teacher");
                record.teacher.clear();
                repaired += 1;
            }
            EligibilityPolicy::Lenient => {}
        }
    }

    if violations.is_empty() {
        Ok(repaired)
    } else {
        Err(TimetableError::EligibilityViolations(violations))
    }
}

fn insert_unique(schedule: &mut RawSchedule, key: String, record: &AssignmentRecord) -> Result<()> {
    if schedule.contains_key(&key) {
        return Err(TimetableError::AmbiguousSlotKey { key });
    }
    schedule.insert(key, record.clone());
    Ok(())
}
