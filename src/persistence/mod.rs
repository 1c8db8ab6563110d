//! Versioned document persistence.
//!
//! Saves always produce the current generation. Loads accept every
//! generation the editor has ever written, chosen by document shape.
//!
//! # Usage
//!
//! ```
//! use u_timetable::models::{AssignmentStore, Configuration};
//! use u_timetable::persistence::{deserialize, to_json_pretty, LoadOptions};
//!
//! let config = Configuration::default();
//! let text = to_json_pretty(&config, &AssignmentStore::new()).unwrap();
//! let loaded = deserialize(&text, &config, &LoadOptions::default()).unwrap();
//! assert_eq!(loaded.config, config);
//! ```

mod codec;
mod document;
mod export;

pub use codec::{
    deserialize, serialize, to_json_pretty, EligibilityPolicy, LoadOptions, LoadReport, Loaded,
};
pub use document::{Document, Generation, RawSchedule, CURRENT_VERSION};
pub use export::{export_file_name, export_to_dir, import_file, save_to_path, EXPORT_PREFIX};
