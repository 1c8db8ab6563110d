//! Command-line definitions.

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use u_timetable::persistence::EligibilityPolicy;

#[derive(Parser)]
#[command(name = "u-timetable", version, about = "Course timetable editor core")]
pub struct Cli {
    /// How to treat records whose teacher may not teach their subject when loading.
    #[arg(long, global = true, value_enum, default_value_t = PolicyArg::Lenient)]
    pub policy: PolicyArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Lenient,
    Strict,
    Repair,
}

impl From<PolicyArg> for EligibilityPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Lenient => EligibilityPolicy::Lenient,
            PolicyArg::Strict => EligibilityPolicy::Strict,
            PolicyArg::Repair => EligibilityPolicy::Repair,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration with an empty timetable.
    Init {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Print the grid with conflict markers.
    Show { file: PathBuf },

    /// List double-booked teachers.
    Conflicts {
        file: PathBuf,
        #[arg(long)]
        json: bool,
        /// Placeholder teacher exempt from double-booking.
        #[arg(long)]
        sentinel: Option<String>,
    },

    /// Report integrity issues (unknown/ineligible teachers, orphaned records).
    Check { file: PathBuf },

    /// List teachers eligible for a subject.
    Eligible {
        file: PathBuf,
        #[arg(long)]
        subject: String,
    },

    /// Set the subject and/or teacher of one cell, rewriting the file.
    #[command(group(ArgGroup::new("value").required(true).multiple(true).args(["subject", "teacher"])))]
    Assign {
        file: PathBuf,
        #[arg(long)]
        date: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        class: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        teacher: Option<String>,
    },

    /// Remove the record of one cell, rewriting the file.
    Clear {
        file: PathBuf,
        #[arg(long)]
        date: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        class: String,
    },

    /// Replace an enumeration (dates, periods, classes, subjects) from comma-separated text.
    Set {
        file: PathBuf,
        field: String,
        text: String,
    },

    /// Append a teacher with no eligible subjects.
    AddTeacher { file: PathBuf, name: String },

    /// Toggle one subject in a teacher's eligibility set.
    ToggleSubject {
        file: PathBuf,
        index: usize,
        subject: String,
    },

    /// Remove a teacher from the roster.
    RemoveTeacher {
        file: PathBuf,
        index: usize,
        /// Confirm removal.
        #[arg(long)]
        yes: bool,
    },

    /// Re-save a document of any generation as a dated current-generation export.
    Export {
        file: PathBuf,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}
