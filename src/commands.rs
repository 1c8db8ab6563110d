//! Subcommand implementations.
//!
//! Each command loads the document into a [`Session`], applies at most one
//! mutation, and writes the file back only if the mutation succeeded.

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use u_timetable::conflict::detect_conflicts_with;
use u_timetable::eligibility::eligible_teachers_for;
use u_timetable::models::{AssignmentField, EnumerationField, SlotKey, UNASSIGNED_TEACHER};
use u_timetable::persistence::{self, LoadOptions};
use u_timetable::session::Session;
use u_timetable::{Result, TimetableError};

use crate::cli::{Cli, Commands};

#[derive(Serialize)]
struct ConflictRow<'a> {
    date: &'a str,
    period: &'a str,
    teacher: &'a str,
    classes: &'a [String],
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let options = LoadOptions::with_policy(cli.policy.into());

    match cli.command {
        Commands::Init { dir } => {
            let path = Session::default().export_to_dir(&dir)?;
            println!("{}", path.display());
        }

        Commands::Show { file } => {
            let session = open(&file, &options)?;
            print_grid(&session);
        }

        Commands::Conflicts {
            file,
            json,
            sentinel,
        } => {
            let session = open(&file, &options)?;
            let sentinel = sentinel.as_deref().unwrap_or(UNASSIGNED_TEACHER);
            let conflicts = detect_conflicts_with(session.config(), session.store(), sentinel);
            if json {
                let rows: Vec<ConflictRow<'_>> = conflicts
                    .iter()
                    .map(|(k, classes)| ConflictRow {
                        date: &k.date,
                        period: &k.period,
                        teacher: &k.teacher,
                        classes,
                    })
                    .collect();
                let text = serde_json::to_string_pretty(&rows).map_err(TimetableError::Encode)?;
                println!("{text}");
            } else if conflicts.is_empty() {
                println!("no conflicts");
            } else {
                for (k, classes) in conflicts.iter() {
                    println!("{} {}: {} in {}", k.date, k.period, k.teacher, classes.join(", "));
                }
            }
            if !conflicts.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Check { file } => {
            let session = open(&file, &options)?;
            match session.validate() {
                Ok(()) => println!("ok"),
                Err(errors) => {
                    for e in &errors {
                        println!("{:?}: {}", e.kind, e.message);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Eligible { file, subject } => {
            let session = open(&file, &options)?;
            for t in eligible_teachers_for(&subject, &session.config().teachers) {
                println!("{}", t.name);
            }
        }

        Commands::Assign {
            file,
            date,
            period,
            class,
            subject,
            teacher,
        } => {
            let mut session = open(&file, &options)?;
            let slot = SlotKey::new(date, period, class);
            if let Some(subject) = subject {
                session.assign(slot.clone(), AssignmentField::Subject, subject);
            }
            if let Some(teacher) = teacher {
                session.assign(slot.clone(), AssignmentField::Teacher, teacher);
            }
            let record = session.record(&slot);
            if session.conflicts().is_slot_conflicting(&slot, &record) {
                eprintln!("warning: {} is double-booked at {} {}", record.teacher, slot.date, slot.period);
            }
            save(&file, &session)?;
        }

        Commands::Clear {
            file,
            date,
            period,
            class,
        } => {
            let mut session = open(&file, &options)?;
            session.clear(&SlotKey::new(date, period, class));
            save(&file, &session)?;
        }

        Commands::Set { file, field, text } => {
            let field: EnumerationField = field.parse()?;
            let mut session = open(&file, &options)?;
            session.set_enumeration(field, &text);
            save(&file, &session)?;
        }

        Commands::AddTeacher { file, name } => {
            let mut session = open(&file, &options)?;
            if !session.add_teacher(&name) {
                eprintln!("empty name; nothing added");
                return Ok(ExitCode::FAILURE);
            }
            save(&file, &session)?;
        }

        Commands::ToggleSubject {
            file,
            index,
            subject,
        } => {
            let mut session = open(&file, &options)?;
            let held = session.toggle_teacher_subject(index, &subject)?;
            save(&file, &session)?;
            println!("{}", if held { "added" } else { "removed" });
        }

        Commands::RemoveTeacher { file, index, yes } => {
            if !yes {
                eprintln!("refusing to remove a teacher without --yes");
                return Ok(ExitCode::FAILURE);
            }
            let mut session = open(&file, &options)?;
            let removed = session.remove_teacher(index)?;
            save(&file, &session)?;
            println!("removed {}", removed.name);
        }

        Commands::Export { file, dir } => {
            let session = open(&file, &options)?;
            let path = session.export_to_dir(&dir)?;
            println!("{}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn open(path: &Path, options: &LoadOptions) -> Result<Session> {
    let mut session = Session::default();
    let report = session.import_file(path, options)?;
    tracing::debug!(?report, "opened");
    Ok(session)
}

fn save(path: &Path, session: &Session) -> Result<()> {
    persistence::save_to_path(path, session.config(), session.store())
}

fn print_grid(session: &Session) {
    let config = session.config();
    let conflicts = session.conflicts();
    println!("date\tperiod\t{}", config.classes.join("\t"));
    for date in &config.dates {
        for period in &config.periods {
            let cells: Vec<String> = config
                .classes
                .iter()
                .map(|class| {
                    let slot = SlotKey::new(date.as_str(), period.as_str(), class.as_str());
                    let record = session.record(&slot);
                    let mark = if conflicts.is_slot_conflicting(&slot, &record) {
                        "!"
                    } else {
                        ""
                    };
                    match (record.subject.is_empty(), record.teacher.is_empty()) {
                        (true, true) => "-".to_string(),
                        _ => format!("{}/{}{mark}", record.subject, record.teacher),
                    }
                })
                .collect();
            println!("{date}\t{period}\t{}", cells.join("\t"));
        }
    }
    if session.store().detached_len() > 0 {
        println!("({} record(s) outside the grid)", session.store().detached_len());
    }
}
