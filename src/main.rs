//! `u-timetable` command: file-based front end for the timetable core.

mod cli;
mod commands;

use clap::Parser;
use std::process::ExitCode;

use cli::Cli;

fn main() -> ExitCode {
    u_timetable::logging::init();
    let cli = Cli::parse();

    match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
