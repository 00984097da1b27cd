//! WBS CLI - Work-breakdown structures from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = wbs_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
