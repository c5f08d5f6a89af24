//! Biblio - Local-first library circulation management

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = biblio_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
