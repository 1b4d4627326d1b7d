//! Binary entrypoint for the `opsboard` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    opsboard::telemetry::init();
    // Recording is handled in commands::dispatch via OPSBOARD_RECORD=<dir>.
    match opsboard::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
