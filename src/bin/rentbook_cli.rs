use std::process::ExitCode;

use rentbook::cli::{output, run_cli};

fn main() -> ExitCode {
    rentbook::init();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::FAILURE
        }
    }
}
