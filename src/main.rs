use std::process::ExitCode;

use slot_machine::{flow, slot_machine::{app_config, constructor}};

fn main() -> ExitCode {
    match flow::run(app_config(), constructor()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("slot-machine: {e:#}");
            ExitCode::FAILURE
        }
    }
}
