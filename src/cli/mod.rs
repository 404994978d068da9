//! Command-line interface layer.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod logging;
pub mod report;

pub use args::{Arguments, Command, CommonArgs, PatchCommand};
pub use exit_status::ExitStatus;
pub use logging::{LOG_ENV, init_tracing};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match args.command {
        Some(Command::Patch(cmd)) => commands::patch::patch(cmd),
        Some(Command::Init) => commands::init::init(),
        None => Ok(ExitStatus::Success),
    }
}
