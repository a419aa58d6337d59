//! Command dispatch: bridges CLI args -> resource controllers -> output formatting.

pub mod config_cmd;
pub mod crud;
pub mod devices;
pub mod report;
pub mod users;
pub mod util;

use enerctl_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(console, args, global).await,
        Command::Devices(args) => devices::handle(console, args, global).await,
        // Handled before a console is built
        Command::Report | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
