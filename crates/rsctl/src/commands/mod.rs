//! Command dispatch: bridges CLI args -> controller operations -> output.

pub mod certs;
pub mod config_cmd;
pub mod manager;
pub mod network;
pub mod system;
pub mod tasks;
pub mod time;
pub mod util;

use rsctl_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Manager(args) => manager::handle(controller, args, global).await,
        Command::System(args) => system::handle(controller, args, global).await,
        Command::Tasks(args) => tasks::handle(controller, args, global).await,
        // Config and Completions never reach a controller
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
