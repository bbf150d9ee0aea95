//! Implementations of the subcommands.

use anyhow::Result;

use crate::App;
use crate::cli::{HkpCommand, Subcommands};

pub mod config;
pub mod keyserver;

/// Dispatches the top-level subcommand.
pub fn dispatch(app: App, command: HkpCommand) -> Result<()>
{
    match command.subcommand {
        Subcommands::Get(command) =>
            keyserver::get(app, command),
        Subcommands::Search(command) =>
            keyserver::search(app, command),
        Subcommands::Send(command) =>
            keyserver::send(app, command),

        Subcommands::Config(command) =>
            config::dispatch(app, command),
    }
}
