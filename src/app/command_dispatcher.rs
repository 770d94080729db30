//! CLI command routing: runs the handler for the parsed subcommand.

use anyhow::Result;

use crate::app::context::RunContext;
use crate::cli::{Cli, Command};
use crate::{ProcessExit, commands};

/// Runs `cli`'s subcommand and returns the exit outcome.
pub(crate) async fn dispatch(cli: &Cli) -> Result<ProcessExit> {
    let config = cli.config.as_deref();
    match &cli.command {
        Command::Init(args) => {
            commands::run_init_command(config, args)?;
        }
        Command::Url(args) => {
            commands::run_url_command(RunContext::load(config)?, args)?;
        }
        Command::Update => {
            commands::run_update_command(&RunContext::load(config)?).await?;
        }
        Command::Download(args) => {
            return commands::run_download_command(&RunContext::load(config)?, *args, cli.quiet)
                .await;
        }
        Command::List(args) => {
            commands::run_list_command(&RunContext::load(config)?, *args)?;
        }
        Command::Add(args) => {
            commands::run_add_command(&RunContext::load(config)?, args)?;
        }
        Command::Remove(args) => {
            commands::run_remove_command(&RunContext::load(config)?, args)?;
        }
    }
    Ok(ProcessExit::Success)
}
