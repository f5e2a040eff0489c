//! Routing from parsed subcommands to their implementations

use crate::cli::Commands;
use crate::commands;
use somnio_core::error::Result;

use super::command::{explicit_store_path, Command, CommandContext};
use super::trace_command;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let cli = ctx.cli;
        let open = || ctx.discover_or_open_store();

        match self {
            Commands::Init => {
                let store_path = explicit_store_path(cli, ctx.root);
                commands::init::execute(cli, ctx.root, store_path.as_deref())
            }
            Commands::Add(args) => commands::add::execute(cli, &open()?, args),
            Commands::Update(args) => commands::update::execute(cli, &open()?, args),
            Commands::Delete { id } => commands::delete::execute(cli, &open()?, id),
            Commands::List(args) => commands::list::execute(cli, &open()?, args),
            Commands::Show { id } => commands::show::execute(cli, &open()?, id),
            Commands::Similar(args) => commands::similar::execute(cli, &open()?, args),
            Commands::Explain { a, b } => commands::explain::execute(cli, &open()?, a, b),
            Commands::Link(args) => commands::link::execute(cli, &open()?, args),
            Commands::Recalculate(args) => {
                commands::recalculate::execute(cli, &open()?, args.min)
            }
            Commands::Network(args) => commands::network::execute(cli, &open()?, args),
        }?;

        trace_command!(cli, ctx.start, "execute_command");
        Ok(())
    }
}
