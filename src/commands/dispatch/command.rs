//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Cli;
use somnio_core::error::Result;
use somnio_core::store::Store;
use somnio_core::sync::RelationshipSynchronizer;

/// Resolve `--store` against the root, or `None` when discovery should be used
pub fn explicit_store_path(cli: &Cli, root: &Path) -> Option<PathBuf> {
    cli.store.as_ref().map(|path| {
        if path.is_absolute() {
            path.clone()
        } else {
            root.join(path)
        }
    })
}

/// Discover or open a store based on CLI configuration
pub fn discover_or_open_store(cli: &Cli, root: &Path) -> Result<Store> {
    match explicit_store_path(cli, root) {
        Some(path) => Store::open(&path),
        None => Store::discover(root),
    }
}

/// Synchronizer over the store's database using its configured thresholds
pub fn synchronizer(store: &Store) -> RelationshipSynchronizer {
    RelationshipSynchronizer::new(store.collaborator())
        .with_config(store.config().similarity.clone())
}

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    pub fn discover_or_open_store(&self) -> Result<Store> {
        let store = discover_or_open_store(self.cli, self.root)?;
        super::trace_command!(self.cli, self.start, "discover_store");
        Ok(store)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("somnio {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("A dream journal that links similar dreams.");
        println!();
        println!("Run `somnio --help` for usage information.");
        Ok(())
    }
}
