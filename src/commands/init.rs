//! `somnio init` command - create a store

use std::path::Path;

use crate::cli::Cli;
use crate::commands::format::print_json;
use crate::output_by_format_result;
use somnio_core::error::Result;
use somnio_core::store::Store;

/// Execute the init command
///
/// With an explicit store path the store is created there, otherwise as
/// `.somnio/` under `root`. Re-running on an existing store is harmless.
pub fn execute(cli: &Cli, root: &Path, store_path: Option<&Path>) -> Result<()> {
    let store = match store_path {
        Some(path) => Store::init_at(path)?,
        None => Store::init(root)?,
    };

    output_by_format_result!(cli.format,
        json => {
            print_json(&serde_json::json!({
                "status": "ok",
                "store": store.root().display().to_string(),
            }))
        },
        human => {
            if !cli.quiet {
                println!("Initialized somnio store at {}", store.root().display());
            }
        }
    )
}
