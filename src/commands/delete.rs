//! `somnio delete` command

use crate::cli::Cli;
use crate::commands::format::print_json;
use crate::output_by_format_result;
use somnio_core::error::{Result, SomnioError};
use somnio_core::store::Store;

/// Execute the delete command
///
/// The dream and every link touching it are removed together.
pub fn execute(cli: &Cli, store: &Store, id: &str) -> Result<()> {
    if !store.db().delete_dream(id)? {
        return Err(SomnioError::not_found("dream", id));
    }
    tracing::info!(dream_id = id, "Deleted dream");

    output_by_format_result!(cli.format,
        json => { print_json(&serde_json::json!({ "deleted": id })) },
        human => {
            if !cli.quiet {
                println!("Deleted {}", id);
            }
        }
    )
}
