//! `somnio link` command - store a relationship by hand

use crate::cli::args::LinkArgs;
use crate::cli::Cli;
use crate::commands::dispatch::synchronizer;
use crate::commands::format::{print_json, score};
use crate::output_by_format_result;
use somnio_core::error::Result;
use somnio_core::store::Store;

/// Execute the link command
pub fn execute(cli: &Cli, store: &Store, args: &LinkArgs) -> Result<()> {
    let edge = synchronizer(store).link_dreams(
        &args.from,
        &args.to,
        args.similarity,
        args.theme.clone(),
    )?;

    output_by_format_result!(cli.format,
        json => { print_json(&edge) },
        human => {
            if !cli.quiet {
                println!(
                    "Linked {} -> {} ({})",
                    edge.dream1_id,
                    edge.dream2_id,
                    score(edge.similarity)
                );
            }
        }
    )
}
