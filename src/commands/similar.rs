//! `somnio similar` command - stored links of a dream

use crate::cli::args::SimilarArgs;
use crate::cli::Cli;
use crate::commands::dispatch::synchronizer;
use crate::commands::format::{dream_line, print_json, score};
use crate::output_by_format_result;
use somnio_core::error::Result;
use somnio_core::store::Store;

/// Execute the similar command
pub fn execute(cli: &Cli, store: &Store, args: &SimilarArgs) -> Result<()> {
    let similar = synchronizer(store).find_similar(&args.id, args.min)?;

    output_by_format_result!(cli.format,
        json => { print_json(&similar) },
        human => {
            if similar.is_empty() {
                if !cli.quiet {
                    println!("No similar dreams");
                }
            } else {
                for entry in &similar {
                    println!("{}  {}", score(entry.similarity), dream_line(&entry.dream));
                }
            }
        }
    )
}
