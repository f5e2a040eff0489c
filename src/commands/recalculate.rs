//! `somnio recalculate` command - rebuild every link

use crate::cli::Cli;
use crate::commands::dispatch::synchronizer;
use crate::commands::format::print_json;
use crate::output_by_format_result;
use somnio_core::error::Result;
use somnio_core::store::Store;

/// Execute the recalculate command
pub fn execute(cli: &Cli, store: &Store, min: Option<f64>) -> Result<()> {
    let summary = synchronizer(store).recalculate_all(min)?;

    output_by_format_result!(cli.format,
        json => { print_json(&summary) },
        human => {
            println!(
                "Processed {} dreams, created {} relationships",
                summary.processed_count, summary.relationships_created
            );
        }
    )
}
