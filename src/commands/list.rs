//! `somnio list` command

use crate::cli::args::ListArgs;
use crate::cli::Cli;
use crate::commands::format::{dream_line, print_json};
use crate::output_by_format_result;
use somnio_core::error::Result;
use somnio_core::store::Store;

/// Execute the list command
pub fn execute(cli: &Cli, store: &Store, args: &ListArgs) -> Result<()> {
    let mut dreams = store.db().list_dreams(args.public)?;
    if let Some(user) = &args.user {
        dreams.retain(|d| &d.user_id == user);
    }

    output_by_format_result!(cli.format,
        json => { print_json(&dreams) },
        human => {
            if dreams.is_empty() {
                if !cli.quiet {
                    println!("No dreams found");
                }
            } else {
                for dream in &dreams {
                    println!("{}", dream_line(dream));
                }
            }
        }
    )
}
