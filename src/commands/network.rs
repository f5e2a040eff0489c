//! `somnio network` command

use crate::cli::args::NetworkArgs;
use crate::cli::Cli;
use crate::commands::dispatch::synchronizer;
use crate::commands::format::{print_json, score};
use crate::output_by_format_result;
use somnio_core::error::Result;
use somnio_core::store::{NetworkNode, PublicNetwork, Store};

fn print_nodes(network: &[NetworkNode]) {
    for node in network {
        println!("{}  {}", node.dream.id, node.dream.title);
        for connection in &node.connections {
            println!("  -> {}  {}", connection.target_id, score(connection.similarity));
        }
    }
}

fn print_links(network: &PublicNetwork) {
    for link in &network.links {
        let mut line = format!("{} -> {}  {}", link.source, link.target, score(link.similarity));
        if !link.shared_themes.is_empty() {
            line.push_str(&format!("  [{}]", link.shared_themes.join(", ")));
        }
        println!("{}", line);
    }
}

/// Execute the network command
///
/// With `--links` every stored relationship between public dreams is listed
/// with its shared themes; otherwise each public dream is shown with its
/// connections at or above the threshold.
pub fn execute(cli: &Cli, store: &Store, args: &NetworkArgs) -> Result<()> {
    let sync = synchronizer(store);

    if args.links {
        let network = sync.public_network()?;
        return output_by_format_result!(cli.format,
            json => { print_json(&network) },
            human => { print_links(&network); }
        );
    }

    let network = sync.network(args.min)?;
    output_by_format_result!(cli.format,
        json => { print_json(&network) },
        human => { print_nodes(&network); }
    )
}
