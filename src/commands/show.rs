//! `somnio show` command

use crate::cli::Cli;
use crate::commands::format::print_json;
use crate::output_by_format_result;
use somnio_core::dream::Dream;
use somnio_core::error::{Result, SomnioError};
use somnio_core::store::Store;

fn print_dream(dream: &Dream) {
    println!("{}", dream.title);
    println!("id: {}", dream.id);
    println!("user: {}", dream.user_id);
    if let Some(date) = dream.date {
        println!("date: {}", date);
    }
    if let Some(emotion) = &dream.emotion {
        println!("emotion: {}", emotion);
    }
    if !dream.tags.is_empty() {
        println!("tags: {}", dream.tags.join(", "));
    }
    println!("visibility: {}", if dream.is_public { "public" } else { "private" });
    if dream.lucid_dream {
        println!("lucid: yes");
    }
    if dream.recurring {
        println!("recurring: yes");
    }
    if !dream.description.is_empty() {
        println!();
        println!("{}", dream.description);
    }
}

/// Execute the show command
pub fn execute(cli: &Cli, store: &Store, id: &str) -> Result<()> {
    let dream = store
        .db()
        .get_dream(id)?
        .ok_or_else(|| SomnioError::not_found("dream", id))?;

    output_by_format_result!(cli.format,
        json => { print_json(&dream) },
        human => { print_dream(&dream); }
    )
}
