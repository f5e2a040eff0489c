//! `somnio update` command - change a dream and refresh its links

use chrono::Utc;

use super::add::finish_background;
use crate::cli::args::UpdateArgs;
use crate::cli::Cli;
use crate::commands::dispatch::synchronizer;
use crate::commands::format::{dream_line, print_json};
use crate::output_by_format_result;
use somnio_core::dream::{DreamUpdate, Emotion};
use somnio_core::error::{Result, SomnioError};
use somnio_core::store::Store;

fn build_update(args: &UpdateArgs) -> DreamUpdate {
    let tags = if args.clear_tags {
        Some(Vec::new())
    } else {
        args.tag.clone()
    };

    DreamUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        tags,
        emotion: args.emotion.as_deref().map(Emotion::from),
        is_public: args.public,
        date: args.date,
        lucid_dream: args.lucid,
        recurring: args.recurring,
    }
}

/// Execute the update command
pub fn execute(cli: &Cli, store: &Store, args: &UpdateArgs) -> Result<()> {
    let update = build_update(args);
    if update.is_empty() {
        return Err(SomnioError::UsageError(
            "nothing to update: pass at least one field".to_string(),
        ));
    }
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(SomnioError::invalid_input("title", "(empty)"));
    }

    let dream = store
        .db()
        .update_dream(&args.id, &update, Utc::now())?
        .ok_or_else(|| SomnioError::not_found("dream", &args.id))?;

    output_by_format_result!(cli.format,
        json => { print_json(&dream) },
        human => {
            if !cli.quiet {
                println!("Updated {}", dream_line(&dream));
            }
        }
    )?;

    finish_background(synchronizer(store).on_dream_updated(&args.id, &update, &dream));
    Ok(())
}
