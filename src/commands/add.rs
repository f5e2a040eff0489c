//! `somnio add` command - record a dream and link it to similar ones

use chrono::Utc;

use crate::cli::args::AddArgs;
use crate::cli::Cli;
use crate::commands::dispatch::synchronizer;
use crate::commands::format::print_json;
use crate::output_by_format_result;
use somnio_core::dream::{generate_dream_id, Emotion, NewDream};
use somnio_core::error::{Result, SomnioError};
use somnio_core::store::Store;
use somnio_core::sync::BackgroundTask;

/// Block on a similarity task so the process does not exit under it
///
/// Failures were already reported by the task's error sink and do not
/// change the outcome of the command.
pub(crate) fn finish_background(task: Option<BackgroundTask>) {
    let Some(task) = task else {
        return;
    };
    let operation = task.operation();
    let dream_id = task.dream_id().to_string();
    match task.wait() {
        Ok(edges) => tracing::debug!(operation, dream_id = %dream_id, edges, "Similarity sync finished"),
        Err(_) => tracing::debug!(operation, dream_id = %dream_id, "Similarity sync did not complete"),
    }
}

/// Execute the add command
pub fn execute(cli: &Cli, store: &Store, args: &AddArgs) -> Result<()> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(SomnioError::invalid_input("title", "(empty)"));
    }

    let input = NewDream {
        title: title.to_string(),
        description: args.description.clone(),
        tags: args.tag.clone(),
        emotion: args.emotion.as_deref().map(Emotion::from),
        is_public: Some(!args.private),
        user_id: args.user.clone(),
        date: args.date,
        lucid_dream: args.lucid,
        recurring: args.recurring,
    };
    if let Some(emotion) = &input.emotion {
        if !emotion.is_known() {
            tracing::warn!(emotion = %emotion, "Emotion is outside the known vocabulary");
        }
    }

    let dream = input.into_dream(generate_dream_id(), Utc::now());
    store.db().insert_dream(&dream)?;

    output_by_format_result!(cli.format,
        json => { print_json(&dream) },
        human => {
            println!("{}", dream.id);
        }
    )?;

    finish_background(synchronizer(store).on_dream_created(&dream));
    Ok(())
}
