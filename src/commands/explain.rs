//! `somnio explain` command

use crate::cli::Cli;
use crate::commands::dispatch::synchronizer;
use crate::commands::format::{print_json, score};
use crate::output_by_format_result;
use somnio_core::error::Result;
use somnio_core::similarity::SimilarityExplanation;
use somnio_core::store::Store;

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn print_explanation(a: &str, b: &str, explanation: &SimilarityExplanation) {
    println!("{} ~ {}: {}", a, b, score(explanation.score));
    println!(
        "  tags      {}  shared: {}",
        score(explanation.tag_similarity),
        list_or_none(&explanation.shared_tags)
    );
    println!(
        "  keywords  {}  shared: {}",
        score(explanation.keyword_similarity),
        list_or_none(&explanation.shared_keywords)
    );
    println!(
        "  emotion   {}{}",
        score(explanation.emotion_match),
        if explanation.same_emotion { "  (same)" } else { "" }
    );
}

/// Execute the explain command
pub fn execute(cli: &Cli, store: &Store, a: &str, b: &str) -> Result<()> {
    let explanation = synchronizer(store).explain(a, b)?;

    output_by_format_result!(cli.format,
        json => { print_json(&explanation) },
        human => { print_explanation(a, b, &explanation); }
    )
}
