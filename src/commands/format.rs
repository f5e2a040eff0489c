//! Shared rendering helpers for command output

use serde::Serialize;
use somnio_core::dream::Dream;
use somnio_core::error::Result;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary: id, title, tags and emotion
pub fn dream_line(dream: &Dream) -> String {
    let mut line = format!("{}  {}", dream.id, dream.title);
    if !dream.tags.is_empty() {
        line.push_str(&format!("  [{}]", dream.tags.join(", ")));
    }
    if let Some(emotion) = &dream.emotion {
        line.push_str(&format!("  ({})", emotion));
    }
    if !dream.is_public {
        line.push_str("  private");
    }
    line
}

/// Score with three decimals, as stored
pub fn score(value: f64) -> String {
    format!("{:.3}", value)
}
