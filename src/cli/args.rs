//! Argument structures for dream commands

use chrono::NaiveDate;
use clap::Args;

use super::parse::{parse_date, parse_similarity};

/// Arguments for the add command
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Dream title
    pub title: String,

    /// Dream description
    #[arg(long, short, default_value = "")]
    pub description: String,

    /// Tags (can be specified multiple times)
    #[arg(long, short, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Emotion label (happy, anxious, peaceful, confused, excited, sad, curious, fearful, neutral)
    #[arg(long, short)]
    pub emotion: Option<String>,

    /// Keep the dream private; private dreams are never linked
    #[arg(long)]
    pub private: bool,

    /// Owner of the dream
    #[arg(long, short, env = "SOMNIO_USER", default_value = "local")]
    pub user: String,

    /// Date the dream took place (YYYY-MM-DD, default today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Mark as a lucid dream
    #[arg(long)]
    pub lucid: bool,

    /// Mark as a recurring dream
    #[arg(long)]
    pub recurring: bool,
}

/// Arguments for the update command; only given fields change
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Dream ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long, short)]
    pub description: Option<String>,

    /// Replace tags (can be specified multiple times)
    #[arg(long, short, action = clap::ArgAction::Append)]
    pub tag: Option<Vec<String>>,

    /// Remove all tags
    #[arg(long, conflicts_with = "tag")]
    pub clear_tags: bool,

    /// New emotion label
    #[arg(long, short)]
    pub emotion: Option<String>,

    /// Change visibility
    #[arg(long, value_name = "BOOL")]
    pub public: Option<bool>,

    /// New date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Set or clear the lucid flag
    #[arg(long, value_name = "BOOL")]
    pub lucid: Option<bool>,

    /// Set or clear the recurring flag
    #[arg(long, value_name = "BOOL")]
    pub recurring: Option<bool>,
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only public dreams
    #[arg(long)]
    pub public: bool,

    /// Only dreams owned by this user
    #[arg(long, short)]
    pub user: Option<String>,
}

/// Arguments for the similar command
#[derive(Args, Debug, Clone)]
pub struct SimilarArgs {
    /// Dream ID
    pub id: String,

    /// Minimum similarity (0.0-1.0, default from config: 0.7)
    #[arg(long, value_parser = parse_similarity)]
    pub min: Option<f64>,
}

/// Arguments for the link command
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Source dream ID
    pub from: String,

    /// Target dream ID
    pub to: String,

    /// Similarity score (0.0-1.0)
    #[arg(long, short, value_parser = parse_similarity)]
    pub similarity: f64,

    /// Shared theme (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub theme: Vec<String>,
}

/// Arguments for the network command
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Minimum similarity (0.0-1.0, default from config)
    #[arg(long, value_parser = parse_similarity, conflicts_with = "links")]
    pub min: Option<f64>,

    /// List every stored link between public dreams with its shared themes
    #[arg(long)]
    pub links: bool,
}

/// Arguments for commands that only take a threshold
#[derive(Args, Debug, Clone)]
pub struct ThresholdArgs {
    /// Minimum similarity (0.0-1.0, default from config)
    #[arg(long, value_parser = parse_similarity)]
    pub min: Option<f64>,
}
