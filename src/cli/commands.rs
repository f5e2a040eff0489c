//! Main CLI commands enum

use clap::Subcommand;

use crate::cli::args::{
    AddArgs, LinkArgs, ListArgs, NetworkArgs, SimilarArgs, ThresholdArgs, UpdateArgs,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new somnio store
    Init,

    /// Record a new dream and link it to similar public dreams
    Add(AddArgs),

    /// Update fields of a dream and refresh its links
    Update(UpdateArgs),

    /// Delete a dream and its links
    Delete {
        /// Dream ID
        id: String,
    },

    /// List dreams
    List(ListArgs),

    /// Show a dream
    Show {
        /// Dream ID
        id: String,
    },

    /// Show stored links of a dream, strongest first
    Similar(SimilarArgs),

    /// Explain the similarity score between two dreams
    Explain {
        /// First dream ID
        a: String,

        /// Second dream ID
        b: String,
    },

    /// Link two dreams by hand
    Link(LinkArgs),

    /// Recompute every link from scratch (default threshold 0.3)
    Recalculate(ThresholdArgs),

    /// Show public dreams with their strong connections
    Network(NetworkArgs),
}
