//! CLI argument parsing for ratewalk

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rw")]
#[command(author, version, about = "Rate a media collection in a full-coverage pseudo-random walk", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Session key (namespaces walk state and ratings)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Glob pattern for the items to rate, e.g. 'recordings/*.wav'
    #[arg(short, long)]
    pub items: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show walk position and saved/remaining counts
    Status,

    /// Show the current item and its rating, if any
    Show,

    /// Step to the next item
    Next,

    /// Step back to the previous item
    Prev,

    /// Step to the next unrated item
    Unrated,

    /// Rate the current item
    Rate {
        /// Rating fields as a JSON object, e.g. '{"score": 4}'
        #[arg(required = true)]
        fields: String,
    },

    /// Print every stored rating
    Export,

    /// Delete all ratings and restart the count (keeps the walk position)
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}
