use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tick", about = concat!("tick v", env!("CARGO_PKG_VERSION"), " - a prioritized todo list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $TICKLIST_DIR or the
    /// platform data directory)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log debug detail to the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List todos in priority order
    List(ListArgs),
    /// Add a todo
    Add(AddArgs),
    /// Toggle a todo between pending and completed
    Flag(PositionArgs),
    /// Delete a todo
    Rm(PositionArgs),
    /// Change a todo's priority (negative raises it)
    Prio(PrioArgs),
    /// Print the note attached to a todo
    Note(PositionArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only pending todos
    #[arg(long, conflicts_with = "completed")]
    pub pending: bool,
    /// Only completed todos
    #[arg(long)]
    pub completed: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text
    pub message: String,
    /// Priority, 1 (highest) to 9 (lowest)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub priority: u8,
    /// Attach a note with this text
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args)]
pub struct PositionArgs {
    /// Position as shown by `tick list` (1-based)
    pub position: usize,
}

#[derive(Args)]
pub struct PrioArgs {
    /// Position as shown by `tick list` (1-based)
    pub position: usize,
    /// Amount to add to the priority number
    #[arg(allow_negative_numbers = true)]
    pub delta: i32,
}
