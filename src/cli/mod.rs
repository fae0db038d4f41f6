//! Command-line interface.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "molt",
    version,
    about = "Retrieve and delete a user's old posts within platform rate limits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub robot: bool,

    /// Preview actions without calling mutating endpoints or touching state
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// State directory override
    #[arg(long, global = true, value_name = "PATH")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one scheduled pass; the action comes from --mode or the calendar
    Run(commands::run::RunArgs),

    /// Fetch post IDs from the timeline into the pending queue
    Retrieve(commands::retrieve::RetrieveArgs),

    /// Delete queued posts, up to the daily budget
    Delete(commands::delete::DeleteArgs),

    /// One-time bootstrap: verify credentials and seed the queue
    Init(commands::init::InitArgs),

    /// Show queue depth and the last-run marker
    Status,

    /// Obtain an access token via the PIN-based authorize flow
    Authorize,
}
