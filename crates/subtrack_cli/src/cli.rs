//! Command-line surface.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "subtrack", about = "Track recurring subscriptions", version)]
pub struct Cli {
    /// SQLite file holding the subscription list.
    #[arg(long, global = true, env = "SUBTRACK_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "SUBTRACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotating log files.
    #[arg(long, global = true, env = "SUBTRACK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Show logged subscriptions with their positions.
    List,
    /// Log a new subscription.
    Add {
        #[arg(long)]
        name: String,
        /// Amount as typed; input that is not a number is ignored.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Renewal date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete subscriptions by position, as shown by `list`.
    Remove {
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Schedule a test notification.
    NotifyTest,
    /// Print the core library version.
    Version,
}

impl Command {
    /// Stable name for log events; never includes user input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::NotifyTest => "notify_test",
            Self::Version => "version",
        }
    }
}
