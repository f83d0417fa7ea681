use crate::storage::StorageKind;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rworklog
#[derive(Parser)]
#[command(
    name = "rworklog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A conversational work log: hourly prompts, date-bucketed logs, reports",
    long_about = None
)]
pub struct Cli {
    /// Override the storage directory
    #[arg(global = true, long = "data-dir")]
    pub data_dir: Option<String>,

    /// Override the storage backend
    #[arg(global = true, long = "storage", value_enum)]
    pub storage: Option<StorageKind>,

    /// Chat identity of the owner
    #[arg(global = true, long = "owner", env = "RWORKLOG_OWNER")]
    pub owner: Option<i64>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the storage
    Init,

    /// Inspect the configuration file
    Config {
        /// Print the resolved configuration
        #[arg(long = "print", help = "Print the resolved configuration")]
        print_config: bool,

        /// Report fields missing from the configuration file
        #[arg(long = "check", help = "Report fields missing from the configuration file")]
        check: bool,
    },

    /// Start the bot on the console transport (stdin/stdout)
    Run,

    /// Print the dates that have a log bucket
    Dates,

    /// Print the time report for a date
    List {
        /// Date (YYYY-MM-DD)
        #[arg(long = "date", conflicts_with = "today")]
        date: Option<String>,

        /// Report for today (default)
        #[arg(long = "today")]
        today: bool,
    },

    /// Delete all logs of a date
    Del {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Skip the confirmation prompt
        #[arg(long = "force", short = 'f')]
        force: bool,
    },
}
