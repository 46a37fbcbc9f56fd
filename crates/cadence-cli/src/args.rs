use std::path::PathBuf;

use cadence_core::{StepId, store::Backend};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use jiff::civil::Date;

/// Guided routine planner
///
/// Cadence categorizes the steps of a routine by how recently they were
/// performed, lets you adjust the selection, and walks you through the
/// chosen steps one at a time, recording what you did.
#[derive(Parser)]
#[command(version, about, name = "cadence")]
pub struct Args {
    /// Path to the data file. Defaults to $XDG_DATA_HOME/cadence/cadence.db
    /// (or cadence.json with the json backend)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Storage backend for sessions and selections
    #[arg(long, global = true, value_enum, default_value_t = BackendArg::Sqlite)]
    pub backend: BackendArg,

    /// JSON file with step definitions, replacing the built-in catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Act as this user and remember the name
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Days an optional step stays recommended after being performed
    #[arg(long, global = true)]
    pub recent_days: Option<u32>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Cadence CLI
#[derive(Subcommand)]
pub enum Commands {
    /// List every step in the catalog
    Steps,
    /// Show today's categorized plan without starting
    #[command(alias = "p")]
    Plan(SelectionArgs),
    /// Commit today's selection and walk through it
    #[command(alias = "s")]
    Start(SelectionArgs),
    /// Show how often each step was performed
    History,
    /// List recorded sessions
    Sessions(SessionsArgs),
    /// Show or set the remembered user name
    Whoami(WhoamiArgs),
}

/// Adjustments to the default selection.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct SelectionArgs {
    /// Optional steps to include (comma separated ids)
    #[arg(long, value_delimiter = ',')]
    pub add: Vec<StepId>,

    /// Steps to leave out (comma separated ids); required steps stay
    #[arg(long, value_delimiter = ',')]
    pub remove: Vec<StepId>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SessionsArgs {
    /// Only sessions completed on this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<Date>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct WhoamiArgs {
    /// Name to remember
    pub name: Option<String>,
}

/// Storage backend choices.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Sqlite,
    Json,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sqlite => Backend::Sqlite,
            BackendArg::Json => Backend::Json,
        }
    }
}
