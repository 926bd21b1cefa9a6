use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lineage",
    about = "Lineage auction engine: run operations against a ledger snapshot",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger snapshot file; created on first write.
    #[arg(long, global = true, default_value = "lineage-ledger.json")]
    pub state: PathBuf,

    /// Engine configuration (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one operation and commit its writes
    Invoke(InvokeArgs),
    /// List available operations and their argument counts
    Operations,
    /// Show ledger height and stored keys
    Status,
}

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Operation name, e.g. `makeOffer`
    pub operation: String,
    /// String arguments passed to the operation
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
