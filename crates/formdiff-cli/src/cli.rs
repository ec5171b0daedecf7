use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "formdiff",
    about = "Classify structural changes between two form definitions",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two form definition files
    Compare(CompareArgs),
    /// Start the HTTP comparison server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    /// The original form definition (JSON)
    pub original: PathBuf,
    /// The modified form definition (JSON)
    pub modified: PathBuf,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on; overrides the config file
    #[arg(long)]
    pub bind: Option<String>,
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
