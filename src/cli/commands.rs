use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tagpick", about = concat!("tagpick v", env!("CARGO_PKG_VERSION"), " - pick, order and export prompt tags"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this config file instead of searching for tagpick.toml
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep picked tags in memory only; nothing is read or written
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List picked tags in order
    List,
    /// Append tags (duplicates are skipped)
    Add(AddArgs),
    /// Remove a tag
    Remove(RemoveArgs),
    /// Move a tag to a new position
    Mv(MvArgs),
    /// Remove every picked tag
    Clear(ClearArgs),
    /// Print the export string
    Export(ExportArgs),
    /// Query the configured search endpoint
    Search(SearchArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Tag labels, in order
    #[arg(required = true)]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Tag label
    pub tag: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Tag label
    pub tag: String,
    /// Target position (0-indexed; past the end moves to the end)
    #[arg(required_unless_present = "top")]
    pub position: Option<usize>,
    /// Move to the front
    #[arg(long, conflicts_with = "position")]
    pub top: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm clearing
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Separator between tags (default: [export].separator)
    #[arg(short, long)]
    pub separator: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Query text
    pub query: String,
}
