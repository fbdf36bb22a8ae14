use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rekey", about = "Rename an avatar parameter everywhere it is used")]
pub struct Cli {
    /// Optional scene file (launches TUI)
    pub scene: Option<PathBuf>,

    /// Avatar to work on when the scene holds several
    #[arg(long, global = true)]
    pub avatar: Option<String>,

    /// Config file (default: ~/.config/rekey/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the avatar's parameters
    List {
        /// Path to scene file (.toml)
        scene: PathBuf,
    },
    /// Show the menu pages that reference a parameter
    Refs {
        /// Path to scene file (.toml)
        scene: PathBuf,
        /// Parameter name
        parameter: String,
    },
    /// Rename a parameter in the directory, menus and behavior graphs
    Rename(RenameArgs),
}

#[derive(clap::Args)]
pub struct RenameArgs {
    /// Path to scene file (.toml)
    pub scene: PathBuf,

    /// Parameter to rename
    pub parameter: String,

    /// New parameter name
    pub new_name: String,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Report what would change without saving
    #[arg(long)]
    pub dry_run: bool,

    /// Write the result here instead of overwriting the scene
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
