//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Name-addressable node trees: directories, files and links with recursive search
#[derive(Parser, Debug)]
#[command(name = "nodetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Layout file describing the tree (default: `layout` from config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub layout: Option<PathBuf>,

    /// Extra config file, applied on top of the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree
    Show {
        /// Show kinds, file states and link targets
        #[arg(short, long)]
        annotate: bool,
    },

    /// Find nodes by base name
    Find {
        /// Base name to look for
        name: String,
        /// Start at the node with this layout label (default: root)
        #[arg(short, long)]
        from: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
