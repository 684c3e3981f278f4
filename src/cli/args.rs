//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Map deployment topology from repository manifests
#[derive(Parser, Debug)]
#[command(name = "deploymap")]
#[command(about = "Infer deployment topology and render it as a Mermaid diagram")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a repository and emit its topology
    Map {
        /// Path to the repository to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format (md, mermaid, json)
        #[arg(long)]
        format: Option<String>,

        /// Color theme (auto, dark, light, plain)
        #[arg(long)]
        theme: Option<String>,

        /// Styling level (fancy, plain)
        #[arg(long)]
        style: Option<String>,

        /// Include the legend sub-block
        #[arg(long)]
        legend: bool,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}
