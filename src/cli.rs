//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Daybook redirect site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: daybook.toml)
    #[arg(short = 'C', long, default_value = "daybook.toml")]
    pub config: PathBuf,

    /// Log every written file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments of the build command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Static assets directory path (relative to project root)
    #[arg(short, long = "static-dir")]
    pub static_dir: Option<PathBuf>,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Resolve labels against this date (YYYY-MM-DD) instead of the local clock
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Answer searches from fixture files in this directory instead of Notion
    /// (relative to project root)
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Record every search response as a fixture file in this directory
    /// (relative to project root)
    #[arg(long)]
    pub capture: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deletes the output directory if there is one and regenerates every page
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Check the Notion token by fetching the integration's bot user
    Whoami,
}

impl Cli {
    pub const fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } => Some(build_args),
            Commands::Whoami => None,
        }
    }
}
