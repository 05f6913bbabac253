//! CLI argument parsing module for depscan

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Dependency constraint auditor and build-file copy step for Python projects
#[derive(Parser, Debug, Clone)]
#[command(name = "depscan", version, about = "Audit Python dependency constraints")]
pub struct CliArgs {
    /// Project directory containing pyproject.toml
    #[arg(long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compare declared constraints against the latest stable releases
    Scan {
        /// Package index base URL (default: https://pypi.org)
        #[arg(long)]
        index_url: Option<String>,

        /// Per-request timeout in seconds (default: 30)
        #[arg(long)]
        timeout: Option<u64>,

        /// Output results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Copy build files into the build tree, then run the build command
    Build {
        /// Build output root, relative to the project directory
        #[arg(long, default_value = crate::build::DEFAULT_BUILD_LIB)]
        build_lib: PathBuf,

        /// Show what would be copied without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Build command to run afterwards (after `--`)
        #[arg(last = true, action = ArgAction::Append)]
        command: Vec<String>,
    },
}
