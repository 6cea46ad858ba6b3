// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Blue/green application deployment across multi-foundation environments")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON lines output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file (default: convoy.yml in the
    /// current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// What to deploy and where.
#[derive(Args)]
pub struct TargetArgs {
    /// Application name
    #[arg(long)]
    pub app: String,

    /// Organization the application belongs to
    #[arg(long)]
    pub org: String,

    /// Space the application lives in
    #[arg(long)]
    pub space: String,

    /// Target environment from the configuration file
    #[arg(short, long)]
    pub environment: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new convoy.yml configuration file
    Init {
        /// Environment name to use in the template
        #[arg(long)]
        environment: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Push a new build through the blue/green lifecycle
    Push {
        #[command(flatten)]
        target: TargetArgs,

        /// Directory holding the deployable artifact
        #[arg(short, long)]
        path: PathBuf,

        /// Application manifest to ship with the artifact
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Instance count, overriding the environment default
        #[arg(short, long)]
        instances: Option<u16>,
    },

    /// Start the application on every foundation
    Start {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Stop the application on every foundation
    Stop {
        #[command(flatten)]
        target: TargetArgs,
    },
}
