// ABOUTME: Entry point for the convoy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use convoy::config;
use convoy::error::Error;
use convoy::output::{Output, OutputMode};
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Determine output mode
    let output_mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Arc::new(Output::new(output_mode));

    if let Err(e) = run(cli, output.clone()).await {
        output.error(&e.to_string());
        handle_error(&e);
    }
}

/// Map error kinds to process exit codes with helpful hints.
fn handle_error(e: &Error) -> ! {
    match e {
        Error::ConfigNotFound(path) => {
            eprintln!("       Tip: Run 'convoy init' to create convoy.yml in {}", path.display());
            std::process::exit(6);
        }
        Error::EnvironmentNotFound(name) => {
            eprintln!("       Tip: Add an environment named '{name}' to convoy.yml");
            std::process::exit(3);
        }
        Error::BasicAuth => {
            eprintln!("       Tip: This environment requires request credentials");
            std::process::exit(4);
        }
        Error::MissingEnvVar(var) => {
            eprintln!("       Tip: Export {var} before deploying");
            std::process::exit(5);
        }
        Error::AlreadyExists(_) => {
            eprintln!("       Tip: Use --force to overwrite");
            std::process::exit(2);
        }
        _ => std::process::exit(1),
    }
}

async fn run(cli: Cli, output: Arc<Output>) -> Result<(), Arc<Error>> {
    match cli.command {
        Commands::Init { environment, force } => {
            let cwd = env::current_dir().map_err(|e| Arc::new(Error::Io(e)))?;
            config::init_config(&cwd, environment.as_deref(), force).map_err(Arc::new)?;
            output.success("Created convoy.yml");
            Ok(())
        }
        Commands::Push {
            target,
            path,
            manifest,
            instances,
        } => {
            commands::push(
                cli.config.as_ref(),
                &target,
                path,
                manifest,
                instances,
                output,
            )
            .await
        }
        Commands::Start { target } => commands::start(cli.config.as_ref(), &target, output).await,
        Commands::Stop { target } => commands::stop(cli.config.as_ref(), &target, output).await,
    }
}
