// ABOUTME: Command handlers shared plumbing.
// ABOUTME: Builds the controller stack and the progress event subscriptions.

mod lifecycle;
mod push;

pub use lifecycle::{start, stop};
pub use push::push;

use crate::cli::TargetArgs;
use convoy::config::Config;
use convoy::controller::Controller;
use convoy::courier::ShellCourierFactory;
use convoy::error::Error;
use convoy::events::{EventBus, Failure, Operation, Started, Success};
use convoy::fetcher::LocalFetcher;
use convoy::output::Output;
use convoy::transcript::Transcript;
use convoy::types::{AppName, CfContext};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the foundation CLI driven by the shell courier. Overridable
/// for wrappers and tests.
const COURIER_BINARY_VAR: &str = "CONVOY_COURIER_BINARY";

pub(crate) struct Prepared {
    pub controller: Controller,
    pub bus: Arc<EventBus>,
    pub context: CfContext,
    pub transcript: Transcript,
}

/// Load config and assemble the controller stack for one command.
pub(crate) fn prepare(
    config_path: Option<&PathBuf>,
    target: &TargetArgs,
) -> Result<Prepared, Arc<Error>> {
    let config = match config_path {
        Some(path) => Config::load(path),
        None => {
            let cwd = env::current_dir().map_err(|e| Arc::new(Error::Io(e)))?;
            Config::discover(&cwd)
        }
    }
    .map_err(Arc::new)?;

    let application = AppName::new(&target.app)
        .map_err(|e| Arc::new(Error::InvalidConfig(e.to_string())))?;

    let context = CfContext {
        organization: target.org.clone(),
        space: target.space.clone(),
        application,
        environment: target.environment.clone(),
    };

    let binary = env::var(COURIER_BINARY_VAR).unwrap_or_else(|_| "cf".to_string());
    let couriers = Arc::new(ShellCourierFactory::new(binary, config.command_timeout));
    let bus = Arc::new(EventBus::new());
    let controller = Controller::new(config, bus.clone(), couriers, Arc::new(LocalFetcher));

    Ok(Prepared {
        controller,
        bus,
        context,
        transcript: Transcript::new(),
    })
}

/// Subscribe progress reporting for one operation's envelope events.
pub(crate) fn register_progress<K: Operation>(bus: &EventBus, output: Arc<Output>) {
    {
        let output = output.clone();
        bus.subscribe::<Started<K>, _>(move |event| {
            output.progress(&format!(
                "  → {} of {} started on {} foundation(s)",
                K::NAME,
                event.envelope.context.application,
                event.envelope.environment.foundations.len()
            ));
            Ok(())
        });
    }
    {
        let output = output.clone();
        bus.subscribe::<Success<K>, _>(move |event| {
            output.progress(&format!(
                "  ✓ {} of {} succeeded",
                K::NAME,
                event.envelope.context.application
            ));
            Ok(())
        });
    }
    bus.subscribe::<Failure<K>, _>(move |event| {
        output.progress(&format!(
            "  ✗ {} of {} failed: {}",
            K::NAME,
            event.envelope.context.application,
            event.error
        ));
        Ok(())
    });
}
