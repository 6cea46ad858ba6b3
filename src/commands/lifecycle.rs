// ABOUTME: Start and stop command implementations.
// ABOUTME: Thin wrappers over the lifecycle controller flavors.

use super::{prepare, register_progress};
use crate::cli::TargetArgs;
use convoy::controller::LifecycleRequest;
use convoy::error::Error;
use convoy::events::{EventData, Start, Stop};
use convoy::output::Output;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn start(
    config_path: Option<&PathBuf>,
    target: &TargetArgs,
    output: Arc<Output>,
) -> Result<(), Arc<Error>> {
    let prepared = prepare(config_path, target)?;
    register_progress::<Start>(&prepared.bus, output.clone());

    output.start_timer();
    output.progress(&format!(
        "Starting {} in {}",
        target.app, target.environment
    ));

    let request = LifecycleRequest {
        context: prepared.context,
        authorization: None,
        data: EventData::new(),
    };

    let response = prepared
        .controller
        .start(request, &prepared.transcript)
        .await;
    output.transcript(&prepared.transcript.contents());

    match response.error {
        None => {
            output.success("Application started!");
            Ok(())
        }
        Some(error) => Err(error),
    }
}

pub async fn stop(
    config_path: Option<&PathBuf>,
    target: &TargetArgs,
    output: Arc<Output>,
) -> Result<(), Arc<Error>> {
    let prepared = prepare(config_path, target)?;
    register_progress::<Stop>(&prepared.bus, output.clone());

    output.start_timer();
    output.progress(&format!(
        "Stopping {} in {}",
        target.app, target.environment
    ));

    let request = LifecycleRequest {
        context: prepared.context,
        authorization: None,
        data: EventData::new(),
    };

    let response = prepared
        .controller
        .stop(request, &prepared.transcript)
        .await;
    output.transcript(&prepared.transcript.contents());

    match response.error {
        None => {
            output.success("Application stopped!");
            Ok(())
        }
        Some(error) => Err(error),
    }
}
