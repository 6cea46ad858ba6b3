// ABOUTME: Push command implementation.
// ABOUTME: Stages the artifact and runs the blue/green controller.

use super::{prepare, register_progress};
use crate::cli::TargetArgs;
use convoy::controller::PushRequest;
use convoy::error::Error;
use convoy::events::{EventData, Push};
use convoy::output::Output;
use std::path::PathBuf;
use std::sync::Arc;

#[allow(clippy::too_many_arguments)]
pub async fn push(
    config_path: Option<&PathBuf>,
    target: &TargetArgs,
    path: PathBuf,
    manifest: Option<PathBuf>,
    instances: Option<u16>,
    output: Arc<Output>,
) -> Result<(), Arc<Error>> {
    let prepared = prepare(config_path, target)?;
    register_progress::<Push>(&prepared.bus, output.clone());

    let manifest = match manifest {
        Some(path) => Some(std::fs::read_to_string(&path).map_err(|e| Arc::new(Error::Io(e)))?),
        None => None,
    };

    output.start_timer();
    output.progress(&format!(
        "Deploying {} to {}",
        target.app, target.environment
    ));

    let request = PushRequest {
        context: prepared.context,
        authorization: None,
        data: EventData::new(),
        source: path,
        manifest,
        healthcheck_endpoint: None,
        instances,
    };

    let response = prepared.controller.push(request, &prepared.transcript).await;
    output.transcript(&prepared.transcript.contents());

    match response.error {
        None => {
            output.success("Deployment complete!");
            Ok(())
        }
        Some(error) => Err(error),
    }
}
