// ABOUTME: Factories minting one Action per foundation for each operation kind.
// ABOUTME: Push setup fetches the artifact once; teardown releases the working directory.

use super::{Action, DeployError, DeploymentInfo, Pusher, Starter, Stopper};
use crate::courier::CourierFactory;
use crate::events::EventBus;
use crate::fetcher::{Fetcher, WorkingDir};
use crate::transcript::Transcript;
use crate::types::FoundationUrl;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Mints lifecycle Actions for the coordinator.
///
/// `setup` runs exactly once before any `create`; `teardown` is its
/// paired release and runs after every Action finalized.
#[async_trait]
pub trait ActionCreator: Send {
    /// One-time preparation shared by all foundations.
    async fn setup(&mut self) -> Result<(), DeployError> {
        Ok(())
    }

    /// A fresh Action bound to `foundation`.
    fn create(&self, foundation: &FoundationUrl) -> Result<Box<dyn Action>, DeployError>;

    /// Release whatever `setup` acquired.
    fn teardown(&mut self) {}
}

/// Creator for the blue/green push operation.
pub struct PushCreator {
    info: Arc<DeploymentInfo>,
    bus: Arc<EventBus>,
    couriers: Arc<dyn CourierFactory>,
    fetcher: Arc<dyn Fetcher>,
    source: PathBuf,
    transcript: Transcript,
    workdir: Option<WorkingDir>,
}

impl PushCreator {
    pub fn new(
        info: Arc<DeploymentInfo>,
        bus: Arc<EventBus>,
        couriers: Arc<dyn CourierFactory>,
        fetcher: Arc<dyn Fetcher>,
        source: PathBuf,
        transcript: Transcript,
    ) -> Self {
        Self {
            info,
            bus,
            couriers,
            fetcher,
            source,
            transcript,
            workdir: None,
        }
    }
}

#[async_trait]
impl ActionCreator for PushCreator {
    async fn setup(&mut self) -> Result<(), DeployError> {
        let workdir = self.fetcher.fetch(&self.source).await?;

        // The manifest travels with the request, not the artifact.
        if let Some(manifest) = &self.info.manifest {
            tokio::fs::write(workdir.path().join("manifest.yml"), manifest)
                .await
                .map_err(|e| DeployError::Fetch(e.into()))?;
        }

        tracing::debug!(path = %workdir.path().display(), "artifact staged");
        self.workdir = Some(workdir);
        Ok(())
    }

    fn create(&self, foundation: &FoundationUrl) -> Result<Box<dyn Action>, DeployError> {
        let workdir = self
            .workdir
            .as_ref()
            .expect("setup stages the artifact before any action is created");

        let courier = self
            .couriers
            .session(foundation)
            .map_err(|e| DeployError::Session {
                foundation: foundation.clone(),
                source: e,
            })?;

        Ok(Box::new(Pusher::new(
            courier,
            self.info.clone(),
            self.bus.clone(),
            self.transcript.clone(),
            foundation.clone(),
            workdir.path().to_path_buf(),
        )))
    }

    fn teardown(&mut self) {
        // Dropping the WorkingDir removes the staged artifact.
        self.workdir = None;
    }
}

/// Creator for the start operation.
pub struct StartCreator {
    info: Arc<DeploymentInfo>,
    couriers: Arc<dyn CourierFactory>,
    transcript: Transcript,
}

impl StartCreator {
    pub fn new(
        info: Arc<DeploymentInfo>,
        couriers: Arc<dyn CourierFactory>,
        transcript: Transcript,
    ) -> Self {
        Self {
            info,
            couriers,
            transcript,
        }
    }
}

#[async_trait]
impl ActionCreator for StartCreator {
    fn create(&self, foundation: &FoundationUrl) -> Result<Box<dyn Action>, DeployError> {
        let courier = self
            .couriers
            .session(foundation)
            .map_err(|e| DeployError::Session {
                foundation: foundation.clone(),
                source: e,
            })?;

        Ok(Box::new(Starter::new(
            courier,
            self.info.clone(),
            self.transcript.clone(),
            foundation.clone(),
        )))
    }
}

/// Creator for the stop operation.
pub struct StopCreator {
    info: Arc<DeploymentInfo>,
    couriers: Arc<dyn CourierFactory>,
    transcript: Transcript,
}

impl StopCreator {
    pub fn new(
        info: Arc<DeploymentInfo>,
        couriers: Arc<dyn CourierFactory>,
        transcript: Transcript,
    ) -> Self {
        Self {
            info,
            couriers,
            transcript,
        }
    }
}

#[async_trait]
impl ActionCreator for StopCreator {
    fn create(&self, foundation: &FoundationUrl) -> Result<Box<dyn Action>, DeployError> {
        let courier = self
            .couriers
            .session(foundation)
            .map_err(|e| DeployError::Session {
                foundation: foundation.clone(),
                source: e,
            })?;

        Ok(Box::new(Stopper::new(
            courier,
            self.info.clone(),
            self.transcript.clone(),
            foundation.clone(),
        )))
    }
}
