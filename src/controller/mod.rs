// ABOUTME: Operation controllers for push, start, and stop deployments.
// ABOUTME: Resolves environment and credentials, frames the envelope events, runs BlueGreen.

mod guard;

use crate::config::{Config, Environment};
use crate::courier::CourierFactory;
use crate::deploy::{
    ActionCreator, BlueGreen, DeploymentInfo, PushCreator, StartCreator, StopCreator,
};
use crate::diagnostics::ErrorFinder;
use crate::error::{Error, Result};
use crate::events::{Envelope, EventBus, EventData, Operation, Push, Start, Started, Stop};
use crate::fetcher::Fetcher;
use crate::transcript::Transcript;
use crate::types::{Authorization, CfContext, DeploymentId};
use guard::EnvelopeGuard;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outcome of one operation at the request boundary.
#[derive(Debug)]
pub struct DeployResponse {
    /// HTTP-equivalent status code.
    pub status_code: u16,
    pub error: Option<Arc<Error>>,
}

impl DeployResponse {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            error: None,
        }
    }

    pub fn failure(error: Arc<Error>) -> Self {
        Self {
            status_code: error.code(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A blue/green push request.
pub struct PushRequest {
    pub context: CfContext,
    pub authorization: Option<Authorization>,
    pub data: EventData,
    /// Directory holding the deployable artifact.
    pub source: PathBuf,
    pub manifest: Option<String>,
    pub healthcheck_endpoint: Option<String>,
    /// Overrides the environment's instance count when set.
    pub instances: Option<u16>,
}

/// A start or stop request.
pub struct LifecycleRequest {
    pub context: CfContext,
    pub authorization: Option<Authorization>,
    pub data: EventData,
}

/// Drives one operation per request against all foundations of the
/// requested environment.
pub struct Controller {
    config: Config,
    bus: Arc<EventBus>,
    couriers: Arc<dyn CourierFactory>,
    fetcher: Arc<dyn Fetcher>,
    error_finder: ErrorFinder,
    cancellation: CancellationToken,
}

impl Controller {
    pub fn new(
        config: Config,
        bus: Arc<EventBus>,
        couriers: Arc<dyn CourierFactory>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            config,
            bus,
            couriers,
            fetcher,
            error_finder: ErrorFinder::with_default_matchers(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_error_finder(mut self, error_finder: ErrorFinder) -> Self {
        self.error_finder = error_finder;
        self
    }

    /// Cancel in-flight deployments at their next phase boundary.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub async fn push(&self, request: PushRequest, transcript: &Transcript) -> DeployResponse {
        let PushRequest {
            context,
            authorization,
            data,
            source,
            manifest,
            healthcheck_endpoint,
            instances,
        } = request;

        let bus = self.bus.clone();
        let couriers = self.couriers.clone();
        let fetcher = self.fetcher.clone();
        let push_transcript = transcript.clone();

        self.run_operation::<Push, _, _>(
            context,
            authorization,
            data,
            transcript,
            move |mut info| {
                info.manifest = manifest;
                info.healthcheck_endpoint = healthcheck_endpoint;
                if let Some(instances) = instances {
                    info.instances = instances;
                }
                info
            },
            move |info| {
                Box::new(PushCreator::new(
                    info,
                    bus,
                    couriers,
                    fetcher,
                    source,
                    push_transcript,
                ))
            },
        )
        .await
    }

    pub async fn start(
        &self,
        request: LifecycleRequest,
        transcript: &Transcript,
    ) -> DeployResponse {
        let couriers = self.couriers.clone();
        let start_transcript = transcript.clone();

        self.run_operation::<Start, _, _>(
            request.context,
            request.authorization,
            request.data,
            transcript,
            |info| info,
            move |info| Box::new(StartCreator::new(info, couriers, start_transcript)),
        )
        .await
    }

    pub async fn stop(
        &self,
        request: LifecycleRequest,
        transcript: &Transcript,
    ) -> DeployResponse {
        let couriers = self.couriers.clone();
        let stop_transcript = transcript.clone();

        self.run_operation::<Stop, _, _>(
            request.context,
            request.authorization,
            request.data,
            transcript,
            |info| info,
            move |info| Box::new(StopCreator::new(info, couriers, stop_transcript)),
        )
        .await
    }

    async fn run_operation<K, C, B>(
        &self,
        context: CfContext,
        authorization: Option<Authorization>,
        data: EventData,
        transcript: &Transcript,
        configure: C,
        build_creator: B,
    ) -> DeployResponse
    where
        K: Operation,
        C: FnOnce(DeploymentInfo) -> DeploymentInfo,
        B: FnOnce(Arc<DeploymentInfo>) -> Box<dyn ActionCreator>,
    {
        let id = DeploymentId::new();
        tracing::debug!(
            operation = K::NAME,
            app = %context.application,
            environment = %context.environment,
            deployment = %id,
            "preparing deployment"
        );

        let environment = match self.resolve_environment(&context.environment) {
            Ok(environment) => environment,
            Err(e) => {
                transcript.write_line(&e.to_string());
                return DeployResponse::failure(Arc::new(e));
            }
        };

        let authorization = match self.resolve_authorization(authorization, &environment) {
            Ok(authorization) => authorization,
            Err(e) => return DeployResponse::failure(Arc::new(e)),
        };

        let info = Arc::new(configure(DeploymentInfo::new(
            &context,
            &environment,
            &authorization,
            id,
            data.clone(),
        )));

        let envelope = Envelope {
            context,
            authorization,
            environment: environment.clone(),
            data,
            transcript: transcript.clone(),
        };

        // From here on, Finished fires no matter how this function exits.
        let mut envelope_guard = EnvelopeGuard::<K>::new(self.bus.clone(), envelope.clone());

        if let Err(event_error) = self.bus.emit(&Started::<K>::new(envelope)) {
            tracing::error!("{event_error}");
            let error = Arc::new(Error::Initialization(event_error));
            envelope_guard.fail(error.clone());
            return DeployResponse::failure(error);
        }

        let mut creator = build_creator(info);
        let coordinator = BlueGreen::with_cancellation(self.cancellation.clone());

        match coordinator.run(creator.as_mut(), &environment).await {
            Ok(()) => {
                envelope_guard.succeed();
                DeployResponse::ok()
            }
            Err(orchestration) => {
                let mut error = Error::Deploy(orchestration);
                // First recognized diagnosis wins over the raw error.
                if let Some(diagnosed) = self.error_finder.annotate(transcript) {
                    error = Error::Diagnosed(diagnosed);
                }
                let error = Arc::new(error);
                envelope_guard.fail(error.clone());
                DeployResponse::failure(error)
            }
        }
    }

    fn resolve_environment(&self, name: &str) -> Result<Environment> {
        self.config
            .environment(name)
            .cloned()
            .ok_or_else(|| Error::EnvironmentNotFound(name.to_string()))
    }

    fn resolve_authorization(
        &self,
        provided: Option<Authorization>,
        environment: &Environment,
    ) -> Result<Authorization> {
        tracing::debug!("checking for basic auth");
        match provided {
            Some(authorization) if !authorization.is_empty() => Ok(authorization),
            _ => {
                if environment.authenticate {
                    return Err(Error::BasicAuth);
                }
                self.config.default_authorization()
            }
        }
    }
}
