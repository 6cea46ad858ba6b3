// ABOUTME: Blue/green push against a single foundation.
// ABOUTME: Pushes under a temporary name, then renames into place on commit.

use super::{Action, DeployError, DeploymentInfo};
use crate::courier::Courier;
use crate::events::{Event, EventBus, EventData, PUSH_FINISHED_KIND};
use crate::transcript::Transcript;
use crate::types::{Authorization, CfContext, FoundationUrl};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Emitted from Execute once the new build is pushed and routed,
/// before the deployment-level decision. Subscribers may attach further
/// routes to the temporary application.
///
/// Distinct from the envelope event of the same name: this one fires per
/// foundation and carries the temporary application name.
pub struct PushFinishedEvent {
    pub context: CfContext,
    pub authorization: Authorization,
    pub transcript: Transcript,
    pub foundation: FoundationUrl,
    pub temp_app_name: String,
    pub app_path: PathBuf,
    pub manifest: Option<String>,
    pub healthcheck_endpoint: Option<String>,
    pub data: EventData,
}

impl Event for PushFinishedEvent {
    fn name(&self) -> &'static str {
        "PushFinishedEvent"
    }
}

/// The push flavor of [`Action`]. One per foundation.
pub struct Pusher {
    courier: Box<dyn Courier>,
    info: Arc<DeploymentInfo>,
    bus: Arc<EventBus>,
    transcript: Transcript,
    foundation: FoundationUrl,
    app_path: PathBuf,
}

impl Pusher {
    pub fn new(
        courier: Box<dyn Courier>,
        info: Arc<DeploymentInfo>,
        bus: Arc<EventBus>,
        transcript: Transcript,
        foundation: FoundationUrl,
        app_path: PathBuf,
    ) -> Self {
        Self {
            courier,
            info,
            bus,
            transcript,
            foundation,
            app_path,
        }
    }

    async fn push_application(&self, temp_name: &str) -> Result<(), DeployError> {
        tracing::debug!(
            app = temp_name,
            path = %self.app_path.display(),
            "pushing new build"
        );

        let pushed = self
            .courier
            .push(
                temp_name,
                &self.app_path,
                self.info.app_name.as_str(),
                self.info.instances,
            )
            .await;

        let push_error = match pushed {
            Ok(output) => {
                self.transcript.write(&output);
                tracing::info!(app = temp_name, "successfully deployed new build");
                return Ok(());
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!(app = temp_name, "push failed, fetching application logs");
                e
            }
        };

        match self.courier.logs(temp_name).await {
            Ok(logs) => {
                self.transcript.write(&logs);
                Err(DeployError::Push {
                    app_name: temp_name.to_string(),
                    source: push_error,
                })
            }
            Err(logs_error) => {
                self.transcript.write(&logs_error.output);
                Err(DeployError::GetLogs {
                    app_name: temp_name.to_string(),
                    push_error,
                    logs_error,
                })
            }
        }
    }

    async fn map_temporary_route(&self, temp_name: &str, domain: &str) -> Result<(), DeployError> {
        let hostname = self.info.app_name.as_str();
        tracing::debug!(app = temp_name, domain, "mapping load-balanced route");

        match self.courier.map_route(temp_name, domain, hostname).await {
            Ok(output) => {
                self.transcript.write(&output);
                self.transcript
                    .write_line(&format!("application route created: {hostname}.{domain}"));
                tracing::info!("application route created: {hostname}.{domain}");
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!("could not map {hostname} to {domain}");
                Err(DeployError::MapRoute {
                    hostname: hostname.to_string(),
                    domain: domain.to_string(),
                    source: e,
                })
            }
        }
    }

    async fn unmap_original_route(&self) -> Result<(), DeployError> {
        let Some(domain) = &self.info.domain else {
            return Ok(());
        };
        let app = self.info.app_name.as_str();
        tracing::debug!(app, "unmapping load-balanced route");

        match self.courier.unmap_route(app, domain, app).await {
            Ok(output) => {
                self.transcript.write(&output);
                tracing::info!("unmapped route {app}");
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!("could not unmap {app}");
                Err(DeployError::UnmapRoute {
                    hostname: app.to_string(),
                    domain: domain.clone(),
                    source: e,
                })
            }
        }
    }

    async fn delete_application(&self, name: &str) -> Result<(), DeployError> {
        tracing::debug!(app = name, "deleting application");

        match self.courier.delete(name).await {
            Ok(output) => {
                self.transcript.write(&output);
                tracing::info!(app = name, "deleted application");
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!(app = name, "could not delete application");
                Err(DeployError::Delete {
                    app_name: name.to_string(),
                    source: e,
                })
            }
        }
    }

    async fn rename_new_build_to_original(&self) -> Result<(), DeployError> {
        let from = self.info.temporary_name();
        let to = self.info.app_name.as_str();
        tracing::debug!(%from, %to, "renaming new build");

        match self.courier.rename(&from, to).await {
            Ok(output) => {
                self.transcript.write(&output);
                tracing::info!("renamed {from} to {to}");
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!("could not rename {from} to {to}");
                Err(DeployError::Rename {
                    from,
                    to: to.to_string(),
                    source: e,
                })
            }
        }
    }

    fn push_finished_event(&self, temp_name: &str) -> PushFinishedEvent {
        PushFinishedEvent {
            context: self.info.cf_context(),
            authorization: self.info.authorization(),
            transcript: self.transcript.clone(),
            foundation: self.foundation.clone(),
            temp_app_name: temp_name.to_string(),
            app_path: self.app_path.clone(),
            manifest: self.info.manifest.clone(),
            healthcheck_endpoint: self.info.healthcheck_endpoint.clone(),
            data: self.info.data.clone(),
        }
    }
}

#[async_trait]
impl Action for Pusher {
    async fn verify(&mut self) -> Result<(), DeployError> {
        Ok(())
    }

    async fn initially(&mut self) -> Result<(), DeployError> {
        tracing::debug!(
            foundation = %self.foundation,
            username = %self.info.username,
            org = %self.info.organization,
            space = %self.info.space,
            "logging into foundation"
        );

        let logged_in = self
            .courier
            .login(
                &self.foundation,
                &self.info.username,
                &self.info.password,
                &self.info.organization,
                &self.info.space,
                self.info.skip_ssl,
            )
            .await;

        match logged_in {
            Ok(output) => {
                self.transcript.write(&output);
                tracing::info!(foundation = %self.foundation, "logged into foundation");
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!(foundation = %self.foundation, "could not log in");
                Err(DeployError::Login {
                    foundation: self.foundation.clone(),
                    source: e,
                })
            }
        }
    }

    async fn execute(&mut self) -> Result<(), DeployError> {
        let temp_name = self.info.temporary_name();

        self.push_application(&temp_name).await?;

        if let Some(domain) = self.info.domain.clone() {
            self.map_temporary_route(&temp_name, &domain).await?;
        }

        tracing::debug!("emitting a {PUSH_FINISHED_KIND} event");
        let mut data = self.info.data.clone();
        data.insert(
            "tempAppWithUUID".to_string(),
            serde_json::Value::String(temp_name.clone()),
        );
        data.insert(
            "foundation".to_string(),
            serde_json::Value::String(self.foundation.to_string()),
        );
        self.bus
            .emit_named(PUSH_FINISHED_KIND, data)
            .map_err(DeployError::PushFinishedEventHandler)?;

        let event = self.push_finished_event(&temp_name);
        self.bus
            .emit(&event)
            .map_err(DeployError::PushFinishedEventHandler)?;
        tracing::info!("emitted a {} event", event.name());

        Ok(())
    }

    async fn success(&mut self) -> Result<(), DeployError> {
        if self.courier.exists(self.info.app_name.as_str()).await {
            self.unmap_original_route().await?;
            self.delete_application(self.info.app_name.as_str()).await?;
        }

        self.rename_new_build_to_original().await
    }

    async fn undo(&mut self) -> Result<(), DeployError> {
        if !self.info.enable_rollback {
            tracing::error!(
                "failed to deploy, deployment not rolled back due to enable_rollback=false"
            );
            return self.success().await;
        }

        let temp_name = self.info.temporary_name();
        if self.courier.exists(self.info.app_name.as_str()).await {
            tracing::error!(app = %temp_name, "rolling back deploy");
            self.delete_application(&temp_name).await
        } else {
            tracing::error!(
                app = %self.info.app_name,
                "app did not previously exist: not rolling back"
            );
            self.rename_new_build_to_original().await
        }
    }

    async fn finally(&mut self) -> Result<(), DeployError> {
        match self.courier.clean_up().await {
            Ok(output) => {
                self.transcript.write(&output);
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                Err(DeployError::CleanUp {
                    foundation: self.foundation.clone(),
                    source: e,
                })
            }
        }
    }
}
