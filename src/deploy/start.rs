// ABOUTME: Start an existing application on a single foundation.
// ABOUTME: Undo stops the application again so partial starts unwind cleanly.

use super::{Action, DeployError, DeploymentInfo};
use crate::courier::Courier;
use crate::transcript::Transcript;
use crate::types::FoundationUrl;
use async_trait::async_trait;
use std::sync::Arc;

/// The start flavor of [`Action`]. One per foundation.
pub struct Starter {
    courier: Box<dyn Courier>,
    info: Arc<DeploymentInfo>,
    transcript: Transcript,
    foundation: FoundationUrl,
}

impl Starter {
    pub fn new(
        courier: Box<dyn Courier>,
        info: Arc<DeploymentInfo>,
        transcript: Transcript,
        foundation: FoundationUrl,
    ) -> Self {
        Self {
            courier,
            info,
            transcript,
            foundation,
        }
    }
}

#[async_trait]
impl Action for Starter {
    async fn verify(&mut self) -> Result<(), DeployError> {
        Ok(())
    }

    async fn initially(&mut self) -> Result<(), DeployError> {
        login(
            self.courier.as_ref(),
            &self.info,
            &self.transcript,
            &self.foundation,
        )
        .await
    }

    async fn execute(&mut self) -> Result<(), DeployError> {
        let app = self.info.app_name.as_str();

        if !self.courier.exists(app).await {
            tracing::error!(app, foundation = %self.foundation, "application not found");
            return Err(DeployError::AppNotFound {
                app_name: app.to_string(),
                foundation: self.foundation.clone(),
            });
        }

        tracing::debug!(app, foundation = %self.foundation, "starting application");
        match self.courier.start(app).await {
            Ok(output) => {
                self.transcript.write(&output);
                tracing::info!(app, "started application");
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!(app, "could not start application");
                Err(DeployError::StartApplication {
                    app_name: app.to_string(),
                    source: e,
                })
            }
        }
    }

    async fn success(&mut self) -> Result<(), DeployError> {
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), DeployError> {
        let app = self.info.app_name.as_str();
        tracing::error!(app, foundation = %self.foundation, "stopping application again");

        match self.courier.stop(app).await {
            Ok(output) => {
                self.transcript.write(&output);
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                Err(DeployError::StopApplication {
                    app_name: app.to_string(),
                    source: e,
                })
            }
        }
    }

    async fn finally(&mut self) -> Result<(), DeployError> {
        clean_up(
            self.courier.as_ref(),
            &self.transcript,
            &self.foundation,
        )
        .await
    }
}

/// Shared login step for the start/stop flavors.
pub(super) async fn login(
    courier: &dyn Courier,
    info: &DeploymentInfo,
    transcript: &Transcript,
    foundation: &FoundationUrl,
) -> Result<(), DeployError> {
    tracing::debug!(
        foundation = %foundation,
        username = %info.username,
        org = %info.organization,
        space = %info.space,
        "logging into foundation"
    );

    let logged_in = courier
        .login(
            foundation,
            &info.username,
            &info.password,
            &info.organization,
            &info.space,
            info.skip_ssl,
        )
        .await;

    match logged_in {
        Ok(output) => {
            transcript.write(&output);
            tracing::info!(foundation = %foundation, "logged into foundation");
            Ok(())
        }
        Err(e) => {
            transcript.write(&e.output);
            tracing::error!(foundation = %foundation, "could not log in");
            Err(DeployError::Login {
                foundation: foundation.clone(),
                source: e,
            })
        }
    }
}

/// Shared session teardown for the start/stop flavors.
pub(super) async fn clean_up(
    courier: &dyn Courier,
    transcript: &Transcript,
    foundation: &FoundationUrl,
) -> Result<(), DeployError> {
    match courier.clean_up().await {
        Ok(output) => {
            transcript.write(&output);
            Ok(())
        }
        Err(e) => {
            transcript.write(&e.output);
            Err(DeployError::CleanUp {
                foundation: foundation.clone(),
                source: e,
            })
        }
    }
}
