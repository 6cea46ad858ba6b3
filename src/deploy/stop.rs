// ABOUTME: Stop a running application on a single foundation.
// ABOUTME: Undo starts the application again so partial stops unwind cleanly.

use super::start::{clean_up, login};
use super::{Action, DeployError, DeploymentInfo};
use crate::courier::Courier;
use crate::transcript::Transcript;
use crate::types::FoundationUrl;
use async_trait::async_trait;
use std::sync::Arc;

/// The stop flavor of [`Action`]. One per foundation.
pub struct Stopper {
    courier: Box<dyn Courier>,
    info: Arc<DeploymentInfo>,
    transcript: Transcript,
    foundation: FoundationUrl,
}

impl Stopper {
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
impl Action for Stopper {
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

        tracing::debug!(app, foundation = %self.foundation, "stopping application");
        match self.courier.stop(app).await {
            Ok(output) => {
                self.transcript.write(&output);
                tracing::info!(app, "stopped application");
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                tracing::error!(app, "could not stop application");
                Err(DeployError::StopApplication {
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
        tracing::error!(app, foundation = %self.foundation, "starting application again");

        match self.courier.start(app).await {
            Ok(output) => {
                self.transcript.write(&output);
                Ok(())
            }
            Err(e) => {
                self.transcript.write(&e.output);
                Err(DeployError::StartApplication {
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
