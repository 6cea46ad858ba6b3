// ABOUTME: The merged, read-only description of one deployment.
// ABOUTME: Context, environment settings, credentials, and the deployment id in one place.

use crate::config::Environment;
use crate::events::EventData;
use crate::types::{AppName, Authorization, CfContext, DeploymentId};
use std::collections::HashMap;

/// Suffix inserted between the application name and the deployment id
/// when pushing the new build.
pub const TEMPORARY_NAME_SUFFIX: &str = "-new-build-";

/// Everything an Action needs to know about its deployment.
///
/// Assembled once by the controller from the request context, the
/// resolved environment, and the resolved credentials; shared read-only
/// across all per-foundation Actions.
#[derive(Debug, Clone)]
pub struct DeploymentInfo {
    pub organization: String,
    pub space: String,
    pub app_name: AppName,
    pub environment: String,

    pub username: String,
    pub password: String,

    pub id: DeploymentId,
    pub domain: Option<String>,
    pub skip_ssl: bool,
    pub enable_rollback: bool,
    pub instances: u16,

    pub manifest: Option<String>,
    pub healthcheck_endpoint: Option<String>,
    pub custom_params: HashMap<String, serde_json::Value>,
    pub data: EventData,
}

impl DeploymentInfo {
    pub fn new(
        context: &CfContext,
        environment: &Environment,
        authorization: &Authorization,
        id: DeploymentId,
        data: EventData,
    ) -> Self {
        Self {
            organization: context.organization.clone(),
            space: context.space.clone(),
            app_name: context.application.clone(),
            environment: context.environment.clone(),
            username: authorization.username.clone(),
            password: authorization.password.clone(),
            id,
            domain: environment.domain.clone(),
            skip_ssl: environment.skip_ssl,
            enable_rollback: environment.enable_rollback,
            instances: environment.instances,
            manifest: None,
            healthcheck_endpoint: None,
            custom_params: environment.custom_params.clone(),
            data,
        }
    }

    /// The name the new build is pushed under on every foundation.
    pub fn temporary_name(&self) -> String {
        format!("{}{}{}", self.app_name, TEMPORARY_NAME_SUFFIX, self.id)
    }

    pub fn cf_context(&self) -> CfContext {
        CfContext {
            organization: self.organization.clone(),
            space: self.space.clone(),
            application: self.app_name.clone(),
            environment: self.environment.clone(),
        }
    }

    pub fn authorization(&self) -> Authorization {
        Authorization::new(self.username.clone(), self.password.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonempty::NonEmpty;
    use crate::types::FoundationUrl;

    fn sample() -> DeploymentInfo {
        let context = CfContext {
            organization: "retail".into(),
            space: "production".into(),
            application: AppName::new("shop").unwrap(),
            environment: "prod".into(),
        };
        let environment = Environment {
            name: "prod".into(),
            domain: Some("apps.example.com".into()),
            skip_ssl: false,
            authenticate: false,
            enable_rollback: true,
            instances: 2,
            foundations: NonEmpty::new(FoundationUrl::new("https://api.example.com").unwrap()),
            custom_params: HashMap::new(),
        };
        DeploymentInfo::new(
            &context,
            &environment,
            &Authorization::new("deployer", "secret"),
            DeploymentId::new(),
            EventData::new(),
        )
    }

    #[test]
    fn temporary_name_embeds_app_and_id() {
        let info = sample();
        let temp = info.temporary_name();
        assert!(temp.starts_with("shop-new-build-"));
        assert!(temp.ends_with(&info.id.to_string()));
    }

    #[test]
    fn context_round_trips() {
        let info = sample();
        let context = info.cf_context();
        assert_eq!(context.application.as_str(), "shop");
        assert_eq!(context.environment, "prod");
    }
}
