// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: App names, foundation URLs, deployment identifiers, and request context.

mod app_name;
mod context;
mod deployment_id;
mod foundation;

pub use app_name::{AppName, AppNameError};
pub use context::{Authorization, CfContext};
pub use deployment_id::DeploymentId;
pub use foundation::{FoundationUrl, FoundationUrlError};
