// ABOUTME: Unique identifier minted once per deployment.
// ABOUTME: Suffixes the temporary application name on every foundation.

use std::fmt;
use uuid::Uuid;

/// Identifier shared by every Action of one deployment.
///
/// The same id appears in the temporary application name on every
/// foundation, which is what makes concurrent deployments of the same
/// application distinguishable on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeploymentId(Uuid);

impl DeploymentId {
    /// Mint a fresh id. Called exactly once per deployment, by the controller.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DeploymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
