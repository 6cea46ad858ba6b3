// ABOUTME: Request context and credentials carried through a deployment.
// ABOUTME: Authorization redacts the password from all Debug output.

use super::AppName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to deploy and where, as named by the client.
///
/// Immutable for the lifetime of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfContext {
    pub organization: String,
    pub space: String,
    pub application: AppName,
    pub environment: String,
}

/// Foundation credentials.
///
/// Carried separately from [`CfContext`] because the controller may fill
/// them in from environment defaults. Never logged; `Debug` prints a
/// placeholder for the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Authorization {
    pub username: String,
    pub password: String,
}

impl Authorization {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// True when the client supplied neither field.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
