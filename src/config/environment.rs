// ABOUTME: Static description of one deployment environment.
// ABOUTME: The foundation list defines the fan-out width and order.

use crate::types::FoundationUrl;
use nonempty::NonEmpty;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// One named environment an application can be deployed to.
///
/// Read-only once loaded; every deployment against the environment sees
/// the same foundation order, which is what makes rollback deterministic.
#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    pub name: String,

    /// Load-balanced domain suffix. When set, the push flow maps
    /// `<app>.<domain>` onto the new build before cutover.
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub skip_ssl: bool,

    /// Require request credentials instead of falling back to the
    /// configured defaults.
    #[serde(default)]
    pub authenticate: bool,

    /// When false, a failed deployment keeps the new build instead of
    /// rolling back.
    #[serde(default = "default_enable_rollback")]
    pub enable_rollback: bool,

    #[serde(default = "default_instances")]
    pub instances: u16,

    #[serde(deserialize_with = "deserialize_foundations")]
    pub foundations: NonEmpty<FoundationUrl>,

    #[serde(default)]
    pub custom_params: HashMap<String, serde_json::Value>,
}

fn default_enable_rollback() -> bool {
    true
}

fn default_instances() -> u16 {
    1
}

fn deserialize_foundations<'de, D>(deserializer: D) -> Result<NonEmpty<FoundationUrl>, D::Error>
where
    D: Deserializer<'de>,
{
    let urls = Vec::<FoundationUrl>::deserialize(deserializer)?;
    NonEmpty::from_vec(urls)
        .ok_or_else(|| serde::de::Error::custom("environment needs at least one foundation"))
}
