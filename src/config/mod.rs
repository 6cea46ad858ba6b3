// ABOUTME: Configuration types and parsing for convoy.yml.
// ABOUTME: Global default credentials plus the environment catalogue.

mod env_value;
mod environment;
mod init;

pub use env_value::EnvValue;
pub use environment::Environment;
pub use init::init_config;

use crate::error::{Error, Result};
use crate::types::Authorization;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "convoy.yml";
pub const CONFIG_FILENAME_ALT: &str = "convoy.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Default foundation username, used when a request carries no
    /// credentials and the environment does not require its own.
    #[serde(default)]
    pub username: Option<EnvValue>,

    #[serde(default)]
    pub password: Option<EnvValue>,

    /// Upper bound on any single courier command.
    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,

    pub environments: Vec<Environment>,
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(15 * 60)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        if config.environments.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one environment must be configured".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Find and load the config file in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        for name in [CONFIG_FILENAME, CONFIG_FILENAME_ALT] {
            let path = dir.join(name);
            if path.is_file() {
                return Self::load(&path);
            }
        }
        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    /// The credentials inherited by requests that carry none.
    pub fn default_authorization(&self) -> Result<Authorization> {
        let username = match &self.username {
            Some(value) => value.resolve()?,
            None => String::new(),
        };
        let password = match &self.password {
            Some(value) => value.resolve()?,
            None => String::new(),
        };
        Ok(Authorization::new(username, password))
    }
}
