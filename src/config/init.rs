// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates a convoy.yml template file.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, environment: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml(environment.unwrap_or("sandbox")))?;

    Ok(())
}

fn template_yaml(environment: &str) -> String {
    format!(
        r#"username:
  env: CF_USERNAME
password:
  env: CF_PASSWORD

environments:
  - name: {environment}
    domain: apps.example.com
    skip_ssl: false
    authenticate: false
    enable_rollback: true
    instances: 2
    foundations:
      - https://api.{environment}-a.example.com
      - https://api.{environment}-b.example.com
"#
    )
}
