// ABOUTME: Courier implementation driving the cf binary as a subprocess.
// ABOUTME: Each session gets an isolated home directory and a command timeout.

use super::{Courier, CourierError, CourierFactory, CourierResult};
use crate::types::FoundationUrl;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

/// Drives the foundation command-line tool for one foundation.
///
/// Session state (login token, targeted org/space) lives in a private
/// home directory, so concurrent sessions against different foundations
/// cannot see each other's targets. `clean_up` removes that directory.
pub struct ShellCourier {
    binary: PathBuf,
    foundation: FoundationUrl,
    home: TempDir,
    timeout: Duration,
}

impl ShellCourier {
    pub fn new(
        binary: PathBuf,
        foundation: FoundationUrl,
        timeout: Duration,
    ) -> Result<Self, CourierError> {
        let home = TempDir::with_prefix("convoy-session-")
            .map_err(|e| CourierError::new("session", format!("creating session home: {e}")))?;

        Ok(Self {
            binary,
            foundation,
            home,
            timeout,
        })
    }

    /// Run one command, combining stdout and stderr into the output.
    ///
    /// Arguments are never logged; login carries the password.
    async fn run(&self, args: &[&str]) -> CourierResult {
        let name = args.first().copied().unwrap_or_default().to_string();
        tracing::debug!(
            command = %name,
            foundation = %self.foundation,
            "running courier command"
        );

        let invocation = Command::new(&self.binary)
            .args(args)
            .env("CF_HOME", self.home.path())
            .output();

        let output = match tokio::time::timeout(self.timeout, invocation).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(CourierError::new(name, format!("spawning {}: {e}", self.binary.display())));
            }
            Err(_) => {
                return Err(CourierError::new(
                    name,
                    format!("timed out after {:?}", self.timeout),
                ));
            }
        };

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        let combined = Bytes::from(combined);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(CourierError::with_output(
                name,
                format!("exit status {}", output.status),
                combined,
            ))
        }
    }
}

#[async_trait]
impl Courier for ShellCourier {
    async fn login(
        &self,
        url: &FoundationUrl,
        username: &str,
        password: &str,
        organization: &str,
        space: &str,
        skip_ssl: bool,
    ) -> CourierResult {
        let mut args = vec![
            "login",
            "-a",
            url.as_str(),
            "-u",
            username,
            "-p",
            password,
            "-o",
            organization,
            "-s",
            space,
        ];
        if skip_ssl {
            args.push("--skip-ssl-validation");
        }
        self.run(&args).await
    }

    async fn push(
        &self,
        name: &str,
        path: &Path,
        hostname: &str,
        instances: u16,
    ) -> CourierResult {
        let path = path.to_string_lossy();
        let instances = instances.to_string();
        self.run(&["push", name, "-p", &path, "-n", hostname, "-i", &instances])
            .await
    }

    async fn rename(&self, from: &str, to: &str) -> CourierResult {
        self.run(&["rename", from, to]).await
    }

    async fn delete(&self, name: &str) -> CourierResult {
        self.run(&["delete", name, "-f"]).await
    }

    async fn map_route(&self, name: &str, domain: &str, hostname: &str) -> CourierResult {
        self.run(&["map-route", name, domain, "-n", hostname]).await
    }

    async fn unmap_route(&self, name: &str, domain: &str, hostname: &str) -> CourierResult {
        self.run(&["unmap-route", name, domain, "-n", hostname]).await
    }

    async fn exists(&self, name: &str) -> bool {
        self.run(&["app", name, "--guid"]).await.is_ok()
    }

    async fn logs(&self, name: &str) -> CourierResult {
        self.run(&["logs", name, "--recent"]).await
    }

    async fn start(&self, name: &str) -> CourierResult {
        self.run(&["start", name]).await
    }

    async fn stop(&self, name: &str) -> CourierResult {
        self.run(&["stop", name]).await
    }

    async fn clean_up(&self) -> CourierResult {
        tokio::fs::remove_dir_all(self.home.path())
            .await
            .map_err(|e| CourierError::new("clean-up", format!("removing session home: {e}")))?;
        Ok(Bytes::new())
    }
}

/// Factory producing [`ShellCourier`] sessions.
#[derive(Debug, Clone)]
pub struct ShellCourierFactory {
    binary: PathBuf,
    timeout: Duration,
}

impl ShellCourierFactory {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

impl CourierFactory for ShellCourierFactory {
    fn session(&self, foundation: &FoundationUrl) -> Result<Box<dyn Courier>, CourierError> {
        Ok(Box::new(ShellCourier::new(
            self.binary.clone(),
            foundation.clone(),
            self.timeout,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foundation() -> FoundationUrl {
        FoundationUrl::new("https://api.example.com").unwrap()
    }

    #[tokio::test]
    async fn missing_binary_reports_spawn_failure() {
        let courier = ShellCourier::new(
            PathBuf::from("/nonexistent/cf-binary"),
            foundation(),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = courier.rename("a", "b").await.unwrap_err();
        assert_eq!(err.command, "rename");
        assert!(err.message.contains("spawning"));
    }

    #[tokio::test]
    async fn missing_binary_means_app_does_not_exist() {
        let courier = ShellCourier::new(
            PathBuf::from("/nonexistent/cf-binary"),
            foundation(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(!courier.exists("anything").await);
    }

    #[tokio::test]
    async fn clean_up_removes_the_session_home() {
        let courier = ShellCourier::new(
            PathBuf::from("/nonexistent/cf-binary"),
            foundation(),
            Duration::from_secs(5),
        )
        .unwrap();
        let home = courier.home.path().to_path_buf();
        assert!(home.exists());

        courier.clean_up().await.unwrap();
        assert!(!home.exists());
    }
}
