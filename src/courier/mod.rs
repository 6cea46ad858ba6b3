// ABOUTME: Capability trait for the per-foundation command surface.
// ABOUTME: One courier session is bound to exactly one foundation.

mod shell;

pub use shell::{ShellCourier, ShellCourierFactory};

use crate::types::FoundationUrl;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use thiserror::Error;

/// A failed courier command, carrying whatever the command printed.
///
/// The output travels with the error so callers can append it to the
/// transcript before propagating.
#[derive(Debug, Error)]
#[error("{command} failed: {message}")]
pub struct CourierError {
    pub command: String,
    pub output: Bytes,
    pub message: String,
}

impl CourierError {
    pub fn new(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output: Bytes::new(),
            message: message.into(),
        }
    }

    pub fn with_output(
        command: impl Into<String>,
        message: impl Into<String>,
        output: Bytes,
    ) -> Self {
        Self {
            command: command.into(),
            output,
            message: message.into(),
        }
    }
}

pub type CourierResult = Result<Bytes, CourierError>;

/// Remote command surface of one foundation session.
///
/// Every call yields output bytes even on error; callers write them to
/// the transcript in call order.
#[async_trait]
pub trait Courier: Send + Sync {
    async fn login(
        &self,
        url: &FoundationUrl,
        username: &str,
        password: &str,
        organization: &str,
        space: &str,
        skip_ssl: bool,
    ) -> CourierResult;

    /// Push `name` from `path`, routed under the original application's
    /// hostname, with the given instance count.
    async fn push(&self, name: &str, path: &Path, hostname: &str, instances: u16)
        -> CourierResult;

    async fn rename(&self, from: &str, to: &str) -> CourierResult;

    async fn delete(&self, name: &str) -> CourierResult;

    async fn map_route(&self, name: &str, domain: &str, hostname: &str) -> CourierResult;

    async fn unmap_route(&self, name: &str, domain: &str, hostname: &str) -> CourierResult;

    async fn exists(&self, name: &str) -> bool;

    /// Recent application logs, used to annotate push failures.
    async fn logs(&self, name: &str) -> CourierResult;

    async fn start(&self, name: &str) -> CourierResult;

    async fn stop(&self, name: &str) -> CourierResult;

    /// Tear down session state. Called exactly once, from Finally.
    async fn clean_up(&self) -> CourierResult;
}

/// Mints one courier session per foundation.
pub trait CourierFactory: Send + Sync {
    fn session(&self, foundation: &FoundationUrl) -> Result<Box<dyn Courier>, CourierError>;
}
