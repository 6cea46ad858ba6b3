// ABOUTME: Application-wide error types for convoy.
// ABOUTME: Each variant knows the status code it maps to at the request boundary.

use crate::deploy::OrchestrationError;
use crate::diagnostics::MatchedError;
use crate::events::EventError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    #[error("basic auth credentials missing and environment requires authentication")]
    BasicAuth,

    #[error("initialization error: {0}")]
    Initialization(#[source] EventError),

    #[error(transparent)]
    Deploy(#[from] OrchestrationError),

    /// A known diagnostic recognized in the transcript, surfaced in
    /// place of the raw deployment error.
    #[error("{0}")]
    Diagnosed(MatchedError),

    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// HTTP-equivalent status code for the request boundary.
    pub fn code(&self) -> u16 {
        match self {
            Error::BasicAuth => 401,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
