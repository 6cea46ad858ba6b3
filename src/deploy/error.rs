// ABOUTME: Error types for the per-foundation lifecycle and the coordinator.
// ABOUTME: Aggregate errors keep the full list and select one fatal by phase priority.

use crate::courier::CourierError;
use crate::events::EventError;
use crate::fetcher::FetchError;
use crate::types::FoundationUrl;
use std::fmt;
use thiserror::Error;

/// A failure inside one lifecycle phase.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("could not create courier session for {foundation}")]
    Session {
        foundation: FoundationUrl,
        #[source]
        source: CourierError,
    },

    #[error("could not log in to {foundation}")]
    Login {
        foundation: FoundationUrl,
        #[source]
        source: CourierError,
    },

    #[error("push of {app_name} failed")]
    Push {
        app_name: String,
        #[source]
        source: CourierError,
    },

    /// The push failed and fetching the application logs failed too.
    #[error("push of {app_name} failed and its logs could not be retrieved: {logs_error}")]
    GetLogs {
        app_name: String,
        push_error: CourierError,
        logs_error: CourierError,
    },

    #[error("could not map route {hostname}.{domain}")]
    MapRoute {
        hostname: String,
        domain: String,
        #[source]
        source: CourierError,
    },

    #[error("could not unmap route {hostname}.{domain}")]
    UnmapRoute {
        hostname: String,
        domain: String,
        #[source]
        source: CourierError,
    },

    #[error("could not rename {from} to {to}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: CourierError,
    },

    #[error("could not delete application {app_name}")]
    Delete {
        app_name: String,
        #[source]
        source: CourierError,
    },

    #[error("application {app_name} does not exist on {foundation}")]
    AppNotFound {
        app_name: String,
        foundation: FoundationUrl,
    },

    #[error("could not start application {app_name}")]
    StartApplication {
        app_name: String,
        #[source]
        source: CourierError,
    },

    #[error("could not stop application {app_name}")]
    StopApplication {
        app_name: String,
        #[source]
        source: CourierError,
    },

    #[error("push finished event handler failed: {0}")]
    PushFinishedEventHandler(#[source] EventError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("session clean-up failed on {foundation}")]
    CleanUp {
        foundation: FoundationUrl,
        #[source]
        source: CourierError,
    },

    #[error("deployment cancelled")]
    Cancelled,
}

/// Where in the lifecycle an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Verify,
    Initially,
    Execute,
    Success,
    Undo,
    Finally,
}

impl Phase {
    /// Surfacing priority; lower wins. Execute beats Success/Undo,
    /// which beat Finally.
    pub(crate) fn priority(self) -> u8 {
        match self {
            Phase::Setup => 0,
            Phase::Verify => 1,
            Phase::Initially => 2,
            Phase::Execute => 3,
            Phase::Success | Phase::Undo => 4,
            Phase::Finally => 5,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::Verify => "verify",
            Phase::Initially => "initially",
            Phase::Execute => "execute",
            Phase::Success => "success",
            Phase::Undo => "undo",
            Phase::Finally => "finally",
        };
        write!(f, "{name}")
    }
}

/// One recorded failure, tagged with its phase and foundation.
#[derive(Debug)]
pub struct PhaseError {
    pub phase: Phase,
    pub foundation: Option<FoundationUrl>,
    pub error: DeployError,
}

impl PhaseError {
    pub fn new(phase: Phase, foundation: Option<FoundationUrl>, error: DeployError) -> Self {
        Self {
            phase,
            foundation,
            error,
        }
    }
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.foundation {
            Some(foundation) => write!(f, "{} failed on {}: {}", self.phase, foundation, self.error),
            None => write!(f, "{} failed: {}", self.phase, self.error),
        }
    }
}

/// Aggregate outcome of a failed coordinator run.
///
/// Keeps every recorded error; the fatal one is selected by phase
/// priority, earliest occurrence breaking ties.
#[derive(Debug)]
pub struct OrchestrationError {
    errors: Vec<PhaseError>,
    fatal: usize,
}

impl OrchestrationError {
    /// `errors` must be non-empty.
    pub fn new(errors: Vec<PhaseError>) -> Self {
        let fatal = errors
            .iter()
            .enumerate()
            .min_by_key(|(index, e)| (e.phase.priority(), *index))
            .map(|(index, _)| index)
            .expect("an orchestration error carries at least one phase error");
        Self { errors, fatal }
    }

    /// The error surfaced to the caller.
    pub fn fatal(&self) -> &PhaseError {
        &self.errors[self.fatal]
    }

    /// Every recorded error, in occurrence order.
    pub fn errors(&self) -> &[PhaseError] {
        &self.errors
    }
}

impl fmt::Display for OrchestrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fatal())?;
        if self.errors.len() > 1 {
            write!(f, " ({} errors in total)", self.errors.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for OrchestrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.fatal().error)
    }
}
