// ABOUTME: The five-phase lifecycle capability driven by the coordinator.
// ABOUTME: Push, start, and stop are the three implementations.

use super::DeployError;
use async_trait::async_trait;

/// One per-foundation lifecycle object.
///
/// The coordinator drives each phase at most once, in the order
/// `verify → initially → execute → success | undo → finally`. State
/// progresses monotonically; an error in a phase is reported by that
/// phase and never retried internally.
#[async_trait]
pub trait Action: Send {
    /// Precondition check. Runs before any side effect on any foundation.
    async fn verify(&mut self) -> Result<(), DeployError>;

    /// Attach the courier session (login).
    async fn initially(&mut self) -> Result<(), DeployError>;

    /// The operation body.
    async fn execute(&mut self) -> Result<(), DeployError>;

    /// Commit, called only when every foundation executed cleanly.
    async fn success(&mut self) -> Result<(), DeployError>;

    /// Roll back, called when any foundation failed.
    async fn undo(&mut self) -> Result<(), DeployError>;

    /// Unconditional cleanup. Errors are recorded but never override
    /// the deployment outcome.
    async fn finally(&mut self) -> Result<(), DeployError>;
}

/// Where an Action currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Created,
    Verifying,
    Initializing,
    Executing,
    Succeeding,
    Undoing,
    Finalizing,
    Done,
}
