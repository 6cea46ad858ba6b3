// ABOUTME: Cross-foundation coordinator with rollback semantics.
// ABOUTME: Drives every Action through the lifecycle in strict foundation order.

use super::action::ActionState;
use super::{Action, ActionCreator, DeployError, OrchestrationError, Phase, PhaseError};
use crate::config::Environment;
use crate::types::FoundationUrl;
use tokio_util::sync::CancellationToken;

struct ActionRun {
    foundation: FoundationUrl,
    action: Box<dyn Action>,
    state: ActionState,
    reached_init: bool,
    executed: bool,
}

impl ActionRun {
    fn new(foundation: FoundationUrl, action: Box<dyn Action>) -> Self {
        Self {
            foundation,
            action,
            state: ActionState::Created,
            reached_init: false,
            executed: false,
        }
    }

    fn advance(&mut self, state: ActionState) {
        tracing::trace!(
            foundation = %self.foundation,
            from = ?self.state,
            to = ?state,
            "action state transition"
        );
        self.state = state;
    }
}

/// Runs one operation across every foundation of an environment.
///
/// Foundations execute strictly sequentially, in the order the
/// environment lists them; that order is what lets a failure on
/// foundation N unwind the earlier N-1 deterministically.
pub struct BlueGreen {
    cancellation: CancellationToken,
}

impl Default for BlueGreen {
    fn default() -> Self {
        Self::new()
    }
}

impl BlueGreen {
    pub fn new() -> Self {
        Self {
            cancellation: CancellationToken::new(),
        }
    }

    /// Honour `cancellation` at phase boundaries. In-flight courier
    /// calls are opaque subprocesses and are never interrupted.
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    pub async fn run(
        &self,
        creator: &mut dyn ActionCreator,
        environment: &Environment,
    ) -> Result<(), OrchestrationError> {
        let mut errors: Vec<PhaseError> = Vec::new();

        if let Err(e) = creator.setup().await {
            errors.push(PhaseError::new(Phase::Setup, None, e));
            creator.teardown();
            return Err(OrchestrationError::new(errors));
        }

        let mut runs: Vec<ActionRun> = Vec::new();
        for foundation in environment.foundations.iter() {
            match creator.create(foundation) {
                Ok(action) => runs.push(ActionRun::new(foundation.clone(), action)),
                Err(e) => {
                    errors.push(PhaseError::new(Phase::Setup, Some(foundation.clone()), e));
                    finalize(&mut runs, &mut errors).await;
                    creator.teardown();
                    return Err(OrchestrationError::new(errors));
                }
            }
        }

        tracing::debug!(
            environment = %environment.name,
            foundations = runs.len(),
            "starting coordinated deployment"
        );

        let mut aborted = false;

        // Verify every action before any side effect anywhere.
        for run in runs.iter_mut() {
            if self.note_cancellation(Phase::Verify, &mut errors) {
                aborted = true;
                break;
            }
            run.advance(ActionState::Verifying);
            if let Err(e) = run.action.verify().await {
                errors.push(PhaseError::new(
                    Phase::Verify,
                    Some(run.foundation.clone()),
                    e,
                ));
            }
        }
        let verified = !aborted && errors.is_empty();

        // Attach sessions. Iteration continues past failures so every
        // foundation gets a consistent lifecycle, but a failed login
        // keeps its action out of Execute.
        if verified {
            for run in runs.iter_mut() {
                if self.note_cancellation(Phase::Initially, &mut errors) {
                    aborted = true;
                    break;
                }
                run.advance(ActionState::Initializing);
                match run.action.initially().await {
                    Ok(()) => run.reached_init = true,
                    Err(e) => errors.push(PhaseError::new(
                        Phase::Initially,
                        Some(run.foundation.clone()),
                        e,
                    )),
                }
            }
        }

        if verified && !aborted {
            for run in runs.iter_mut().filter(|r| r.reached_init) {
                if self.note_cancellation(Phase::Execute, &mut errors) {
                    aborted = true;
                    break;
                }
                run.advance(ActionState::Executing);
                run.executed = true;
                if let Err(e) = run.action.execute().await {
                    errors.push(PhaseError::new(
                        Phase::Execute,
                        Some(run.foundation.clone()),
                        e,
                    ));
                }
            }
        }

        // Decision: all clean commits everywhere, anything else rolls
        // back every action that reached Execute. Recovery phases are
        // not cancellable; an interrupted rollback would leave
        // foundations inconsistent.
        if verified {
            if errors.is_empty() {
                for run in runs.iter_mut() {
                    run.advance(ActionState::Succeeding);
                    if let Err(e) = run.action.success().await {
                        errors.push(PhaseError::new(
                            Phase::Success,
                            Some(run.foundation.clone()),
                            e,
                        ));
                    }
                }
            } else {
                for run in runs.iter_mut().filter(|r| r.executed) {
                    run.advance(ActionState::Undoing);
                    if let Err(e) = run.action.undo().await {
                        errors.push(PhaseError::new(
                            Phase::Undo,
                            Some(run.foundation.clone()),
                            e,
                        ));
                    }
                }
            }
        }

        finalize(&mut runs, &mut errors).await;
        creator.teardown();

        if errors.is_empty() {
            tracing::info!(environment = %environment.name, "deployment succeeded on all foundations");
            Ok(())
        } else {
            tracing::error!(
                environment = %environment.name,
                errors = errors.len(),
                "deployment failed"
            );
            Err(OrchestrationError::new(errors))
        }
    }

    fn note_cancellation(&self, phase: Phase, errors: &mut Vec<PhaseError>) -> bool {
        if !self.cancellation.is_cancelled() {
            return false;
        }
        tracing::warn!(%phase, "deployment cancelled at phase boundary");
        errors.push(PhaseError::new(phase, None, DeployError::Cancelled));
        true
    }
}

/// Finalize every constructed action, newest first, so resources
/// acquired later are released first.
async fn finalize(runs: &mut [ActionRun], errors: &mut Vec<PhaseError>) {
    for run in runs.iter_mut().rev() {
        run.advance(ActionState::Finalizing);
        if let Err(e) = run.action.finally().await {
            errors.push(PhaseError::new(
                Phase::Finally,
                Some(run.foundation.clone()),
                e,
            ));
        }
        run.advance(ActionState::Done);
    }
}
