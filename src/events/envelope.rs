// ABOUTME: Deployment-level envelope events, generic over the operation kind.
// ABOUTME: Zero-sized markers give each operation its own event types.

use super::{Event, EventData};
use crate::config::Environment;
use crate::error::Error;
use crate::transcript::Transcript;
use crate::types::{Authorization, CfContext};
use std::marker::PhantomData;
use std::sync::Arc;

/// An operation kind as seen by envelope events.
///
/// Implemented by the zero-sized markers [`Push`], [`Start`], and
/// [`Stop`]. Each marker pins the kind strings for its four envelope
/// events, so `Started<Push>` and `Started<Stop>` are distinct types with
/// distinct subscriber lists.
pub trait Operation: Send + Sync + 'static {
    /// Lowercase operation name used in logs.
    const NAME: &'static str;
    const STARTED: &'static str;
    const SUCCESS: &'static str;
    const FAILURE: &'static str;
    const FINISHED: &'static str;
}

/// Marker for the blue/green push operation.
pub enum Push {}

impl Operation for Push {
    const NAME: &'static str = "push";
    const STARTED: &'static str = "PushStartedEvent";
    const SUCCESS: &'static str = "PushSuccessEvent";
    const FAILURE: &'static str = "PushFailureEvent";
    const FINISHED: &'static str = "PushFinishedEvent";
}

/// Marker for the start operation.
pub enum Start {}

impl Operation for Start {
    const NAME: &'static str = "start";
    const STARTED: &'static str = "StartStartedEvent";
    const SUCCESS: &'static str = "StartSuccessEvent";
    const FAILURE: &'static str = "StartFailureEvent";
    const FINISHED: &'static str = "StartFinishedEvent";
}

/// Marker for the stop operation.
pub enum Stop {}

impl Operation for Stop {
    const NAME: &'static str = "stop";
    const STARTED: &'static str = "StopStartedEvent";
    const SUCCESS: &'static str = "StopSuccessEvent";
    const FAILURE: &'static str = "StopFailureEvent";
    const FINISHED: &'static str = "StopFinishedEvent";
}

/// Shared payload of every envelope event.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub context: CfContext,
    pub authorization: Authorization,
    pub environment: Environment,
    pub data: EventData,
    pub transcript: Transcript,
}

/// Emitted once per deployment, before any foundation work.
pub struct Started<K: Operation> {
    pub envelope: Envelope,
    _marker: PhantomData<K>,
}

/// Emitted when every foundation committed.
pub struct Success<K: Operation> {
    pub envelope: Envelope,
    _marker: PhantomData<K>,
}

/// Emitted when the deployment failed, carrying the surfaced error.
pub struct Failure<K: Operation> {
    pub envelope: Envelope,
    pub error: Arc<Error>,
    _marker: PhantomData<K>,
}

/// Always the last envelope event of a deployment.
pub struct Finished<K: Operation> {
    pub envelope: Envelope,
    _marker: PhantomData<K>,
}

impl<K: Operation> Started<K> {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            envelope,
            _marker: PhantomData,
        }
    }
}

impl<K: Operation> Success<K> {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            envelope,
            _marker: PhantomData,
        }
    }
}

impl<K: Operation> Failure<K> {
    pub fn new(envelope: Envelope, error: Arc<Error>) -> Self {
        Self {
            envelope,
            error,
            _marker: PhantomData,
        }
    }
}

impl<K: Operation> Finished<K> {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            envelope,
            _marker: PhantomData,
        }
    }
}

impl<K: Operation> Event for Started<K> {
    fn name(&self) -> &'static str {
        K::STARTED
    }
}

impl<K: Operation> Event for Success<K> {
    fn name(&self) -> &'static str {
        K::SUCCESS
    }
}

impl<K: Operation> Event for Failure<K> {
    fn name(&self) -> &'static str {
        K::FAILURE
    }
}

impl<K: Operation> Event for Finished<K> {
    fn name(&self) -> &'static str {
        K::FINISHED
    }
}
