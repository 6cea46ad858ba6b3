// ABOUTME: Deferred envelope emission for Success/Failure and Finished.
// ABOUTME: Dropping the guard fires the events, so Finished fires even on unwind.

use crate::error::Error;
use crate::events::{Envelope, Event, EventBus, Failure, Finished, Operation, Success};
use std::marker::PhantomData;
use std::sync::Arc;

/// Emits the closing envelope events of one operation when dropped.
///
/// The controller records the outcome before returning; if it never
/// gets to (a panic mid-operation), no Success or Failure is emitted
/// but Finished still is, keeping Started/Finished paired.
pub(super) struct EnvelopeGuard<K: Operation> {
    bus: Arc<EventBus>,
    envelope: Envelope,
    outcome: Option<Result<(), Arc<Error>>>,
    _marker: PhantomData<K>,
}

impl<K: Operation> EnvelopeGuard<K> {
    pub(super) fn new(bus: Arc<EventBus>, envelope: Envelope) -> Self {
        Self {
            bus,
            envelope,
            outcome: None,
            _marker: PhantomData,
        }
    }

    pub(super) fn succeed(&mut self) {
        self.outcome = Some(Ok(()));
    }

    pub(super) fn fail(&mut self, error: Arc<Error>) {
        self.outcome = Some(Err(error));
    }
}

impl<K: Operation> Drop for EnvelopeGuard<K> {
    fn drop(&mut self) {
        match self.outcome.take() {
            Some(Ok(())) => {
                let event = Success::<K>::new(self.envelope.clone());
                self.emit(&event);
            }
            Some(Err(error)) => {
                let event = Failure::<K>::new(self.envelope.clone(), error);
                self.emit(&event);
            }
            // The operation unwound before reaching a decision.
            None => {}
        }

        let event = Finished::<K>::new(self.envelope.clone());
        self.emit(&event);
    }
}

impl<K: Operation> EnvelopeGuard<K> {
    /// Subscriber failures at this point cannot change the outcome;
    /// they are logged and noted on the transcript.
    fn emit<E: Event>(&self, event: &E) {
        tracing::debug!("emitting a {} event", event.name());
        if let Err(e) = self.bus.emit(event) {
            tracing::error!("an error occurred when emitting a {} event: {e}", event.name());
            self.envelope.transcript.write_line(&e.to_string());
        }
    }
}
