// ABOUTME: Lifecycle event types and the synchronous event bus.
// ABOUTME: Typed events are primary; the named form is a legacy adapter.

mod bus;
mod envelope;

pub use bus::{EventBus, HandlerResult};
pub use envelope::{Envelope, Failure, Finished, Operation, Push, Start, Started, Stop, Success};

use std::any::Any;
use std::collections::HashMap;
use thiserror::Error;

/// Kind string for the legacy named form of the per-foundation push
/// completion event.
pub const PUSH_FINISHED_KIND: &str = "push.finished";

/// Free-form payload attached to events and requests.
pub type EventData = HashMap<String, serde_json::Value>;

/// A lifecycle event deliverable through the [`EventBus`].
///
/// Subscribers register per concrete type; `name` is the stable kind
/// string used in logs and error reports.
pub trait Event: Any + Send + Sync {
    fn name(&self) -> &'static str;
}

/// An event identified only by a string kind plus a data payload.
///
/// Retained for subscribers written against the stringly-typed API;
/// dispatched by kind, not by type.
#[derive(Debug, Clone)]
pub struct NamedEvent {
    pub kind: String,
    pub data: EventData,
}

/// A subscriber failure, tagged with the kind of event being delivered.
#[derive(Debug, Error)]
#[error("{kind} event handler failed: {message}")]
pub struct EventError {
    pub kind: String,
    pub message: String,
}

impl EventError {
    pub fn new(kind: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self {
            kind: kind.into(),
            message: source.to_string(),
        }
    }
}
