// ABOUTME: Synchronous event bus with typed and named subscription registries.
// ABOUTME: Delivery is in registration order; the first handler error short-circuits.

use super::{Event, EventData, EventError, NamedEvent};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// What a subscriber returns. Any error aborts delivery and surfaces to
/// the emitter wrapped in an [`EventError`].
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type TypedHandler = Arc<dyn Fn(&dyn Any) -> HandlerResult + Send + Sync>;
type NamedHandler = Arc<dyn Fn(&NamedEvent) -> HandlerResult + Send + Sync>;

/// Dispatches lifecycle events to registered subscribers.
///
/// Emission is synchronous: every handler runs on the emitting task before
/// `emit` returns. The handler list seen by one emission is a snapshot, so
/// handlers may register further subscriptions without affecting in-flight
/// deliveries.
#[derive(Default)]
pub struct EventBus {
    typed: RwLock<HashMap<TypeId, Vec<TypedHandler>>>,
    named: RwLock<HashMap<String, Vec<NamedHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one concrete event type.
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: Event,
        F: Fn(&E) -> HandlerResult + Send + Sync + 'static,
    {
        let wrapped: TypedHandler = Arc::new(move |any| {
            let event = any
                .downcast_ref::<E>()
                .expect("handler invoked with the event type it was registered for");
            handler(event)
        });
        self.typed
            .write()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Register a handler for a legacy string event kind.
    pub fn subscribe_named<F>(&self, kind: impl Into<String>, handler: F)
    where
        F: Fn(&NamedEvent) -> HandlerResult + Send + Sync + 'static,
    {
        self.named
            .write()
            .entry(kind.into())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Deliver a typed event to its subscribers in registration order.
    pub fn emit<E: Event>(&self, event: &E) -> Result<(), EventError> {
        let handlers: Vec<TypedHandler> = self
            .typed
            .read()
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();

        tracing::debug!(event = event.name(), handlers = handlers.len(), "emitting event");

        for handler in handlers {
            handler(event as &dyn Any).map_err(|e| EventError::new(event.name(), e))?;
        }

        Ok(())
    }

    /// Deliver a legacy named event to subscribers of its kind.
    pub fn emit_named(&self, kind: &str, data: EventData) -> Result<(), EventError> {
        let handlers: Vec<NamedHandler> = self
            .named
            .read()
            .get(kind)
            .cloned()
            .unwrap_or_default();

        tracing::debug!(event = kind, handlers = handlers.len(), "emitting named event");

        let event = NamedEvent {
            kind: kind.to_string(),
            data,
        };
        for handler in handlers {
            handler(&event).map_err(|e| EventError::new(kind, e))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Ping;

    impl Event for Ping {
        fn name(&self) -> &'static str {
            "PingEvent"
        }
    }

    #[test]
    fn delivers_in_registration_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            bus.subscribe::<Ping, _>(move |_| {
                seen.lock().push(tag);
                Ok(())
            });
        }

        bus.emit(&Ping).unwrap();
        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn first_error_short_circuits() {
        let bus = EventBus::new();
        let reached = Arc::new(Mutex::new(false));

        bus.subscribe::<Ping, _>(|_| Err("handler exploded".into()));
        {
            let reached = reached.clone();
            bus.subscribe::<Ping, _>(move |_| {
                *reached.lock() = true;
                Ok(())
            });
        }

        let err = bus.emit(&Ping).unwrap_err();
        assert_eq!(err.kind, "PingEvent");
        assert!(err.message.contains("handler exploded"));
        assert!(!*reached.lock());
    }

    #[test]
    fn named_events_dispatch_by_kind() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        {
            let seen = seen.clone();
            bus.subscribe_named("push.finished", move |event| {
                seen.lock().push(event.kind.clone());
                Ok(())
            });
        }
        bus.subscribe_named("other.kind", |_| panic!("wrong kind delivered"));

        bus.emit_named("push.finished", EventData::new()).unwrap();
        assert_eq!(*seen.lock(), vec!["push.finished".to_string()]);
    }

    #[test]
    fn emit_without_subscribers_is_ok() {
        let bus = EventBus::new();
        assert!(bus.emit(&Ping).is_ok());
        assert!(bus.emit_named("no.subscribers", EventData::new()).is_ok());
    }

    #[test]
    fn handlers_may_subscribe_during_emission() {
        let bus = Arc::new(EventBus::new());
        {
            let bus2 = bus.clone();
            bus.subscribe::<Ping, _>(move |_| {
                bus2.subscribe::<Ping, _>(|_| Ok(()));
                Ok(())
            });
        }
        bus.emit(&Ping).unwrap();
    }
}
