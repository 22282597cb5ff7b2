//! In-process synchronous event bus.
//!
//! [`EventBus`] maps an [`EventKind`] to an ordered list of handlers. It is
//! constructed and populated once at application startup, then shared as
//! `Arc<EventBus>` for the life of the process. Dispatch runs on the
//! publishing task; nothing here is durable and no event is ever replayed.

use std::collections::HashMap;

use crate::event::{DomainEvent, EventKind};

/// Error returned by a bus handler.
///
/// Handler failures are contained by [`EventBus::publish`]: they are logged
/// and never reach the publisher.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError(message.to_string())
    }
}

type Handler = Box<dyn Fn(&DomainEvent) -> Result<(), HandlerError> + Send + Sync>;

/// In-process publish/subscribe hub for [`DomainEvent`]s.
///
/// # Usage
///
/// ```rust
/// use medika_events::bus::EventBus;
/// use medika_events::event::{DomainEvent, EventKind};
///
/// let mut bus = EventBus::new();
/// bus.subscribe(EventKind::AppointmentConfirmed, |event| {
///     tracing::debug!(appointment_id = event.appointment_id(), "confirmed");
///     Ok(())
/// });
///
/// bus.publish(&DomainEvent::AppointmentConfirmed {
///     appointment_id: "appt:1".into(),
///     patient_id: "pat:1".into(),
///     provider_id: "prov:1".into(),
///     occurred_at: chrono::Utc::now(),
/// });
/// ```
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one exact event kind.
    ///
    /// Registration order is delivery order. Intended for application
    /// startup only; the registry is immutable once the bus is shared.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&DomainEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
        tracing::debug!(topic = kind.topic(), "Subscribed handler to event kind");
    }

    /// Publish an event to every handler registered for its kind.
    ///
    /// Handlers run synchronously on the calling task, in registration
    /// order. A handler returning `Err` is logged and does not stop the
    /// remaining handlers, nor surface to the publisher. A kind with no
    /// handlers is a no-op.
    pub fn publish(&self, event: &DomainEvent) {
        let kind = event.kind();
        let Some(handlers) = self.handlers.get(&kind) else {
            tracing::debug!(topic = kind.topic(), "No handlers for event kind");
            return;
        };

        tracing::debug!(
            topic = kind.topic(),
            handlers = handlers.len(),
            appointment_id = event.appointment_id(),
            "Publishing event"
        );

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(e) = handler(event) {
                tracing::error!(
                    topic = kind.topic(),
                    handler = index,
                    error = %e,
                    "Event handler failed"
                );
            }
        }
    }

    /// Number of handlers registered for a kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn confirmed_event() -> DomainEvent {
        DomainEvent::AppointmentConfirmed {
            appointment_id: "appt:1".into(),
            patient_id: "pat:1".into(),
            provider_id: "prov:1".into(),
            occurred_at: chrono::Utc::now(),
        }
    }

    fn cancelled_event() -> DomainEvent {
        DomainEvent::AppointmentCancelled {
            appointment_id: "appt:1".into(),
            patient_id: "pat:1".into(),
            provider_id: "prov:1".into(),
            reason: None,
            occurred_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let mut bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for label in 1..=3u32 {
            let log = Arc::clone(&log);
            bus.subscribe(EventKind::AppointmentConfirmed, move |_| {
                log.lock().unwrap().push(label);
                Ok(())
            });
        }

        bus.publish(&confirmed_event());
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn failing_handler_does_not_stop_the_rest() {
        let mut bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&log);
        bus.subscribe(EventKind::AppointmentConfirmed, move |_| {
            first.lock().unwrap().push("first");
            Ok(())
        });
        let failing = Arc::clone(&log);
        bus.subscribe(EventKind::AppointmentConfirmed, move |_| {
            failing.lock().unwrap().push("failing");
            Err("boom".into())
        });
        let last = Arc::clone(&log);
        bus.subscribe(EventKind::AppointmentConfirmed, move |_| {
            last.lock().unwrap().push("last");
            Ok(())
        });

        // Must not panic, and every handler runs exactly once.
        bus.publish(&confirmed_event());
        assert_eq!(*log.lock().unwrap(), vec!["first", "failing", "last"]);
    }

    #[test]
    fn handlers_only_see_their_exact_kind() {
        let mut bus = EventBus::new();
        let invoked = Arc::new(Mutex::new(0u32));

        let counter = Arc::clone(&invoked);
        bus.subscribe(EventKind::AppointmentConfirmed, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(&cancelled_event());
        assert_eq!(*invoked.lock().unwrap(), 0);

        bus.publish(&confirmed_event());
        assert_eq!(*invoked.lock().unwrap(), 1);
    }

    #[test]
    fn publish_with_no_handlers_is_a_noop() {
        let bus = EventBus::new();
        bus.publish(&confirmed_event());
        assert_eq!(bus.handler_count(EventKind::AppointmentConfirmed), 0);
    }
}
