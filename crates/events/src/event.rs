//! The closed catalog of appointment lifecycle events.
//!
//! [`DomainEvent`] variants are immutable value objects describing a fact
//! that already happened; `occurred_at` is stamped by the publishing call
//! site, not when the underlying domain record was written.

use medika_core::types::Timestamp;

/// The kind tag for a [`DomainEvent`], used to key handler registration.
///
/// Keeping the tag separate from the data-carrying enum lets the bus match
/// on exact kind with no polymorphism involved, and lets callers enumerate
/// the topic vocabulary without constructing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AppointmentCreated,
    AppointmentUpdated,
    AppointmentCancelled,
    AppointmentConfirmed,
    AppointmentCompleted,
}

impl EventKind {
    /// Every kind, in vocabulary order.
    pub const ALL: [EventKind; 5] = [
        EventKind::AppointmentCreated,
        EventKind::AppointmentUpdated,
        EventKind::AppointmentCancelled,
        EventKind::AppointmentConfirmed,
        EventKind::AppointmentCompleted,
    ];

    /// The dotted topic string subscribers register against.
    pub fn topic(self) -> &'static str {
        match self {
            EventKind::AppointmentCreated => "appointment.created",
            EventKind::AppointmentUpdated => "appointment.updated",
            EventKind::AppointmentCancelled => "appointment.cancelled",
            EventKind::AppointmentConfirmed => "appointment.confirmed",
            EventKind::AppointmentCompleted => "appointment.completed",
        }
    }

    /// Parse a topic string back into a kind. `None` for anything outside
    /// the fixed vocabulary.
    pub fn from_topic(topic: &str) -> Option<EventKind> {
        EventKind::ALL.into_iter().find(|kind| kind.topic() == topic)
    }
}

/// A domain fact about one appointment.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    AppointmentCreated {
        appointment_id: String,
        patient_id: String,
        provider_id: String,
        appointment_date: String,
        start_time: String,
        end_time: String,
        appointment_type: String,
        occurred_at: Timestamp,
    },
    AppointmentUpdated {
        appointment_id: String,
        patient_id: String,
        provider_id: String,
        appointment_date: String,
        start_time: String,
        end_time: String,
        appointment_type: String,
        status: String,
        /// Changed field name → new value.
        changes: serde_json::Map<String, serde_json::Value>,
        occurred_at: Timestamp,
    },
    AppointmentCancelled {
        appointment_id: String,
        patient_id: String,
        provider_id: String,
        reason: Option<String>,
        occurred_at: Timestamp,
    },
    AppointmentConfirmed {
        appointment_id: String,
        patient_id: String,
        provider_id: String,
        occurred_at: Timestamp,
    },
    AppointmentCompleted {
        appointment_id: String,
        patient_id: String,
        provider_id: String,
        occurred_at: Timestamp,
    },
}

impl DomainEvent {
    /// The kind tag for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::AppointmentCreated { .. } => EventKind::AppointmentCreated,
            DomainEvent::AppointmentUpdated { .. } => EventKind::AppointmentUpdated,
            DomainEvent::AppointmentCancelled { .. } => EventKind::AppointmentCancelled,
            DomainEvent::AppointmentConfirmed { .. } => EventKind::AppointmentConfirmed,
            DomainEvent::AppointmentCompleted { .. } => EventKind::AppointmentCompleted,
        }
    }

    /// When the event was published (UTC).
    pub fn occurred_at(&self) -> Timestamp {
        match self {
            DomainEvent::AppointmentCreated { occurred_at, .. }
            | DomainEvent::AppointmentUpdated { occurred_at, .. }
            | DomainEvent::AppointmentCancelled { occurred_at, .. }
            | DomainEvent::AppointmentConfirmed { occurred_at, .. }
            | DomainEvent::AppointmentCompleted { occurred_at, .. } => *occurred_at,
        }
    }

    /// The appointment this event is about.
    pub fn appointment_id(&self) -> &str {
        match self {
            DomainEvent::AppointmentCreated { appointment_id, .. }
            | DomainEvent::AppointmentUpdated { appointment_id, .. }
            | DomainEvent::AppointmentCancelled { appointment_id, .. }
            | DomainEvent::AppointmentConfirmed { appointment_id, .. }
            | DomainEvent::AppointmentCompleted { appointment_id, .. } => appointment_id,
        }
    }
}
