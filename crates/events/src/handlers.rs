//! Bridge between the event bus and webhook delivery.
//!
//! One handler per [`EventKind`] translates a typed [`DomainEvent`] into a
//! `(topic, payload)` pair and hands it to the delivery engine. The handler
//! returns as soon as the delivery task is spawned; the publishing caller is
//! never blocked by slow subscriber endpoints.

use serde_json::json;

use crate::bus::EventBus;
use crate::delivery::webhook::DeliveryEngine;
use crate::event::{DomainEvent, EventKind};

/// Register the webhook delivery handler for every event kind.
///
/// Called once at application startup, before the bus is shared.
pub fn register_event_handlers(bus: &mut EventBus, engine: DeliveryEngine) {
    for kind in EventKind::ALL {
        let engine = engine.clone();
        bus.subscribe(kind, move |event| {
            tracing::debug!(
                topic = event.kind().topic(),
                appointment_id = event.appointment_id(),
                "Handling event for webhook delivery"
            );
            engine.dispatch(event.kind().topic(), webhook_payload(event));
            Ok(())
        });
    }
    tracing::info!("Event handlers registered for webhook delivery");
}

/// Pure translation of a typed event into its webhook payload mapping.
///
/// The `timestamp` field carries the publish-time `occurred_at` so
/// subscribers can reason about clock skew against the envelope's own
/// delivery timestamp.
pub fn webhook_payload(event: &DomainEvent) -> serde_json::Value {
    match event {
        DomainEvent::AppointmentCreated {
            appointment_id,
            patient_id,
            provider_id,
            appointment_date,
            start_time,
            end_time,
            appointment_type,
            occurred_at,
        } => json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "provider_id": provider_id,
            "appointment_date": appointment_date,
            "start_time": start_time,
            "end_time": end_time,
            "appointment_type": appointment_type,
            "timestamp": occurred_at.to_rfc3339(),
        }),
        DomainEvent::AppointmentUpdated {
            appointment_id,
            patient_id,
            provider_id,
            appointment_date,
            start_time,
            end_time,
            appointment_type,
            status,
            changes,
            occurred_at,
        } => json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "provider_id": provider_id,
            "appointment_date": appointment_date,
            "start_time": start_time,
            "end_time": end_time,
            "appointment_type": appointment_type,
            "status": status,
            "changes": changes,
            "timestamp": occurred_at.to_rfc3339(),
        }),
        DomainEvent::AppointmentCancelled {
            appointment_id,
            patient_id,
            provider_id,
            reason,
            occurred_at,
        } => json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "provider_id": provider_id,
            "reason": reason,
            "timestamp": occurred_at.to_rfc3339(),
        }),
        DomainEvent::AppointmentConfirmed {
            appointment_id,
            patient_id,
            provider_id,
            occurred_at,
        }
        | DomainEvent::AppointmentCompleted {
            appointment_id,
            patient_id,
            provider_id,
            occurred_at,
        } => json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "provider_id": provider_id,
            "timestamp": occurred_at.to_rfc3339(),
        }),
    }
}
