//! The outer wire structure wrapping a domain payload with delivery metadata.

use serde::{Deserialize, Serialize};

/// The body POSTed to every subscriber of one publish.
///
/// Built exactly once per publish; the serialized bytes are shared across
/// all subscribers of the topic so every endpoint can verify the same
/// signature base. Field order is fixed by this declaration and `data`
/// objects serialize with stable key order, so the bytes are reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// The dotted topic string, e.g. `"appointment.created"`.
    pub event: String,
    /// Wall-clock delivery timestamp, RFC 3339 UTC.
    pub timestamp: String,
    /// Freshly generated UUID identifying this publish.
    pub delivery_id: String,
    /// Event-specific payload mapping.
    pub data: serde_json::Value,
}

impl WebhookEnvelope {
    /// Wrap a payload for a topic, stamping the current time and a fresh
    /// delivery id.
    pub fn new(topic: &str, data: serde_json::Value) -> Self {
        Self {
            event: topic.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            delivery_id: uuid::Uuid::new_v4().to_string(),
            data,
        }
    }

    /// Serialize to the canonical byte body that gets signed and POSTed.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes_are_stable_for_one_envelope() {
        let envelope = WebhookEnvelope::new(
            "appointment.created",
            serde_json::json!({"appointment_id": "appt:1"}),
        );
        assert_eq!(
            envelope.canonical_bytes().unwrap(),
            envelope.canonical_bytes().unwrap()
        );
    }

    #[test]
    fn field_order_starts_with_event() {
        let envelope = WebhookEnvelope::new("appointment.created", serde_json::json!({}));
        let body = String::from_utf8(envelope.canonical_bytes().unwrap()).unwrap();
        assert!(body.starts_with("{\"event\":\"appointment.created\""));
    }

    #[test]
    fn each_envelope_gets_a_fresh_delivery_id() {
        let a = WebhookEnvelope::new("appointment.created", serde_json::json!({}));
        let b = WebhookEnvelope::new("appointment.created", serde_json::json!({}));
        assert_ne!(a.delivery_id, b.delivery_id);
        assert!(uuid::Uuid::parse_str(&a.delivery_id).is_ok());
    }
}
