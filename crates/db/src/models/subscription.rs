//! Webhook subscription entity model.

use medika_core::types::{DbId, Timestamp};
use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `webhook_subscriptions` table.
///
/// `secret` is the shared HMAC key for this endpoint. It is excluded from
/// serialized output and from `Debug` formatting so it never reaches API
/// responses or logs.
#[derive(Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub event_name: String,
    pub target_url: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("event_name", &self.event_name)
            .field("target_url", &self.target_url)
            .field("secret", &"<redacted>")
            .field("enabled", &self.enabled)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Request body for creating a subscription.
#[derive(Debug, Deserialize)]
pub struct CreateSubscription {
    pub event_name: String,
    pub target_url: String,
    pub secret: String,
    pub enabled: Option<bool>,
}

/// Request body for partially updating a subscription.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscription {
    pub event_name: Option<String>,
    pub target_url: Option<String>,
    pub secret: Option<String>,
    pub enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secret() {
        let now = chrono::Utc::now();
        let sub = Subscription {
            id: 1,
            event_name: "appointment.created".into(),
            target_url: "https://example.com/hook".into(),
            secret: "super-secret".into(),
            enabled: true,
            created_at: now,
            updated_at: now,
        };
        let rendered = format!("{sub:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn serialized_subscription_omits_secret() {
        let now = chrono::Utc::now();
        let sub = Subscription {
            id: 7,
            event_name: "appointment.cancelled".into(),
            target_url: "https://example.com/hook".into(),
            secret: "super-secret".into(),
            enabled: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert!(json.get("secret").is_none());
        assert_eq!(json["event_name"], "appointment.cancelled");
    }
}
