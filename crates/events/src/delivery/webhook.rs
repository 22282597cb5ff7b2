//! The webhook delivery engine.
//!
//! [`DeliveryEngine::dispatch`] fans one published event out to every
//! enabled subscription of its topic, off the publishing task. Each
//! subscriber gets its own concurrent delivery sequence with bounded
//! retries and exponential backoff; one endpoint's failure never affects
//! another's delivery, and no outcome is ever reported back to the
//! publisher.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;

use medika_db::models::subscription::Subscription;
use medika_db::repositories::SubscriptionRepo;
use medika_db::DbPool;

use crate::delivery::signing;
use crate::envelope::WebhookEnvelope;

/// `User-Agent` sent on every delivery attempt.
const USER_AGENT_VALUE: &str = "Medika-Webhooks/1.0";

/// Tuning for the delivery engine. Defaults are code-level, not
/// environment-derived.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Retries after the initial attempt, so `max_retries + 1` total tries.
    pub max_retries: u32,
    /// Bound on how long a single POST may hang.
    pub request_timeout: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Delivers signed webhook payloads to subscriber endpoints.
///
/// Cheaply cloneable: the pool and HTTP client are both handle types, and
/// the engine owns no delivery state of its own.
#[derive(Clone)]
pub struct DeliveryEngine {
    pool: DbPool,
    client: reqwest::Client,
    config: DeliveryConfig,
}

impl DeliveryEngine {
    /// Create an engine with a pre-configured HTTP client.
    pub fn new(pool: DbPool, config: DeliveryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            pool,
            client,
            config,
        }
    }

    /// Fire-and-forget entry point used by the event handlers.
    ///
    /// Spawns the whole delivery flow on a detached task and returns
    /// immediately; failures are observable only via logs.
    pub fn dispatch(&self, topic: &'static str, payload: serde_json::Value) {
        let engine = self.clone();
        tokio::spawn(async move {
            engine.deliver_all(topic, payload).await;
        });
    }

    /// Resolve subscribers for a topic and deliver to each of them.
    ///
    /// Completes once every per-subscriber sequence has succeeded or
    /// exhausted its retries; reports no aggregate status.
    pub async fn deliver_all(&self, topic: &str, payload: serde_json::Value) {
        let subscriptions = match SubscriptionRepo::list_enabled_for_event(&self.pool, topic).await
        {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                tracing::error!(topic, error = %e, "Failed to resolve webhook subscriptions");
                return;
            }
        };

        if subscriptions.is_empty() {
            tracing::debug!(topic, "No webhook subscriptions for event");
            return;
        }

        let envelope = WebhookEnvelope::new(topic, payload);
        let body = match envelope.canonical_bytes() {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(topic, error = %e, "Failed to serialize webhook envelope");
                return;
            }
        };

        self.fan_out(subscriptions, &envelope, body).await;
    }

    /// Deliver one pre-built envelope body to a set of subscriptions, each
    /// on its own concurrent task.
    pub async fn fan_out(
        &self,
        subscriptions: Vec<Subscription>,
        envelope: &WebhookEnvelope,
        body: Vec<u8>,
    ) {
        tracing::info!(
            event = %envelope.event,
            delivery_id = %envelope.delivery_id,
            endpoints = subscriptions.len(),
            "Delivering webhook"
        );

        let tasks: Vec<_> = subscriptions
            .into_iter()
            .map(|subscription| {
                let engine = self.clone();
                let event = envelope.event.clone();
                let delivery_id = envelope.delivery_id.clone();
                let body = body.clone();
                tokio::spawn(async move {
                    engine
                        .deliver_to_subscription(&subscription, &event, &delivery_id, &body)
                        .await;
                })
            })
            .collect();

        for task in futures::future::join_all(tasks).await {
            if let Err(e) = task {
                tracing::error!(error = %e, "Webhook delivery task panicked");
            }
        }
    }

    /// Run one subscriber's delivery sequence to a terminal state.
    ///
    /// Attempts are strictly sequential: success (status < 400) ends the
    /// sequence; a timeout, connection error, or error status schedules the
    /// next attempt after `2^n` seconds until `max_retries` retries are
    /// used up. Exhaustion is logged and surfaces nowhere.
    pub async fn deliver_to_subscription(
        &self,
        subscription: &Subscription,
        event: &str,
        delivery_id: &str,
        body: &[u8],
    ) {
        let signature = signing::sign(&subscription.secret, body);
        let url = subscription.target_url.as_str();

        for attempt in 0..=self.config.max_retries {
            tracing::debug!(url, attempt = attempt + 1, "Attempting webhook delivery");

            match self.post_once(url, event, delivery_id, &signature, body).await {
                Ok(status) if status.as_u16() < 400 => {
                    tracing::info!(
                        url,
                        status = status.as_u16(),
                        attempts = attempt + 1,
                        "Webhook delivered"
                    );
                    return;
                }
                Ok(status) => {
                    tracing::warn!(
                        url,
                        status = status.as_u16(),
                        "Webhook endpoint returned error status"
                    );
                }
                Err(e) if e.is_timeout() => {
                    tracing::warn!(url, "Webhook delivery timed out");
                }
                Err(e) if e.is_connect() => {
                    tracing::warn!(url, error = %e, "Webhook delivery connection error");
                }
                Err(e) => {
                    tracing::warn!(url, error = %e, "Webhook delivery request failed");
                }
            }

            if attempt < self.config.max_retries {
                let wait = backoff_delay(attempt);
                tracing::debug!(
                    url,
                    wait_secs = wait.as_secs(),
                    "Retrying webhook delivery after backoff"
                );
                tokio::time::sleep(wait).await;
            }
        }

        tracing::error!(
            url,
            attempts = self.config.max_retries + 1,
            event,
            delivery_id,
            "Webhook delivery exhausted all attempts"
        );
    }

    /// One HTTP POST attempt.
    async fn post_once(
        &self,
        url: &str,
        event: &str,
        delivery_id: &str,
        signature: &str,
        body: &[u8],
    ) -> Result<StatusCode, reqwest::Error> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("X-Event-Type", event)
            .header("X-Delivery-Id", delivery_id)
            .header("X-Signature", signature)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .body(body.to_vec())
            .send()
            .await?;
        Ok(response.status())
    }
}

/// Backoff before retry `n + 1`: `2^n` seconds from the zero-based attempt
/// index. Pure exponential, no jitter, no cap.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_one_second() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
        assert_eq!(backoff_delay(4), Duration::from_secs(16));
    }

    #[test]
    fn default_config_matches_delivery_contract() {
        let config = DeliveryConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
