//! Admin handlers for webhook subscription management.
//!
//! Provides CRUD for subscriptions, the event-type vocabulary, and a
//! test-fire endpoint that pushes a synthetic event through the real
//! pipeline. Authentication is mounted by the deployment in front of this
//! router and is not this crate's concern.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use medika_core::error::CoreError;
use medika_core::types::DbId;
use medika_db::models::subscription::{CreateSubscription, UpdateSubscription};
use medika_db::repositories::SubscriptionRepo;
use medika_events::{DomainEvent, EventKind};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/v1/webhooks`.
#[derive(Debug, Deserialize)]
pub struct SubscriptionListParams {
    pub event_name: Option<String>,
    pub enabled: Option<bool>,
}

/// Reject topic strings outside the fixed vocabulary.
fn validate_event_name(event_name: &str) -> Result<(), AppError> {
    if EventKind::from_topic(event_name).is_some() {
        return Ok(());
    }
    let vocabulary: Vec<&str> = EventKind::ALL.iter().map(|k| k.topic()).collect();
    Err(AppError::Core(CoreError::Validation(format!(
        "Invalid event_name '{event_name}'. Must be one of: {}",
        vocabulary.join(", ")
    ))))
}

// ---------------------------------------------------------------------------
// Subscription CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/webhooks
///
/// Create a new webhook subscription.
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(input): Json<CreateSubscription>,
) -> AppResult<impl IntoResponse> {
    if input.event_name.trim().is_empty()
        || input.target_url.trim().is_empty()
        || input.secret.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Missing required fields: event_name, target_url, secret".into(),
        ));
    }
    validate_event_name(input.event_name.trim())?;

    let subscription = SubscriptionRepo::create(
        &state.pool,
        input.event_name.trim(),
        input.target_url.trim(),
        &input.secret,
        input.enabled.unwrap_or(true),
    )
    .await?;

    tracing::info!(
        subscription_id = subscription.id,
        event_name = %subscription.event_name,
        target_url = %subscription.target_url,
        "Webhook subscription created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: subscription })))
}

/// GET /api/v1/webhooks
///
/// List subscriptions, optionally filtered by topic and enabled flag.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(params): Query<SubscriptionListParams>,
) -> AppResult<impl IntoResponse> {
    let subscriptions =
        SubscriptionRepo::list(&state.pool, params.event_name.as_deref(), params.enabled).await?;
    Ok(Json(DataResponse {
        data: subscriptions,
    }))
}

/// GET /api/v1/webhooks/{id}
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let subscription = SubscriptionRepo::find_by_id(&state.pool, subscription_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: subscription_id,
        }))?;
    Ok(Json(DataResponse { data: subscription }))
}

/// PUT /api/v1/webhooks/{id}
///
/// Partially update a subscription (topic, URL, secret, enabled flag).
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<DbId>,
    Json(input): Json<UpdateSubscription>,
) -> AppResult<impl IntoResponse> {
    if let Some(event_name) = input.event_name.as_deref() {
        validate_event_name(event_name.trim())?;
    }

    let updated = SubscriptionRepo::update(
        &state.pool,
        subscription_id,
        input.event_name.as_deref().map(str::trim),
        input.target_url.as_deref(),
        input.secret.as_deref(),
        input.enabled,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Subscription",
        id: subscription_id,
    }))?;

    tracing::info!(subscription_id, "Webhook subscription updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/webhooks/{id}
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = SubscriptionRepo::delete(&state.pool, subscription_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: subscription_id,
        }));
    }

    tracing::info!(subscription_id, "Webhook subscription deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Vocabulary and test fire
// ---------------------------------------------------------------------------

/// Human-readable label for a topic, for admin UI dropdowns.
fn kind_label(kind: EventKind) -> (&'static str, &'static str) {
    match kind {
        EventKind::AppointmentCreated => (
            "Appointment Created",
            "Triggered when a new appointment is created",
        ),
        EventKind::AppointmentUpdated => (
            "Appointment Updated",
            "Triggered when an appointment is updated",
        ),
        EventKind::AppointmentCancelled => (
            "Appointment Cancelled",
            "Triggered when an appointment is cancelled",
        ),
        EventKind::AppointmentConfirmed => (
            "Appointment Confirmed",
            "Triggered when an appointment is confirmed",
        ),
        EventKind::AppointmentCompleted => (
            "Appointment Completed",
            "Triggered when an appointment is marked as completed",
        ),
    }
}

/// GET /api/v1/webhooks/events
///
/// The fixed event-type vocabulary subscriptions may register against.
pub async fn list_event_types() -> impl IntoResponse {
    let events: Vec<serde_json::Value> = EventKind::ALL
        .into_iter()
        .map(|kind| {
            let (label, description) = kind_label(kind);
            json!({
                "value": kind.topic(),
                "label": label,
                "description": description,
            })
        })
        .collect();

    Json(DataResponse { data: events })
}

/// POST /api/v1/webhooks/test
///
/// Publish a synthetic `appointment.created` event through the real bus to
/// verify end-to-end connectivity. Delivery itself is fire-and-forget, so
/// this returns 202 as soon as the event is published.
pub async fn test_fire(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let event = DomainEvent::AppointmentCreated {
        appointment_id: "appt:test".into(),
        patient_id: "pat:test".into(),
        provider_id: "prov:test".into(),
        appointment_date: now.format("%Y-%m-%d").to_string(),
        start_time: "09:00".into(),
        end_time: "09:30".into(),
        appointment_type: "test".into(),
        occurred_at: now,
    };

    state.event_bus.publish(&event);

    (
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: json!({ "published": "appointment.created" }),
        }),
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn vocabulary_accepts_all_known_topics() {
        for kind in EventKind::ALL {
            assert!(validate_event_name(kind.topic()).is_ok());
        }
    }

    #[test]
    fn vocabulary_rejects_unknown_topic() {
        let err = validate_event_name("appointment.deleted").unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Validation(_)));
    }

    #[test]
    fn every_kind_has_a_label() {
        for kind in EventKind::ALL {
            let (label, description) = kind_label(kind);
            assert!(!label.is_empty());
            assert!(!description.is_empty());
        }
    }
}
