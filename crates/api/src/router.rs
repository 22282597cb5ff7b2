//! Route table for the API.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{health, webhooks};
use crate::state::AppState;

/// Root-level routes (outside `/api/v1`).
pub fn root_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// Routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/webhooks", webhook_routes())
}

fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(webhooks::create_subscription).get(webhooks::list_subscriptions),
        )
        .route("/events", get(webhooks::list_event_types))
        .route("/test", post(webhooks::test_fire))
        .route(
            "/{id}",
            get(webhooks::get_subscription)
                .put(webhooks::update_subscription)
                .delete(webhooks::delete_subscription),
        )
}
