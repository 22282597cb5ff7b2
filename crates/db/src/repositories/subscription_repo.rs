//! Repository for the `webhook_subscriptions` table.

use sqlx::{FromRow, PgPool};

use medika_core::types::DbId;

use crate::models::subscription::Subscription;

const SUBSCRIPTION_COLUMNS: &str = "\
    id, event_name, target_url, secret, enabled, created_at, updated_at";

/// Provides CRUD and delivery-time resolution for webhook subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Create a new subscription. `id` is assigned by the database.
    pub async fn create(
        pool: &PgPool,
        event_name: &str,
        target_url: &str,
        secret: &str,
        enabled: bool,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO webhook_subscriptions (event_name, target_url, secret, enabled) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(event_name)
            .bind(target_url)
            .bind(secret)
            .bind(enabled)
            .fetch_one(pool)
            .await
    }

    /// List subscriptions with optional topic / enabled filters, newest first.
    pub async fn list(
        pool: &PgPool,
        event_name: Option<&str>,
        enabled: Option<bool>,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM webhook_subscriptions \
             WHERE ($1::TEXT IS NULL OR event_name = $1) \
               AND ($2::BOOLEAN IS NULL OR enabled = $2) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(event_name)
            .bind(enabled)
            .fetch_all(pool)
            .await
    }

    /// Find a subscription by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {SUBSCRIPTION_COLUMNS} FROM webhook_subscriptions WHERE id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Partially update a subscription and bump `updated_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        event_name: Option<&str>,
        target_url: Option<&str>,
        secret: Option<&str>,
        enabled: Option<bool>,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE webhook_subscriptions SET \
                 event_name = COALESCE($2, event_name), \
                 target_url = COALESCE($3, target_url), \
                 secret = COALESCE($4, secret), \
                 enabled = COALESCE($5, enabled), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .bind(event_name)
            .bind(target_url)
            .bind(secret)
            .bind(enabled)
            .fetch_optional(pool)
            .await
    }

    /// Delete a subscription by ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM webhook_subscriptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve the delivery targets for one topic: exact `event_name` match
    /// AND `enabled = true`.
    ///
    /// Rows are decoded one at a time; a row that fails to decode is logged
    /// and skipped so it cannot abort resolution of the remaining
    /// subscriptions.
    pub async fn list_enabled_for_event(
        pool: &PgPool,
        event_name: &str,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM webhook_subscriptions \
             WHERE event_name = $1 AND enabled = TRUE \
             ORDER BY created_at ASC"
        );
        let rows = sqlx::query(&query).bind(event_name).fetch_all(pool).await?;

        let mut subscriptions = Vec::with_capacity(rows.len());
        for row in &rows {
            match Subscription::from_row(row) {
                Ok(subscription) => subscriptions.push(subscription),
                Err(e) => {
                    tracing::error!(event_name, error = %e, "Skipping webhook subscription row that failed to decode");
                }
            }
        }
        Ok(subscriptions)
    }
}
