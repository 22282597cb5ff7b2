use sqlx::PgPool;

use medika_db::repositories::SubscriptionRepo;

/// Create, fetch, update, and delete a subscription.
#[sqlx::test(migrations = "../../db/migrations")]
async fn subscription_crud_roundtrip(pool: PgPool) {
    let created = SubscriptionRepo::create(
        &pool,
        "appointment.created",
        "https://example.com/hooks",
        "s3cret",
        true,
    )
    .await
    .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.event_name, "appointment.created");
    assert!(created.enabled);

    let found = SubscriptionRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("subscription should exist");
    assert_eq!(found.target_url, "https://example.com/hooks");

    let updated = SubscriptionRepo::update(&pool, created.id, None, None, None, Some(false))
        .await
        .unwrap()
        .expect("subscription should exist");
    assert!(!updated.enabled);
    assert_eq!(updated.event_name, "appointment.created");
    assert!(updated.updated_at >= created.updated_at);

    assert!(SubscriptionRepo::delete(&pool, created.id).await.unwrap());
    assert!(SubscriptionRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
}

/// `find_by_id` and `delete` report absence instead of erroring.
#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_subscription_is_none(pool: PgPool) {
    assert!(SubscriptionRepo::find_by_id(&pool, 999).await.unwrap().is_none());
    assert!(!SubscriptionRepo::delete(&pool, 999).await.unwrap());
}

/// Delivery-time resolution excludes disabled and topic-mismatched rows.
#[sqlx::test(migrations = "../../db/migrations")]
async fn resolution_filters_disabled_and_mismatched(pool: PgPool) {
    let target = SubscriptionRepo::create(
        &pool,
        "appointment.created",
        "https://a.example.com/hook",
        "secret-a",
        true,
    )
    .await
    .unwrap();
    SubscriptionRepo::create(
        &pool,
        "appointment.created",
        "https://b.example.com/hook",
        "secret-b",
        false,
    )
    .await
    .unwrap();
    SubscriptionRepo::create(
        &pool,
        "appointment.updated",
        "https://c.example.com/hook",
        "secret-c",
        true,
    )
    .await
    .unwrap();

    let resolved = SubscriptionRepo::list_enabled_for_event(&pool, "appointment.created")
        .await
        .unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, target.id);
    assert_eq!(resolved[0].target_url, "https://a.example.com/hook");
}

/// The list endpoint filters are optional and composable.
#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_topic_and_enabled(pool: PgPool) {
    SubscriptionRepo::create(&pool, "appointment.created", "https://a/h", "sa", true)
        .await
        .unwrap();
    SubscriptionRepo::create(&pool, "appointment.created", "https://b/h", "sb", false)
        .await
        .unwrap();
    SubscriptionRepo::create(&pool, "appointment.cancelled", "https://c/h", "sc", true)
        .await
        .unwrap();

    let all = SubscriptionRepo::list(&pool, None, None).await.unwrap();
    assert_eq!(all.len(), 3);

    let created_only = SubscriptionRepo::list(&pool, Some("appointment.created"), None)
        .await
        .unwrap();
    assert_eq!(created_only.len(), 2);

    let created_enabled = SubscriptionRepo::list(&pool, Some("appointment.created"), Some(true))
        .await
        .unwrap();
    assert_eq!(created_enabled.len(), 1);
    assert_eq!(created_enabled[0].target_url, "https://a/h");
}

/// A row that fails to decode is skipped; resolution still returns the
/// remaining subscriptions.
#[sqlx::test(migrations = "../../db/migrations")]
async fn resolution_skips_undecodable_row(pool: PgPool) {
    let valid = SubscriptionRepo::create(
        &pool,
        "appointment.created",
        "https://good.example.com/hook",
        "secret-good",
        true,
    )
    .await
    .unwrap();

    // Relax the schema so an enabled row with a NULL secret can exist; such
    // a row passes the topic/enabled filter but cannot decode into the
    // entity model.
    sqlx::query("ALTER TABLE webhook_subscriptions ALTER COLUMN secret DROP NOT NULL")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO webhook_subscriptions (event_name, target_url, secret, enabled) \
         VALUES ('appointment.created', 'https://bad.example.com/hook', NULL, TRUE)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let resolved = SubscriptionRepo::list_enabled_for_event(&pool, "appointment.created")
        .await
        .unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, valid.id);
}

/// Empty required fields are rejected by the schema CHECK constraints.
#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_secret_is_rejected(pool: PgPool) {
    let result =
        SubscriptionRepo::create(&pool, "appointment.created", "https://a/h", "", true).await;
    assert!(result.is_err());
}
