//! Database-level tests for the append-only audit trail.

use chrono::{Duration, Utc};
use gatehouse_db::models::activity_log::{ActivityLogQuery, CreateActivityLog};
use gatehouse_db::repositories::ActivityLogRepo;
use sqlx::PgPool;
use uuid::Uuid;

fn entry(activity_type: &str, user_id: Option<Uuid>) -> CreateActivityLog {
    CreateActivityLog {
        activity_type: activity_type.to_string(),
        user_id,
        ip_address: "127.0.0.1".to_string(),
        user_agent: "test-agent".to_string(),
        details: serde_json::json!({ "email": "a@b.com" }),
        metadata: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_returns_row(pool: PgPool) {
    let created = ActivityLogRepo::create(&pool, &entry("AUTH_LOGIN", None))
        .await
        .expect("insert should succeed");

    assert_eq!(created.activity_type, "AUTH_LOGIN");
    assert_eq!(created.details["email"], "a@b.com");
    assert!(created.metadata.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_query_filters_and_ordering(pool: PgPool) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let first = ActivityLogRepo::create(&pool, &entry("AUTH_LOGIN", Some(alice)))
        .await
        .unwrap();
    ActivityLogRepo::create(&pool, &entry("AUTH_FAILED_ATTEMPT", Some(bob)))
        .await
        .unwrap();
    // Backdate the first record so ordering is deterministic.
    sqlx::query("UPDATE activity_logs SET timestamp = $2 WHERE id = $1")
        .bind(first.id)
        .bind(Utc::now() - Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();

    // Unfiltered query returns everything, newest first.
    let all = ActivityLogRepo::query(&pool, &ActivityLogQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].activity_type, "AUTH_FAILED_ATTEMPT");
    assert_eq!(all[1].activity_type, "AUTH_LOGIN");

    // Filter by user.
    let by_user = ActivityLogRepo::query(
        &pool,
        &ActivityLogQuery {
            user_id: Some(alice),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].user_id, Some(alice));

    // Filter by type.
    let by_type = ActivityLogRepo::query(
        &pool,
        &ActivityLogQuery {
            activity_type: Some("AUTH_FAILED_ATTEMPT".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_type.len(), 1);

    // Time range excluding the backdated record.
    let recent = ActivityLogRepo::query(
        &pool,
        &ActivityLogQuery {
            start: Some(Utc::now() - Duration::minutes(10)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].activity_type, "AUTH_FAILED_ATTEMPT");
}
