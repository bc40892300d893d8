//! Integration tests for `LocationRepo` and `PgLocationStore`.
//!
//! These run against a real PostgreSQL instance (`DATABASE_URL`) and are
//! ignored by default. Run with `cargo test -p fleetintel-db -- --ignored`.
//!
//! Tests cover:
//! - Insert and latest-by-agent
//! - Descending recent-N ordering independent of insert order
//! - Inclusive, ascending time-window retrieval
//! - Agent partitioning and counting
//! - CHECK constraints on enum columns

use chrono::{DateTime, Duration, TimeZone, Utc};
use fleetintel_core::location::{NewLocation, TimestampSource};
use fleetintel_core::movement::{classify, MovementStatus};
use fleetintel_core::store::LocationStore;
use fleetintel_db::repositories::LocationRepo;
use fleetintel_db::PgLocationStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a `NewLocation` for `agent_id` at `recorded_at` with the given speed.
fn make_location(agent_id: &str, speed: f64, recorded_at: DateTime<Utc>) -> NewLocation {
    NewLocation {
        agent_id: agent_id.to_string(),
        latitude: 12.97,
        longitude: 77.59,
        speed,
        heading: 270.0,
        accuracy: 5.0,
        status: classify(speed),
        timestamp: recorded_at,
        timestamp_source: TimestampSource::Client,
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Test 1: Insert and latest
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn insert_then_latest_returns_record(pool: PgPool) {
    let inserted = LocationRepo::insert(&pool, &make_location("A1", 0.0, base_time()))
        .await
        .expect("insert should succeed");

    assert!(inserted.id > 0);
    assert_eq!(inserted.status, MovementStatus::Stopped);
    assert_eq!(inserted.timestamp, base_time());

    let latest = LocationRepo::find_latest_by_agent(&pool, "A1")
        .await
        .expect("latest query should succeed");
    assert_eq!(latest, Some(inserted));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn latest_for_unknown_agent_is_none(pool: PgPool) {
    let latest = LocationRepo::find_latest_by_agent(&pool, "nobody")
        .await
        .expect("latest query should succeed");
    assert!(latest.is_none());
}

// ---------------------------------------------------------------------------
// Test 2: Ordering by event time, not insertion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn recent_records_are_descending_by_event_time(pool: PgPool) {
    for minutes in [2, 0, 3, 1] {
        let dto = make_location("A1", 12.0, base_time() + Duration::minutes(minutes));
        LocationRepo::insert(&pool, &dto).await.expect("insert");
    }

    let rows = LocationRepo::find_by_agent(&pool, "A1", 10)
        .await
        .expect("query should succeed");
    let times: Vec<_> = rows.iter().map(|r| r.timestamp).collect();
    let expected: Vec<_> = (0..4)
        .rev()
        .map(|m| base_time() + Duration::minutes(m))
        .collect();
    assert_eq!(times, expected);

    let limited = LocationRepo::find_by_agent(&pool, "A1", 2)
        .await
        .expect("query should succeed");
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].timestamp, base_time() + Duration::minutes(3));
}

// ---------------------------------------------------------------------------
// Test 3: Time window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn range_is_inclusive_and_ascending(pool: PgPool) {
    let t1 = base_time();
    let t2 = t1 + Duration::minutes(5);
    let t3 = t1 + Duration::minutes(10);
    for t in [t3, t1, t2] {
        LocationRepo::insert(&pool, &make_location("A1", 8.0, t))
            .await
            .expect("insert");
    }

    let rows = LocationRepo::find_by_agent_and_range(&pool, "A1", t1, t2)
        .await
        .expect("range query should succeed");
    let times: Vec<_> = rows.iter().map(|r| r.timestamp).collect();
    assert_eq!(times, vec![t1, t2]);
}

// ---------------------------------------------------------------------------
// Test 4: Partitioning and counts through the store trait
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn store_partitions_and_counts_by_agent(pool: PgPool) {
    let store = PgLocationStore::new(pool);
    store
        .insert(&make_location("A1", 1.0, base_time()))
        .await
        .expect("insert A1");
    store
        .insert(&make_location("A1", 2.0, base_time() + Duration::minutes(1)))
        .await
        .expect("insert A1");
    store
        .insert(&make_location("B2", 3.0, base_time()))
        .await
        .expect("insert B2");

    assert_eq!(store.count_by_agent("A1").await.unwrap(), 2);
    assert_eq!(store.count_by_agent("B2").await.unwrap(), 1);
    assert_eq!(store.count_by_agent("C3").await.unwrap(), 0);
    assert!(store
        .select_by_agent("C3", 100)
        .await
        .unwrap()
        .is_empty());
    store.health_check().await.expect("health check");
}

// ---------------------------------------------------------------------------
// Test 5: Schema constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn invalid_status_is_rejected_by_check_constraint(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO locations (agent_id, latitude, longitude, status, timestamp_source, recorded_at) \
         VALUES ('A1', 1.0, 1.0, 'parked', 'client', now())",
    )
    .execute(&pool)
    .await;

    let err = result.expect_err("CHECK constraint should reject unknown status");
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("ck_locations_status"));
}
