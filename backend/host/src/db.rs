//! Database layer: migrations, snapshot persistence and the event log.

use std::time::Duration;

use launchpad_pool::{Snapshot, Timestamp};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{EventRecord, StoredEvent};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    // Every connection to `:memory:` opens a fresh database, so keep exactly one alive.
    let in_memory = url.contains(":memory:");
    let url = if in_memory || url.contains("mode=") {
        url
    } else {
        // Make sure the file is created if it doesn't exist yet.
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}mode=rwc")
    };

    let mut options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
    if in_memory {
        options = options
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }
    let pool = options.connect(&url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Snapshot & clock
// ─────────────────────────────────────────────────────────

/// Load the latest committed snapshot, if any.
pub async fn load_snapshot(pool: &SqlitePool) -> Result<Option<Snapshot>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT state FROM engine_snapshot WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    match row {
        Some((state,)) => Ok(Some(serde_json::from_str(&state)?)),
        None => Ok(None),
    }
}

/// Load the persisted host clock, if one was ever recorded.
pub async fn load_clock(pool: &SqlitePool) -> Result<Option<Timestamp>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT clock FROM host_clock WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(clock,)| clock as Timestamp))
}

/// Record `clock` as the highest time handed to the engine.
pub async fn save_clock(pool: &SqlitePool, clock: Timestamp) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO host_clock (id, clock) VALUES (1, ?1)
        ON CONFLICT (id) DO UPDATE SET clock = MAX(clock, excluded.clock)
        "#,
    )
    .bind(clock as i64)
    .execute(pool)
    .await?;
    Ok(())
}

/// Atomically persist the next engine image and the event that produced it.
/// Either both land or neither does.
pub async fn commit(pool: &SqlitePool, snapshot: &Snapshot, event: &StoredEvent) -> Result<()> {
    let state = serde_json::to_string(snapshot)?;
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO events
            (event_type, pool_id, proposal_id, actor, amount, payload, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&event.event_type)
    .bind(&event.pool_id)
    .bind(&event.proposal_id)
    .bind(&event.actor)
    .bind(&event.amount)
    .bind(&event.payload)
    .bind(event.timestamp)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO engine_snapshot (id, version, state, updated_at)
        VALUES (1, ?1, ?2, ?3)
        ON CONFLICT (id) DO UPDATE SET
            version = excluded.version,
            state = excluded.state,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(snapshot.version() as i64)
    .bind(&state)
    .bind(chrono::Utc::now().timestamp())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// Fetch all events for a given pool, in commit order.
pub async fn get_events_for_pool(pool: &SqlitePool, pool_id: u64) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_type, pool_id, proposal_id, actor, amount, payload,
               timestamp, created_at
        FROM   events
        WHERE  pool_id = ?1
        ORDER  BY id ASC
        "#,
    )
    .bind(pool_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all events, in commit order.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_type, pool_id, proposal_id, actor, amount, payload,
               timestamp, created_at
        FROM   events
        ORDER  BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_events(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
