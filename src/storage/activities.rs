use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::schema::Database;
use super::types::{ActivityDbRow, NewActivity};
use crate::display::FeedId;
use crate::feed::SnapshotResultSet;

/// Maximum number of rows materialized for one feed (OOM protection)
const MAX_ACTIVITIES: i64 = 2000;

/// Stable key for an activity: its `id`, or a content hash when it has none.
fn activity_key(activity: &Value) -> String {
    match activity.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            let digest = Sha256::digest(activity.to_string().as_bytes());
            format!("sha256:{:x}", digest)
        }
    }
}

/// Unix timestamp of the activity's RFC 3339 `published` field.
fn published_at(activity: &Value) -> Option<i64> {
    let raw = activity.get("published")?.as_str()?;
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.timestamp()),
        Err(e) => {
            tracing::debug!(published = raw, error = %e, "Unparseable published timestamp");
            None
        }
    }
}

fn object_id(activity: &Value) -> Option<&str> {
    activity
        .get("object")?
        .get("id")?
        .as_str()
        .filter(|id| !id.is_empty())
}

impl Database {
    // ========================================================================
    // Activity Operations
    // ========================================================================

    /// Insert or refresh activities, returning how many rows were written.
    ///
    /// Activities are keyed by `(feed, id)`; re-delivering an activity
    /// replaces its payload and counters.
    pub async fn upsert_activities(&self, activities: &[NewActivity]) -> Result<usize> {
        if activities.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for item in activities {
            let payload = serde_json::to_string(&item.activity)?;
            sqlx::query(
                r#"
                INSERT INTO activities
                    (feed, activity_id, object_id, payload, replies, likes, shares, published)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(feed, activity_id) DO UPDATE SET
                    object_id = excluded.object_id,
                    payload = excluded.payload,
                    replies = excluded.replies,
                    likes = excluded.likes,
                    shares = excluded.shares,
                    published = excluded.published
            "#,
            )
            .bind(item.feed.as_str())
            .bind(activity_key(&item.activity))
            .bind(object_id(&item.activity))
            .bind(&payload)
            .bind(i64::from(item.replies))
            .bind(i64::from(item.likes))
            .bind(i64::from(item.shares))
            .bind(published_at(&item.activity))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to store activity for feed {}", item.feed))?;
        }
        tx.commit().await?;

        tracing::debug!(count = activities.len(), "Stored activities");
        Ok(activities.len())
    }

    /// Materialize a feed as a result set, newest first.
    ///
    /// Activities without a parseable timestamp sort after dated ones,
    /// most recently inserted first.
    pub async fn load_feed(&self, feed: FeedId) -> Result<SnapshotResultSet> {
        let rows: Vec<ActivityDbRow> = sqlx::query_as(
            r#"
            SELECT payload, object_id, replies, likes, shares
            FROM activities
            WHERE feed = ?
            ORDER BY published IS NULL, published DESC, id DESC
            LIMIT ?
        "#,
        )
        .bind(feed.as_str())
        .bind(MAX_ACTIVITIES)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(feed = %feed, rows = rows.len(), "Loaded feed");
        Ok(SnapshotResultSet::new(
            rows.into_iter().map(ActivityDbRow::into_feed_row).collect(),
        ))
    }

    /// Number of stored activities in `feed`.
    pub async fn activity_count(&self, feed: FeedId) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM activities WHERE feed = ?")
            .bind(feed.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Remove every activity of `feed`, returning the number deleted.
    pub async fn clear_feed(&self, feed: FeedId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM activities WHERE feed = ?")
            .bind(feed.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
