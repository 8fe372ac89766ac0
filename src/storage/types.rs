use thiserror::Error;

use crate::display::FeedId;
use crate::feed::FeedRow;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of feedpane appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_error(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY, SQLITE_LOCKED and SQLITE_CANTOPEN all mean another process
/// holds the file.
pub(crate) fn is_lock_error(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

// ============================================================================
// Activity Rows
// ============================================================================

/// An activity to store, as delivered by the sync collaborator.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewActivity {
    pub feed: FeedId,
    /// The activity document.
    pub activity: serde_json::Value,
    #[serde(default)]
    pub replies: u32,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub shares: u32,
}

/// Internal row type for activity queries (used by sqlx FromRow)
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ActivityDbRow {
    pub payload: String,
    pub object_id: Option<String>,
    pub replies: i64,
    pub likes: i64,
    pub shares: i64,
}

impl ActivityDbRow {
    pub(crate) fn into_feed_row(self) -> FeedRow {
        FeedRow::new(self.payload)
            .with_object_key(self.object_id)
            .with_counts(
                clamp_count(self.replies),
                clamp_count(self.likes),
                clamp_count(self.shares),
            )
    }
}

fn clamp_count(n: i64) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}
