use anyhow::Result;

use super::schema::Database;
use crate::display::SessionState;

/// `screen_state` row holding the serialized navigation state.
const NAVIGATION_KEY: &str = "navigation";

impl Database {
    // ========================================================================
    // Screen State
    // ========================================================================

    /// Persist the screen's navigation state, replacing the previous one.
    pub async fn save_session(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.put_state(NAVIGATION_KEY, &json).await
    }

    /// Load the saved navigation state.
    ///
    /// A missing entry yields `None`. A corrupt entry is logged and treated
    /// as missing so a bad snapshot never blocks startup.
    pub async fn load_session(&self) -> Result<Option<SessionState>> {
        let Some(json) = self.fetch_state(NAVIGATION_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session snapshot");
                Ok(None)
            }
        }
    }

    /// Drop the saved navigation state. Returns whether one existed.
    pub async fn clear_session(&self) -> Result<bool> {
        let result = sqlx::query("DELETE FROM screen_state WHERE key = ?")
            .bind(NAVIGATION_KEY)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_state(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM screen_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn put_state(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO screen_state (key, value, saved_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, saved_at = excluded.saved_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        tracing::trace!(key, bytes = value.len(), "Screen state saved");
        Ok(())
    }
}
