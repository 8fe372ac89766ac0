use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::display::{DisplayController, DisplayMode, FeedId, SessionState};
use crate::feed::{RowError, RowViewModel};
use crate::storage::{Database, NewActivity};

// ============================================================================
// Application State
// ============================================================================

/// The feed screen: display controller wired to the local activity store.
///
/// The store is the only source of result sets. Whenever rows change, a fresh
/// snapshot is loaded and handed to the affected pane's `rebind`, so panes
/// never see a partially replaced result set.
pub struct App {
    pub db: Database,
    pub config: Config,
    pub controller: DisplayController,
}

impl App {
    pub fn new(db: Database, config: Config, is_wide: bool) -> Self {
        let controller =
            DisplayController::with_cache_capacity(is_wide, config.position_cache_capacity);
        Self {
            db,
            config,
            controller,
        }
    }

    /// Bring up the screen: restore the saved session when enabled, otherwise
    /// select the default tab. Returns whether a session was restored.
    pub async fn start(&mut self) -> Result<bool> {
        if self.config.restore_session && self.restore_session().await? {
            return Ok(true);
        }
        self.select_tab(self.config.default_tab).await?;
        Ok(false)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Select a feed tab, loading its rows the first time it is shown.
    pub async fn select_tab(&mut self, feed: FeedId) -> Result<()> {
        self.controller.select_tab(feed);
        let needs_rows = self
            .controller
            .feed_pane()
            .is_some_and(|pane| !pane.adapter().is_bound());
        if needs_rows {
            self.refresh_feed(feed).await?;
        }
        Ok(())
    }

    /// Show an object, by id, in `mode`.
    pub fn show_object(&mut self, id: &str, mode: DisplayMode) -> Result<()> {
        self.controller
            .show_object(id, mode)
            .with_context(|| format!("Failed to show object {id}"))
    }

    /// Position of `id` in the current feed.
    pub fn find_in_current_feed(&mut self, id: &str) -> Option<usize> {
        self.controller
            .feed_pane_mut()?
            .adapter_mut()
            .find_position_by_id(id)
    }

    // ========================================================================
    // Store → Panes
    // ========================================================================

    /// Reload `feed` from the store into its pooled pane, if one exists.
    pub async fn refresh_feed(&mut self, feed: FeedId) -> Result<()> {
        let Some(pane) = self.controller.feed_pane_for(feed) else {
            tracing::debug!(feed = %feed, "No pane for feed, skipping refresh");
            return Ok(());
        };
        let result_set = self
            .db
            .load_feed(feed)
            .await
            .with_context(|| format!("Failed to load feed {feed}"))?;
        pane.rebind(Box::new(result_set));
        Ok(())
    }

    pub async fn refresh_current_feed(&mut self) -> Result<()> {
        match self.controller.current_feed() {
            Some(feed) => self.refresh_feed(feed).await,
            None => Ok(()),
        }
    }

    /// Store delivered activities and rebind every pane whose feed changed.
    pub async fn ingest(&mut self, activities: &[NewActivity]) -> Result<usize> {
        let stored = self.db.upsert_activities(activities).await?;
        let touched: HashSet<FeedId> = activities.iter().map(|a| a.feed).collect();
        for feed in touched {
            self.refresh_feed(feed).await?;
        }
        Ok(stored)
    }

    /// View models for every row of the current feed.
    ///
    /// # Errors
    ///
    /// Fails on the first row whose stored payload is corrupt.
    pub fn current_rows(&mut self) -> Result<Vec<RowViewModel>, RowError> {
        let Some(pane) = self.controller.feed_pane_mut() else {
            return Ok(Vec::new());
        };
        let adapter = pane.adapter_mut();
        (0..adapter.row_count())
            .map(|position| adapter.row_at(position))
            .collect()
    }

    // ========================================================================
    // Session Persistence
    // ========================================================================

    pub async fn save_session(&self) -> Result<SessionState> {
        let state = self.controller.snapshot();
        self.db
            .save_session(&state)
            .await
            .context("Failed to save session")?;
        tracing::debug!(?state, "Session saved");
        Ok(state)
    }

    /// Replay the saved session, if any, then load the restored feed's rows.
    pub async fn restore_session(&mut self) -> Result<bool> {
        let Some(state) = self.db.load_session().await? else {
            return Ok(false);
        };
        self.controller
            .restore(&state)
            .context("Failed to restore session")?;
        // Rows load after the transitions; the pane re-resolves its selection
        // against them on rebind.
        self.refresh_current_feed().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::PaneVisibility;
    use serde_json::json;

    async fn test_app(is_wide: bool) -> App {
        let db = Database::open(":memory:").await.unwrap();
        App::new(db, Config::default(), is_wide)
    }

    fn activity(feed: FeedId, n: u32, kind: &str) -> NewActivity {
        NewActivity {
            feed,
            activity: json!({
                "id": format!("act-{n}"),
                "published": format!("2013-06-{:02}T12:00:00Z", n),
                "object": {"id": format!("obj-{n}"), "objectType": kind}
            }),
            replies: n,
            likes: 0,
            shares: 0,
        }
    }

    #[tokio::test]
    async fn test_start_without_session_selects_default_tab() {
        let mut app = test_app(false).await;
        assert!(!app.start().await.unwrap());
        assert_eq!(app.controller.current_feed(), Some(FeedId::Major));
        assert!(app.controller.feed_pane().unwrap().adapter().is_bound());
    }

    #[tokio::test]
    async fn test_ingest_rebinds_bound_pane() {
        let mut app = test_app(false).await;
        app.start().await.unwrap();
        assert!(app.current_rows().unwrap().is_empty());

        app.ingest(&[
            activity(FeedId::Major, 1, "note"),
            activity(FeedId::Major, 2, "image"),
            activity(FeedId::Minor, 3, "note"),
        ])
        .await
        .unwrap();

        let rows = app.current_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].object_id(), Some("obj-2"));
        assert_eq!(app.find_in_current_feed("obj-1"), Some(1));
        // Minor has no pane yet
        assert_eq!(app.controller.pooled_panes(), 1);
    }

    #[tokio::test]
    async fn test_session_round_trip_through_store() {
        let mut app = test_app(true).await;
        app.start().await.unwrap();
        app.ingest(&[
            activity(FeedId::Minor, 1, "note"),
            activity(FeedId::Minor, 2, "note"),
        ])
        .await
        .unwrap();
        app.select_tab(FeedId::Minor).await.unwrap();
        app.show_object("obj-1", DisplayMode::FeedAndObject).unwrap();
        app.save_session().await.unwrap();

        let mut restored = App::new(app.db.clone(), Config::default(), true);
        assert!(restored.start().await.unwrap());
        assert_eq!(restored.controller.mode(), DisplayMode::FeedAndObject);
        assert_eq!(restored.controller.current_feed(), Some(FeedId::Minor));
        let pane = restored.controller.feed_pane().unwrap();
        assert_eq!(pane.selected_id(), Some("obj-1"));
        assert_eq!(pane.selected_position(), Some(1));
        assert_eq!(
            restored.controller.pane_visibility(),
            PaneVisibility {
                feed: true,
                content: true
            }
        );
    }

    #[tokio::test]
    async fn test_restore_disabled_ignores_saved_session() {
        let mut app = test_app(false).await;
        app.start().await.unwrap();
        app.show_object("obj-1", DisplayMode::Object).unwrap();
        app.save_session().await.unwrap();

        let config = Config {
            restore_session: false,
            ..Config::default()
        };
        let mut fresh = App::new(app.db.clone(), config, false);
        assert!(!fresh.start().await.unwrap());
        assert_eq!(fresh.controller.mode(), DisplayMode::Feed);
    }

    #[tokio::test]
    async fn test_show_object_in_feed_mode_is_an_error() {
        let mut app = test_app(false).await;
        app.start().await.unwrap();
        let err = app.show_object("obj-1", DisplayMode::Feed).unwrap_err();
        assert!(err.to_string().contains("obj-1"));
    }
}
