//! Navigation state persisted across restarts.
//!
//! Restoring never assigns controller fields directly: it replays
//! `select_tab` and `show_object` so pane visibility, selection highlight and
//! overlay eviction are re-established by the same transitions a user would
//! trigger.
use serde::{Deserialize, Serialize};

use super::controller::DisplayController;
use super::mode::{DisplayError, DisplayMode, FeedId};

/// Serializable snapshot of the screen's navigation.
///
/// Unknown or missing fields fall back to defaults so older snapshots still
/// restore.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub mode: DisplayMode,
    /// Object shown in the content pane, if any.
    pub object_id: Option<String>,
    /// Bound feed. Covers feeds without a tab; absent in older snapshots.
    pub feed: Option<FeedId>,
    /// Index into the tab strip.
    pub selected_tab: usize,
}

impl DisplayController {
    /// Capture the current navigation state.
    pub fn snapshot(&self) -> SessionState {
        SessionState {
            mode: self.mode(),
            object_id: self.object_id().map(str::to_string),
            feed: self.current_feed(),
            selected_tab: self.selected_tab_index().unwrap_or(0),
        }
    }

    /// Replay a saved session.
    ///
    /// The saved feed wins over the tab index. Without a feed, an
    /// out-of-range tab index selects the first tab. A non-feed mode with no
    /// saved object restores to the feed.
    pub fn restore(&mut self, state: &SessionState) -> Result<(), DisplayError> {
        let feed = state
            .feed
            .or_else(|| FeedId::from_tab_index(state.selected_tab))
            .unwrap_or_else(|| {
                tracing::warn!(tab = state.selected_tab, "Saved tab out of range, using first tab");
                FeedId::TABS[0]
            });
        self.select_tab(feed);

        match (state.mode, state.object_id.as_deref()) {
            (DisplayMode::Feed, _) => {}
            (mode, Some(id)) => self.show_object(id, mode)?,
            (mode, None) => {
                tracing::warn!(mode = %mode, "Saved session has no object, restoring feed");
            }
        }
        tracing::debug!(mode = %self.mode(), tab = ?self.selected_tab_index(), "Session restored");
        Ok(())
    }
}
