use crate::feed::{FeedAdapter, ResultSet};

use super::mode::{DisplayMode, FeedId};

/// Feed list pane: one adapter plus the selection highlight.
///
/// Panes are pooled by the controller and survive tab switches, so the
/// adapter keeps its bound rows while the tab is hidden.
pub struct FeedPane {
    feed: FeedId,
    adapter: FeedAdapter,
    selected_id: Option<String>,
    selected_position: Option<usize>,
}

impl FeedPane {
    pub fn new(feed: FeedId, cache_capacity: usize) -> Self {
        Self {
            feed,
            adapter: FeedAdapter::with_cache_capacity(cache_capacity),
            selected_id: None,
            selected_position: None,
        }
    }

    pub fn feed(&self) -> FeedId {
        self.feed
    }

    pub fn adapter(&self) -> &FeedAdapter {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut FeedAdapter {
        &mut self.adapter
    }

    /// Rebind the adapter and re-resolve the highlighted object against the
    /// new rows.
    pub fn rebind(&mut self, result_set: Box<dyn ResultSet>) {
        self.adapter.rebind(result_set);
        self.selected_position = match self.selected_id.as_deref() {
            Some(id) => self.adapter.find_position_by_id(id),
            None => None,
        };
    }

    /// Highlight the row showing object `id`, if it is in the list.
    pub fn set_selected_item(&mut self, id: &str) {
        self.selected_position = self.adapter.find_position_by_id(id);
        self.selected_id = Some(id.to_string());
        tracing::trace!(feed = %self.feed, id, position = ?self.selected_position, "Feed selection");
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
        self.selected_position = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Row currently highlighted.
    pub fn selected_position(&self) -> Option<usize> {
        self.selected_position
    }
}

/// Detail pane for a single object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPane {
    pub id: String,
    /// Mode the pane was opened in.
    pub mode: DisplayMode,
}
