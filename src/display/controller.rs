use std::collections::HashMap;

use super::mode::{DisplayError, DisplayMode, FeedId, NavigationMode, PaneVisibility};
use super::overlay::{OverlayChrome, OverlayContent, OverlayHandle, OverlaySlot};
use super::pane::{FeedPane, ObjectPane};

/// Display-mode state machine for the feed screen.
///
/// Owns the current mode, the pool of feed panes (one per feed, created on
/// first selection), the shown object pane with its navigation history, and
/// the overlay slot. Every change of mode evicts the active overlay before
/// the new mode takes effect.
pub struct DisplayController {
    mode: DisplayMode,
    is_wide: bool,
    tabs: HashMap<FeedId, FeedPane>,
    current_feed: Option<FeedId>,
    object: Option<ObjectPane>,
    /// Object navigation entries, most recent last.
    history: Vec<ObjectPane>,
    overlay: OverlaySlot,
    cache_capacity: usize,
}

impl DisplayController {
    /// Controller for a wide (two-pane) or narrow layout.
    pub fn new(is_wide: bool) -> Self {
        Self::with_cache_capacity(is_wide, 0)
    }

    /// Like [`DisplayController::new`], with the position cache size used by
    /// every feed pane (0 = default).
    pub fn with_cache_capacity(is_wide: bool, cache_capacity: usize) -> Self {
        Self {
            mode: DisplayMode::Feed,
            is_wide,
            tabs: HashMap::new(),
            current_feed: None,
            object: None,
            history: Vec::new(),
            overlay: OverlaySlot::new(),
            cache_capacity,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn set_display_mode(&mut self, mode: DisplayMode) {
        tracing::debug!(from = %self.mode, to = %mode, "Display mode change");
        if mode != self.mode {
            self.overlay.evict();
        }
        self.mode = mode;
    }

    /// Bind the pane for `feed` (creating it on first use) and return to the
    /// feed list, detaching any shown object.
    pub fn select_tab(&mut self, feed: FeedId) {
        if self.current_feed == Some(feed) {
            tracing::info!(feed = %feed, "Reselect feed");
        } else {
            tracing::info!(feed = %feed, "Select feed");
        }

        let capacity = self.cache_capacity;
        self.tabs
            .entry(feed)
            .or_insert_with(|| FeedPane::new(feed, capacity));

        self.set_display_mode(DisplayMode::Feed);

        if self.object.take().is_some() {
            self.history.clear();
            if let Some(pane) = self.feed_pane_mut() {
                pane.clear_selection();
            }
        }
        self.current_feed = Some(feed);
    }

    /// Show object `id` in `mode`.
    ///
    /// Opening an object next to the feed replaces the previous object's
    /// navigation entry instead of stacking on it.
    ///
    /// # Errors
    ///
    /// `DisplayError::InvalidObjectMode` if `mode` is [`DisplayMode::Feed`].
    pub fn show_object(&mut self, id: &str, mode: DisplayMode) -> Result<(), DisplayError> {
        if mode == DisplayMode::Feed {
            return Err(DisplayError::InvalidObjectMode(mode));
        }

        if self.object.is_some() && mode == DisplayMode::FeedAndObject {
            self.history.pop();
        }
        let pane = ObjectPane {
            id: id.to_string(),
            mode,
        };
        self.history.push(pane.clone());
        self.attach_object(pane);
        Ok(())
    }

    fn attach_object(&mut self, pane: ObjectPane) {
        let mode = pane.mode;
        if mode == DisplayMode::FeedAndObject {
            if let Some(feed_pane) = self.feed_pane_mut() {
                feed_pane.set_selected_item(&pane.id);
            }
        }
        self.object = Some(pane);
        self.set_display_mode(mode);
    }

    /// Detach the shown object and return to the feed.
    ///
    /// Returns `false` (and does nothing) when no object is shown.
    pub fn dismiss_object(&mut self) -> bool {
        if self.object.take().is_none() {
            return false;
        }
        self.history.clear();
        self.set_display_mode(DisplayMode::Feed);
        if let Some(pane) = self.feed_pane_mut() {
            pane.clear_selection();
        }
        true
    }

    /// Pop one navigation entry, showing the previous object if there is one.
    ///
    /// Returns `false` when there was nothing to pop.
    pub fn navigate_back(&mut self) -> bool {
        if self.history.pop().is_none() {
            return false;
        }
        match self.history.last().cloned() {
            Some(previous) => self.attach_object(previous),
            None => {
                self.dismiss_object();
            }
        }
        true
    }

    /// Pop the entire navigation history.
    pub fn navigate_home(&mut self) -> bool {
        let popped = !self.history.is_empty();
        self.history.clear();
        self.dismiss_object() || popped
    }

    /// Record the layout class. Not a mode change: the overlay stays.
    pub fn layout_class_changed(&mut self, is_wide: bool) {
        if is_wide != self.is_wide {
            tracing::info!(is_wide, "Layout class changed");
        }
        self.is_wide = is_wide;
    }

    // ========================================================================
    // Overlay
    // ========================================================================

    /// Show a fullscreen overlay, evicting any active one.
    pub fn show_overlay(
        &mut self,
        chrome: Box<dyn OverlayChrome>,
        content: OverlayContent,
    ) -> OverlayHandle {
        self.overlay.show(chrome, content)
    }

    /// Hide the overlay identified by `handle`; stale handles are ignored.
    pub fn hide_overlay(&mut self, handle: OverlayHandle) -> bool {
        self.overlay.hide(handle)
    }

    pub fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }

    pub fn is_fullscreen(&self) -> bool {
        self.overlay.is_fullscreen()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_wide(&self) -> bool {
        self.is_wide
    }

    /// Feed and object side by side.
    pub fn is_two_pane(&self) -> bool {
        self.is_wide && self.mode == DisplayMode::FeedAndObject
    }

    pub fn navigation_mode(&self) -> NavigationMode {
        NavigationMode::for_mode(self.mode, self.is_wide)
    }

    pub fn pane_visibility(&self) -> PaneVisibility {
        PaneVisibility::for_mode(self.mode, self.is_wide)
    }

    pub fn current_feed(&self) -> Option<FeedId> {
        self.current_feed
    }

    /// Tab index of the bound feed; feeds without a tab report `None`.
    pub fn selected_tab_index(&self) -> Option<usize> {
        self.current_feed.and_then(FeedId::tab_index)
    }

    pub fn feed_pane(&self) -> Option<&FeedPane> {
        self.tabs.get(&self.current_feed?)
    }

    pub fn feed_pane_mut(&mut self) -> Option<&mut FeedPane> {
        self.tabs.get_mut(&self.current_feed?)
    }

    /// Pooled pane for `feed`, whether or not it is the bound one.
    pub fn feed_pane_for(&mut self, feed: FeedId) -> Option<&mut FeedPane> {
        self.tabs.get_mut(&feed)
    }

    /// Number of feed panes created so far.
    pub fn pooled_panes(&self) -> usize {
        self.tabs.len()
    }

    pub fn object(&self) -> Option<&ObjectPane> {
        self.object.as_ref()
    }

    pub fn object_id(&self) -> Option<&str> {
        self.object.as_ref().map(|o| o.id.as_str())
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }
}
