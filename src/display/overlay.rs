//! Fullscreen overlay ("chrome") exclusivity.
//!
//! At most one overlay is active. Showing a new overlay evicts the current
//! one first; hiding is keyed by the handle returned from `show`, so a late
//! hide request from an overlay that was already replaced does nothing.

/// Owner of an overlay's content, told when someone else tears it down.
pub trait OverlayChrome {
    /// The overlay content was removed without the chrome asking for it.
    fn content_dismissed(&mut self);
}

/// Identity of one `show` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle(u64);

/// What the overlay displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    /// Page or media the embedded view was opened for.
    pub source: String,
}

impl OverlayContent {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

struct ActiveOverlay {
    handle: OverlayHandle,
    chrome: Box<dyn OverlayChrome>,
    content: OverlayContent,
}

/// Single slot holding the active overlay, if any.
#[derive(Default)]
pub struct OverlaySlot {
    active: Option<ActiveOverlay>,
    next_handle: u64,
}

impl OverlaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an overlay, evicting the current one first.
    pub fn show(
        &mut self,
        chrome: Box<dyn OverlayChrome>,
        content: OverlayContent,
    ) -> OverlayHandle {
        self.evict();

        let handle = OverlayHandle(self.next_handle);
        self.next_handle += 1;
        tracing::debug!(handle = handle.0, source = %content.source, "Showing overlay");
        self.active = Some(ActiveOverlay {
            handle,
            chrome,
            content,
        });
        handle
    }

    /// Detach the overlay if `handle` is the active one.
    ///
    /// Returns `false` for stale handles.
    pub fn hide(&mut self, handle: OverlayHandle) -> bool {
        self.take_if(handle).is_some()
    }

    /// Hide the active overlay and tell its chrome the content is gone.
    pub fn evict(&mut self) {
        let Some(handle) = self.active_handle() else {
            return;
        };
        if let Some(mut overlay) = self.take_if(handle) {
            overlay.chrome.content_dismissed();
        }
    }

    fn take_if(&mut self, handle: OverlayHandle) -> Option<ActiveOverlay> {
        if self.active_handle() != Some(handle) {
            tracing::debug!(handle = handle.0, "Ignoring hide for inactive overlay");
            return None;
        }
        tracing::debug!(handle = handle.0, "Overlay hidden");
        self.active.take()
    }

    pub fn active_handle(&self) -> Option<OverlayHandle> {
        self.active.as_ref().map(|a| a.handle)
    }

    /// Content of the active overlay, for the layer that renders it.
    pub fn content(&self) -> Option<&OverlayContent> {
        self.active.as_ref().map(|a| &a.content)
    }

    /// True while an overlay owns the whole screen.
    pub fn is_fullscreen(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Chrome that counts dismissal callbacks.
    pub(crate) struct CountingChrome(pub Rc<Cell<usize>>);

    impl OverlayChrome for CountingChrome {
        fn content_dismissed(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    pub(crate) fn counting_chrome() -> (Box<CountingChrome>, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        (Box::new(CountingChrome(Rc::clone(&count))), count)
    }

    #[test]
    fn test_show_then_hide() {
        let mut slot = OverlaySlot::new();
        let (chrome, dismissed) = counting_chrome();

        let handle = slot.show(chrome, OverlayContent::new("https://example.com/video"));
        assert!(slot.is_fullscreen());
        assert_eq!(slot.content().unwrap().source, "https://example.com/video");

        assert!(slot.hide(handle));
        assert!(!slot.is_fullscreen());
        // Explicit hide does not notify the chrome
        assert_eq!(dismissed.get(), 0);
        // Second hide is a no-op
        assert!(!slot.hide(handle));
    }

    #[test]
    fn test_second_show_evicts_first() {
        let mut slot = OverlaySlot::new();
        let (first_chrome, first_dismissed) = counting_chrome();
        let (second_chrome, second_dismissed) = counting_chrome();

        let first = slot.show(first_chrome, OverlayContent::new("a"));
        let second = slot.show(second_chrome, OverlayContent::new("b"));

        assert_ne!(first, second);
        assert_eq!(first_dismissed.get(), 1);
        assert_eq!(slot.active_handle(), Some(second));

        // Late hide from the superseded overlay is ignored
        assert!(!slot.hide(first));
        assert_eq!(slot.active_handle(), Some(second));

        assert!(slot.hide(second));
        assert_eq!(second_dismissed.get(), 0);
        assert!(slot.active_handle().is_none());
    }

    #[test]
    fn test_evict_on_empty_slot_is_noop() {
        let mut slot = OverlaySlot::new();
        slot.evict();
        assert!(!slot.is_fullscreen());
    }
}
