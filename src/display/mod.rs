//! Pane and overlay coordination for the feed screen.
//!
//! # Module Structure
//!
//! - `mode` - Display modes, feeds/tabs and the visibility rules
//! - `pane` - Feed list and object panes
//! - `overlay` - Single-slot fullscreen overlay
//! - `controller` - The display-mode state machine
//! - `session` - Persisted navigation state

mod controller;
mod mode;
mod overlay;
mod pane;
mod session;

pub use controller::DisplayController;
pub use mode::{DisplayError, DisplayMode, FeedId, NavigationMode, PaneVisibility};
pub use overlay::{OverlayChrome, OverlayContent, OverlayHandle, OverlaySlot};
pub use pane::{FeedPane, ObjectPane};
pub use session::SessionState;
