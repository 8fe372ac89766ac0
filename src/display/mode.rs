use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    /// `show_object` only accepts modes that include the content pane.
    #[error("Cannot show an object in {0} mode")]
    InvalidObjectMode(DisplayMode),

    #[error("Unknown display mode '{0}'")]
    UnknownMode(String),

    #[error("Unknown feed '{0}'")]
    UnknownFeed(String),
}

// ============================================================================
// Display Mode
// ============================================================================

/// Which panes the screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Feed list only
    #[default]
    Feed,
    /// An object opened from the feed, next to the feed on wide layouts
    FeedAndObject,
    /// An object on its own
    Object,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Feed => "feed",
            DisplayMode::FeedAndObject => "feed_and_object",
            DisplayMode::Object => "object",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(DisplayMode::Feed),
            "feed_and_object" | "feed-and-object" => Ok(DisplayMode::FeedAndObject),
            "object" => Ok(DisplayMode::Object),
            other => Err(DisplayError::UnknownMode(other.to_string())),
        }
    }
}

// ============================================================================
// Feeds and Tabs
// ============================================================================

/// Identifies one of the account's feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedId {
    /// Posts from followed accounts
    Major,
    /// Likes, follows and other minor activity
    Minor,
    /// Activities addressed directly to the account
    Direct,
}

impl FeedId {
    /// Feeds offered as navigation tabs, in tab order.
    pub const TABS: [FeedId; 2] = [FeedId::Major, FeedId::Minor];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedId::Major => "major",
            FeedId::Minor => "minor",
            FeedId::Direct => "direct",
        }
    }

    /// Index of this feed in the tab strip, if it has a tab.
    pub fn tab_index(self) -> Option<usize> {
        Self::TABS.iter().position(|&tab| tab == self)
    }

    pub fn from_tab_index(index: usize) -> Option<FeedId> {
        Self::TABS.get(index).copied()
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedId {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(FeedId::Major),
            "minor" => Ok(FeedId::Minor),
            "direct" => Ok(FeedId::Direct),
            other => Err(DisplayError::UnknownFeed(other.to_string())),
        }
    }
}

// ============================================================================
// Derived Presentation State
// ============================================================================

/// Navigation bar mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Feed tabs are shown
    Tabs,
    /// Single-item navigation, no tabs
    Standard,
}

/// Visibility of the two content regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneVisibility {
    pub feed: bool,
    pub content: bool,
}

impl PaneVisibility {
    /// Pane visibility for `mode` on a wide or narrow layout.
    pub fn for_mode(mode: DisplayMode, is_wide: bool) -> Self {
        match mode {
            DisplayMode::Feed => Self {
                feed: true,
                content: false,
            },
            DisplayMode::FeedAndObject => Self {
                feed: is_wide,
                content: true,
            },
            DisplayMode::Object => Self {
                feed: false,
                content: true,
            },
        }
    }
}

impl NavigationMode {
    /// Tabs show on wide layouts unless an object has the whole screen, and
    /// on narrow layouts only while the feed has the whole screen.
    pub fn for_mode(mode: DisplayMode, is_wide: bool) -> Self {
        let show_tabs = if is_wide {
            mode != DisplayMode::Object
        } else {
            mode == DisplayMode::Feed
        };
        if show_tabs {
            NavigationMode::Tabs
        } else {
            NavigationMode::Standard
        }
    }
}
