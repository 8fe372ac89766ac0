//! Activity feed screen core.
//!
//! - [`feed`] binds a locally cached result set of activities to list rows
//! - [`display`] decides which panes and overlays are visible
//! - [`storage`] is the SQLite activity cache the screen reads from
//! - [`app`] wires the store to the display controller

pub mod app;
pub mod config;
pub mod display;
pub mod feed;
pub mod storage;
pub mod util;
