//! Feed-to-view binding for activity rows.
//!
//! This module turns a locally cached set of activity rows into per-row view
//! models for a scrolling list:
//!
//! - **Classification**: map an activity payload to a presentation variant
//! - **Result sets**: positionable row access decoupled from storage
//! - **Adapter**: row view models plus an id → position lookup
//!
//! # Architecture
//!
//! - [`classify`] - Pure payload → [`PresentationVariant`] mapping
//! - [`position_cache`] - Bounded LRU of object id → row position
//! - [`row`] - Backing rows, view models and row errors
//! - [`result_set`] - The [`ResultSet`] trait and an array-backed snapshot
//! - [`adapter`] - [`FeedAdapter`], tying the above together
//!
//! # Example
//!
//! ```
//! use feedpane::feed::{FeedAdapter, FeedRow, PresentationVariant, SnapshotResultSet};
//!
//! let rows = vec![FeedRow::new(r#"{"object":{"id":"tag:a","objectType":"note"}}"#)];
//! let mut adapter = FeedAdapter::new();
//! adapter.rebind(Box::new(SnapshotResultSet::new(rows)));
//!
//! let row = adapter.row_at(0).unwrap();
//! assert_eq!(row.variant, PresentationVariant::Note);
//! assert_eq!(adapter.find_position_by_id("tag:a"), Some(0));
//! ```

pub mod adapter;
pub mod classify;
pub mod position_cache;
pub mod result_set;
pub mod row;

pub use adapter::{FeedAdapter, RowObserver};
pub use classify::{classify, PresentationVariant};
pub use position_cache::PositionCache;
pub use result_set::{ResultSet, SnapshotResultSet};
pub use row::{FeedRow, RowError, RowViewModel};
