use super::classify::PresentationVariant;
use super::position_cache::PositionCache;
use super::result_set::ResultSet;
use super::row::{RowError, RowViewModel};

/// Receives notice that every row position of an adapter must be treated as
/// changed.
pub trait RowObserver {
    fn rows_invalidated(&mut self, row_count: usize);
}

/// Binds a [`ResultSet`] to list rows for the presentation layer.
///
/// Owns the result set and an id → position cache. The cache is cleared in
/// the same call that replaces the result set, so a lookup can never return a
/// position from a previous set.
pub struct FeedAdapter {
    result_set: Option<Box<dyn ResultSet>>,
    positions: PositionCache,
    observers: Vec<Box<dyn RowObserver>>,
}

impl FeedAdapter {
    pub fn new() -> Self {
        Self::with_cache_capacity(0)
    }

    /// Adapter whose position cache holds `capacity` ids (0 = default).
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            result_set: None,
            positions: PositionCache::new(capacity),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn RowObserver>) {
        self.observers.push(observer);
    }

    /// Replace the backing result set.
    ///
    /// The previous set is closed, the position cache is cleared, and every
    /// observer is told all rows changed.
    pub fn rebind(&mut self, result_set: Box<dyn ResultSet>) {
        if let Some(mut previous) = self.result_set.take() {
            previous.close();
        }
        self.result_set = Some(result_set);
        self.positions.clear();

        let count = self.row_count();
        tracing::debug!(rows = count, "Feed adapter rebound");
        for observer in &mut self.observers {
            observer.rows_invalidated(count);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.result_set.is_some()
    }

    pub fn row_count(&self) -> usize {
        self.result_set.as_ref().map_or(0, |rs| rs.count())
    }

    /// Build the view model for `position`.
    ///
    /// Records the row's object id in the position cache as a side effect.
    ///
    /// # Errors
    ///
    /// `RowError::OutOfRange` if `position >= row_count()` (including when
    /// unbound); `RowError::MalformedPayload`/`NotAnObject` if the stored
    /// payload is not a JSON object.
    pub fn row_at(&mut self, position: usize) -> Result<RowViewModel, RowError> {
        let count = self.row_count();
        let out_of_range = RowError::OutOfRange { position, count };

        let Some(rs) = self.result_set.as_mut() else {
            return Err(out_of_range);
        };
        if !rs.seek(position) {
            return Err(out_of_range);
        }
        let row = rs.current_row().ok_or(out_of_range)?;

        let view = RowViewModel::from_row(row, position)?;
        if let Some(id) = view.object_id() {
            self.positions.record(id, position);
        }
        Ok(view)
    }

    /// Position of the row whose nested object has id `id`.
    ///
    /// Served from the position cache when possible; otherwise scans the
    /// whole result set front to back. A scan hit is not cached: only
    /// rendered rows populate the cache.
    pub fn find_position_by_id(&mut self, id: &str) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        if let Some(position) = self.positions.lookup(id) {
            return Some(position);
        }

        let rs = self.result_set.as_mut()?;
        if !rs.seek(0) {
            return None;
        }
        loop {
            if let (Some(position), Some(row)) = (rs.position(), rs.current_row()) {
                match row.object_id() {
                    Ok(Some(row_id)) if row_id == id => return Some(position),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(position, error = %e, "Skipping malformed row during id scan");
                    }
                }
            }
            if !rs.advance() {
                return None;
            }
        }
    }

    /// Number of presentation variants, for sizing view pools.
    pub fn variant_count(&self) -> usize {
        PresentationVariant::COUNT
    }

    /// Number of ids currently held by the position cache.
    pub fn cached_positions(&self) -> usize {
        self.positions.len()
    }

    /// Close and drop the backing result set. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(mut rs) = self.result_set.take() {
            rs.close();
            tracing::debug!("Feed adapter released result set");
        }
        self.positions.clear();
    }
}

impl Default for FeedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FeedAdapter {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::result_set::SnapshotResultSet;
    use crate::feed::row::FeedRow;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Snapshot wrapper that counts seeks and closes.
    struct Tracked {
        inner: SnapshotResultSet,
        seeks: Rc<Cell<usize>>,
        closes: Rc<Cell<usize>>,
    }

    impl ResultSet for Tracked {
        fn count(&self) -> usize {
            self.inner.count()
        }
        fn position(&self) -> Option<usize> {
            self.inner.position()
        }
        fn seek(&mut self, position: usize) -> bool {
            self.seeks.set(self.seeks.get() + 1);
            self.inner.seek(position)
        }
        fn current_row(&self) -> Option<&FeedRow> {
            self.inner.current_row()
        }
        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
            self.inner.close();
        }
    }

    struct Counters {
        seeks: Rc<Cell<usize>>,
        closes: Rc<Cell<usize>>,
    }

    fn tracked(rows: Vec<FeedRow>) -> (Box<Tracked>, Counters) {
        let seeks = Rc::new(Cell::new(0));
        let closes = Rc::new(Cell::new(0));
        let rs = Box::new(Tracked {
            inner: SnapshotResultSet::new(rows),
            seeks: Rc::clone(&seeks),
            closes: Rc::clone(&closes),
        });
        (rs, Counters { seeks, closes })
    }

    fn activity(id: Option<&str>, kind: Option<&str>) -> FeedRow {
        let mut object = serde_json::Map::new();
        if let Some(id) = id {
            object.insert("id".into(), json!(id));
        }
        if let Some(kind) = kind {
            object.insert("objectType".into(), json!(kind));
        }
        FeedRow::new(json!({"verb": "post", "object": object}).to_string())
    }

    fn abc() -> Vec<FeedRow> {
        vec![
            activity(Some("a"), Some("note")),
            activity(Some("b"), Some("image")),
            activity(Some("c"), None),
        ]
    }

    #[test]
    fn test_unbound_adapter() {
        let mut adapter = FeedAdapter::new();
        assert!(!adapter.is_bound());
        assert_eq!(adapter.row_count(), 0);
        assert_eq!(adapter.find_position_by_id("a"), None);
        assert!(matches!(
            adapter.row_at(0),
            Err(RowError::OutOfRange { position: 0, count: 0 })
        ));
        assert_eq!(adapter.variant_count(), 3);
    }

    #[test]
    fn test_three_row_scenario() {
        let mut adapter = FeedAdapter::new();
        adapter.rebind(Box::new(SnapshotResultSet::new(abc())));

        let variants: Vec<_> = (0..3).map(|p| adapter.row_at(p).unwrap().variant).collect();
        assert_eq!(
            variants,
            vec![
                PresentationVariant::Note,
                PresentationVariant::Image,
                PresentationVariant::Plain
            ]
        );
        assert_eq!(adapter.find_position_by_id("b"), Some(1));
    }

    #[test]
    fn test_row_at_populates_cache_for_hit_without_scan() {
        let (rs, counters) = tracked(abc());
        let mut adapter = FeedAdapter::new();
        adapter.rebind(rs);

        adapter.row_at(2).unwrap();
        let seeks_before = counters.seeks.get();
        assert_eq!(adapter.find_position_by_id("c"), Some(2));
        assert_eq!(counters.seeks.get(), seeks_before, "cache hit must not scan");
    }

    #[test]
    fn test_scan_does_not_populate_cache() {
        let mut adapter = FeedAdapter::new();
        adapter.rebind(Box::new(SnapshotResultSet::new(abc())));

        assert_eq!(adapter.find_position_by_id("c"), Some(2));
        assert_eq!(adapter.cached_positions(), 0);
        assert_eq!(adapter.find_position_by_id("zzz"), None);
    }

    #[test]
    fn test_rebind_clears_cache_and_closes_previous() {
        let (first, first_counters) = tracked(abc());
        let mut adapter = FeedAdapter::new();
        adapter.rebind(first);
        adapter.row_at(0).unwrap();
        adapter.row_at(1).unwrap();
        assert_eq!(adapter.cached_positions(), 2);

        // New set where "a" moved to position 2
        let moved = vec![
            activity(Some("x"), Some("note")),
            activity(Some("b"), Some("image")),
            activity(Some("a"), Some("note")),
        ];
        adapter.rebind(Box::new(SnapshotResultSet::new(moved)));

        assert_eq!(first_counters.closes.get(), 1);
        assert_eq!(adapter.cached_positions(), 0);
        assert_eq!(adapter.find_position_by_id("a"), Some(2));
    }

    #[test]
    fn test_rebind_notifies_observers() {
        struct Recorder(Rc<RefCell<Vec<usize>>>);
        impl RowObserver for Recorder {
            fn rows_invalidated(&mut self, row_count: usize) {
                self.0.borrow_mut().push(row_count);
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut adapter = FeedAdapter::new();
        adapter.add_observer(Box::new(Recorder(Rc::clone(&seen))));

        adapter.rebind(Box::new(SnapshotResultSet::new(abc())));
        adapter.rebind(Box::new(SnapshotResultSet::default()));

        assert_eq!(*seen.borrow(), vec![3, 0]);
    }

    #[test]
    fn test_row_without_identity_is_not_cached() {
        let mut adapter = FeedAdapter::new();
        adapter.rebind(Box::new(SnapshotResultSet::new(vec![
            FeedRow::new(json!({"verb": "follow"}).to_string()),
            activity(Some(""), Some("note")),
        ])));
        adapter.row_at(0).unwrap();
        adapter.row_at(1).unwrap();
        assert_eq!(adapter.cached_positions(), 0);
    }

    #[test]
    fn test_empty_id_is_never_found() {
        let mut adapter = FeedAdapter::new();
        adapter.rebind(Box::new(SnapshotResultSet::new(vec![activity(
            Some(""),
            Some("note"),
        )])));
        adapter.row_at(0).unwrap();
        assert_eq!(adapter.find_position_by_id(""), None);
    }

    #[test]
    fn test_scan_uses_stored_object_key() {
        let mut adapter = FeedAdapter::new();
        adapter.rebind(Box::new(SnapshotResultSet::new(vec![
            FeedRow::new("{broken").with_object_key(Some("kept".to_string())),
            activity(Some("b"), None),
        ])));
        // The unparseable payload is still found through its stored key
        assert_eq!(adapter.find_position_by_id("kept"), Some(0));
        assert_eq!(adapter.find_position_by_id("b"), Some(1));
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let mut adapter = FeedAdapter::new();
        adapter.rebind(Box::new(SnapshotResultSet::new(abc())));
        let err = adapter.row_at(3).unwrap_err();
        assert!(matches!(err, RowError::OutOfRange { position: 3, count: 3 }));
    }

    #[test]
    fn test_malformed_row_fails_but_scan_skips_it() {
        let mut adapter = FeedAdapter::new();
        adapter.rebind(Box::new(SnapshotResultSet::new(vec![
            FeedRow::new("{broken"),
            activity(Some("ok"), Some("note")),
        ])));

        assert!(matches!(
            adapter.row_at(0),
            Err(RowError::MalformedPayload { position: 0, .. })
        ));
        assert_eq!(adapter.find_position_by_id("ok"), Some(1));
    }

    #[test]
    fn test_release_is_idempotent_and_drop_closes() {
        let (rs, counters) = tracked(abc());
        let mut adapter = FeedAdapter::new();
        adapter.rebind(rs);

        adapter.release();
        adapter.release();
        assert_eq!(counters.closes.get(), 1);
        assert_eq!(adapter.row_count(), 0);

        let (rs, counters) = tracked(abc());
        {
            let mut adapter = FeedAdapter::new();
            adapter.rebind(rs);
        }
        assert_eq!(counters.closes.get(), 1);
    }
}
