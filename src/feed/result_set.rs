use super::row::FeedRow;

/// Positionable, row-counted view over a set of activity rows.
///
/// Implementations may be an in-memory snapshot, a database cursor or a paged
/// loader. The adapter only ever repositions the cursor and reads the current
/// row.
pub trait ResultSet {
    /// Number of rows.
    fn count(&self) -> usize;

    /// Current cursor position, `None` before the first `seek`.
    fn position(&self) -> Option<usize>;

    /// Move the cursor to `position`. Returns `false` (cursor unchanged) if
    /// the position is out of range.
    fn seek(&mut self, position: usize) -> bool;

    /// Row under the cursor.
    fn current_row(&self) -> Option<&FeedRow>;

    /// Step the cursor forward by one row.
    fn advance(&mut self) -> bool {
        let next = self.position().map_or(0, |p| p + 1);
        self.seek(next)
    }

    /// Release any resource held by the result set. Called exactly once by
    /// the adapter when the set is replaced or the adapter is released.
    fn close(&mut self) {}
}

/// Array-backed [`ResultSet`].
#[derive(Debug, Default, Clone)]
pub struct SnapshotResultSet {
    rows: Vec<FeedRow>,
    cursor: Option<usize>,
    closed: bool,
}

impl SnapshotResultSet {
    pub fn new(rows: Vec<FeedRow>) -> Self {
        Self {
            rows,
            cursor: None,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl From<Vec<FeedRow>> for SnapshotResultSet {
    fn from(rows: Vec<FeedRow>) -> Self {
        Self::new(rows)
    }
}

impl ResultSet for SnapshotResultSet {
    fn count(&self) -> usize {
        self.rows.len()
    }

    fn position(&self) -> Option<usize> {
        self.cursor
    }

    fn seek(&mut self, position: usize) -> bool {
        if position < self.rows.len() {
            self.cursor = Some(position);
            true
        } else {
            false
        }
    }

    fn current_row(&self) -> Option<&FeedRow> {
        self.rows.get(self.cursor?)
    }

    fn close(&mut self) {
        self.rows = Vec::new();
        self.cursor = None;
        self.closed = true;
    }
}
