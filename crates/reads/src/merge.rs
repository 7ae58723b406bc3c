//! K-way merge of [`ResultSet`]s ordered by tag set.
//!
//! Every input stream is already sorted. The merge keeps one series per
//! stream in flight and repeatedly hands out the smallest one, so the work
//! per emitted series is `O(log k)` for `k` live streams.
//!
//! The first stream that reports an error ends the merge: the error is
//! kept, every other stream is closed right away, and `next` returns
//! `false` from then on.

use cursors::{Cursor, CursorStats, SourceError};
use models::Tags;
use tracing::{debug, trace, warn};

use crate::heap::ResultSetHeap;
use crate::ResultSet;

static EMPTY_TAGS: Tags = Tags::empty();

/// Merges `results` into a single stream.
///
/// An empty list has nothing to merge and yields `None`. A single stream is
/// returned as-is, without any merge overhead.
pub fn new_merged_result_set(mut results: Vec<Box<dyn ResultSet>>) -> Option<Box<dyn ResultSet>> {
    match results.len() {
        0 => None,
        1 => results.pop(),
        _ => Some(Box::new(MergedResultSet::new(results))),
    }
}

/// A [`ResultSet`] producing the series of many result sets in ascending
/// tag order. Series with equal tags from different sources are all
/// produced; nothing is deduplicated.
pub struct MergedResultSet {
    heap: ResultSetHeap,
    /// First error reported by any source. Never cleared.
    err: Option<SourceError>,
    /// `init` already positioned every source, so the first `next` only
    /// has to report that the root is valid.
    first: bool,
    /// Stats of the sources that have been exhausted and closed.
    stats: CursorStats,
}

impl MergedResultSet {
    /// Takes ownership of `results` and positions each on its first series.
    ///
    /// Sources that yield nothing on their first advance are closed
    /// immediately and left out of the merge, even when they report an
    /// error. Their stats are not carried into [`ResultSet::stats`].
    pub fn new(results: Vec<Box<dyn ResultSet>>) -> Self {
        let sources = results.len();
        let heap = ResultSetHeap::init(results);
        trace!(sources, active = heap.len(), "merging result sets");

        Self {
            heap,
            err: None,
            first: true,
            stats: CursorStats::default(),
        }
    }

    /// Number of sources still open.
    pub fn active_sources(&self) -> usize {
        self.heap.len()
    }

    fn close_all(&mut self) {
        for mut rs in self.heap.drain() {
            rs.close();
        }
    }
}

impl ResultSet for MergedResultSet {
    fn next(&mut self) -> bool {
        if self.heap.is_empty() {
            return false;
        }

        if self.first {
            self.first = false;
            return true;
        }

        if let Some(top) = self.heap.root_mut() {
            if top.next() {
                self.heap.fix_root();
                return true;
            }
        }

        // The root ran dry (or failed): retire it.
        let mut top = match self.heap.pop_root() {
            Some(top) => top,
            None => return false,
        };
        let err = top.err();
        let stats = top.stats();
        top.close();
        self.stats.add(stats);

        match err {
            Some(err) => {
                warn!(error = %err, remaining = self.heap.len(), "result set failed, closing merge");
                if self.err.is_none() {
                    self.err = Some(err);
                }
                self.close_all();
            }
            None => debug!(remaining = self.heap.len(), "result set exhausted"),
        }

        !self.heap.is_empty()
    }

    fn tags(&self) -> &Tags {
        match self.heap.root() {
            Some(rs) => rs.tags(),
            None => &EMPTY_TAGS,
        }
    }

    fn cursor(&mut self) -> Option<Box<dyn Cursor>> {
        self.heap.root_mut()?.cursor()
    }

    fn err(&self) -> Option<SourceError> {
        self.err.clone()
    }

    fn close(&mut self) {
        self.close_all();
    }

    fn stats(&self) -> CursorStats {
        self.stats
    }
}

/// Sources still owned by the merge are closed when it goes away.
impl Drop for MergedResultSet {
    fn drop(&mut self) {
        self.close_all();
    }
}
