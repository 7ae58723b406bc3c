//! Min-heap of active result sets.
//!
//! The heap is built once from the streams a merge starts with and only
//! ever shrinks. It offers no way to add a stream after [`ResultSetHeap::init`]:
//! the set of sources is fixed when the merge begins.
//!
//! Layout is the usual implicit binary heap over a dense `Vec`: the children
//! of `i` live at `2i + 1` and `2i + 2`, and index 0 holds the stream whose
//! current tags are smallest. Ties are broken by heap mechanics only.

use std::cmp::Ordering;

use models::compare_tags;
use tracing::warn;

use crate::ResultSet;

/// Active result sets ordered by their current tag set.
pub struct ResultSetHeap {
    items: Vec<Box<dyn ResultSet>>,
}

impl ResultSetHeap {
    /// Advances every stream once and heapifies the ones that produced a
    /// series. Streams that yield nothing on their first advance are closed
    /// here and never enter the heap, whether they were empty or failed.
    ///
    /// Runs in O(n) comparisons.
    pub fn init(results: Vec<Box<dyn ResultSet>>) -> Self {
        let mut items: Vec<Box<dyn ResultSet>> = Vec::with_capacity(results.len());
        for mut rs in results {
            if rs.next() {
                items.push(rs);
                continue;
            }
            if let Some(err) = rs.err() {
                warn!(error = %err, "result set failed on first advance, skipping it");
            }
            rs.close();
        }

        let mut heap = Self { items };
        for pos in (0..heap.items.len() / 2).rev() {
            heap.sift_down(pos);
        }
        heap
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The stream with the smallest current tags.
    pub fn root(&self) -> Option<&dyn ResultSet> {
        self.items.first().map(|rs| &**rs)
    }

    pub fn root_mut(&mut self) -> Option<&mut (dyn ResultSet + 'static)> {
        self.items.first_mut().map(|rs| &mut **rs)
    }

    /// Restores heap order after the root advanced to a new series.
    pub fn fix_root(&mut self) {
        if !self.items.is_empty() {
            self.sift_down(0);
        }
    }

    /// Removes and returns the root, restoring heap order over the rest.
    pub fn pop_root(&mut self) -> Option<Box<dyn ResultSet>> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(0);
        self.fix_root();
        Some(top)
    }

    /// Hands out every remaining stream, leaving the heap empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Box<dyn ResultSet>> {
        self.items.drain(..)
    }

    fn less(&self, i: usize, j: usize) -> bool {
        compare_tags(self.items[i].tags(), self.items[j].tags()) == Ordering::Less
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                return;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };

            // already in order
            if !self.less(child, pos) {
                return;
            }
            self.items.swap(pos, child);
            pos = child;
        }
    }
}
