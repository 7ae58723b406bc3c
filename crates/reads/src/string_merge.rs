//! Deduplicating merge of [`StringIterator`]s.
//!
//! Sources are drained one after another in the order given, and a value is
//! emitted only the first time it is seen. Inputs are not interleaved by
//! value: if two sources overlap, the output is not globally sorted even
//! when each source is.

use std::collections::{HashSet, VecDeque};

use cursors::{CursorStats, StringIterator};
use tracing::debug;

/// A [`StringIterator`] yielding every distinct value of its sources once.
pub struct MergedStringIterator {
    iterators: VecDeque<Box<dyn StringIterator>>,
    /// Values emitted so far. Released once every source is exhausted.
    unique_values: Option<HashSet<String>>,
    next_value: String,
    /// Stats of the sources that have been drained.
    stats: CursorStats,
}

impl MergedStringIterator {
    pub fn new(iterators: Vec<Box<dyn StringIterator>>) -> Self {
        Self {
            iterators: iterators.into(),
            unique_values: Some(HashSet::new()),
            next_value: String::new(),
            stats: CursorStats::default(),
        }
    }
}

impl StringIterator for MergedStringIterator {
    fn next(&mut self) -> bool {
        while let Some(iterator) = self.iterators.front_mut() {
            let seen = self.unique_values.get_or_insert_with(HashSet::new);
            while iterator.next() {
                let value = iterator.value();
                if !seen.contains(value) {
                    seen.insert(value.to_owned());
                    self.next_value.clear();
                    self.next_value.push_str(value);
                    return true;
                }
            }

            // exhausted; move on to the next source
            self.stats.add(iterator.stats());
            self.iterators.pop_front();
            debug!(remaining = self.iterators.len(), "string iterator exhausted");
        }

        self.unique_values = None;
        false
    }

    fn value(&self) -> &str {
        &self.next_value
    }

    fn stats(&self) -> CursorStats {
        self.stats
    }
}
