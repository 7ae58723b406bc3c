//! # Reads - merging the per-shard read streams
//!
//! A query touches many shards, and every shard answers with its own stream
//! of series sorted by tag set. This crate turns those streams into one.
//!
//! ## Components
//!
//! | Type                     | Purpose                                                   |
//! |--------------------------|-----------------------------------------------------------|
//! | [`ResultSet`]            | A pull-based stream of `(tags, cursor)` series            |
//! | [`heap::ResultSetHeap`]  | Min-heap of active streams keyed on their current tags    |
//! | [`MergedResultSet`]      | k-way merge of many result sets, ordered by tag set       |
//! | [`MergedStringIterator`] | Deduplicating concatenation of string iterators           |
//!
//! ## Ownership
//!
//! Streams handed to a merge belong to it. Every stream is closed exactly
//! once: when it runs dry, when another stream fails, when the consumer
//! calls [`ResultSet::close`], or when the merge is dropped.
//!
//! ```text
//! shard 0: a=1 ─┐
//! shard 1: a=2 ─┼─> ResultSetHeap ─> MergedResultSet ─> consumer
//! shard 2: a=3 ─┘      (root = smallest tags)
//! ```

pub mod heap;
mod merge;
mod string_merge;

pub use merge::{new_merged_result_set, MergedResultSet};
pub use string_merge::MergedStringIterator;

use cursors::{Cursor, CursorStats, SourceError};
use models::Tags;

/// A stream of series, each identified by its tag set and carrying a cursor
/// over its points. Series come out in ascending tag order.
pub trait ResultSet {
    /// Advances to the next series. Returns `false` when the stream is
    /// exhausted or failed; [`ResultSet::err`] tells which.
    fn next(&mut self) -> bool;

    /// Tags of the current series. Only meaningful after `next` returned
    /// `true`.
    fn tags(&self) -> &Tags;

    /// A cursor over the current series' points, owned by the caller.
    fn cursor(&mut self) -> Option<Box<dyn Cursor>>;

    /// The error that ended the stream, if any. Once set it never clears.
    /// After `next` returned `false`, `None` means exhausted and `Some`
    /// means failed.
    fn err(&self) -> Option<SourceError>;

    /// Releases the stream. Must be safe to call more than once.
    fn close(&mut self);

    /// Scan volume of everything this stream has read so far.
    fn stats(&self) -> CursorStats;
}

#[cfg(test)]
mod tests;
