//! # Cursors - value producers of the read path
//!
//! A [`Cursor`] yields the typed points of a single series. A
//! [`StringIterator`] yields plain strings (tag keys, tag values, measurement
//! names). Both report scan volume through [`CursorStats`] so that merges
//! can sum what every underlying source touched.
//!
//! Errors raised by a source are shared as [`SourceError`]: the same error
//! object travels from the source through every merge layer above it.

mod cursor;
mod stats;
mod string;

pub use cursor::{Cursor, Point, PointsCursor, Value};
pub use stats::CursorStats;
pub use string::{EmptyStringIterator, StringIterator, StringSliceIterator};

use std::sync::Arc;

/// An opaque error reported by a source, shared so that consumers above a
/// merge see the exact object the source produced.
pub type SourceError = Arc<anyhow::Error>;

/// Wraps any error as a [`SourceError`].
pub fn source_error(err: impl Into<anyhow::Error>) -> SourceError {
    Arc::new(err.into())
}
