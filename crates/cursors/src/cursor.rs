use crate::{CursorStats, SourceError};
use std::fmt;

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Integer(i64),
    Unsigned(u64),
    Boolean(bool),
    String(String),
}

impl Value {
    /// Bytes this value accounts for in [`CursorStats::scanned_bytes`].
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Value::Float(_) | Value::Integer(_) | Value::Unsigned(_) => 8,
            Value::Boolean(_) => 1,
            Value::String(s) => s.len(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}i", v),
            Value::Unsigned(v) => write!(f, "{}u", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{:?}", v),
        }
    }
}

/// One timestamped value of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub timestamp: i64,
    pub value: Value,
}

impl Point {
    pub fn new(timestamp: i64, value: Value) -> Self {
        Self { timestamp, value }
    }
}

/// A lazy sequence of points belonging to one series.
pub trait Cursor {
    /// Returns the next point, or `None` once the cursor is exhausted or
    /// failed. Check [`Cursor::err`] to tell the two apart.
    fn next_point(&mut self) -> Option<Point>;

    fn err(&self) -> Option<SourceError>;

    /// Scan volume consumed so far.
    fn stats(&self) -> CursorStats;

    /// Releases the cursor's resources. Calling it more than once is a no-op.
    fn close(&mut self);
}

/// A [`Cursor`] over points already held in memory.
///
/// Each point handed out counts as one scanned value and `8 + value.size()`
/// scanned bytes (timestamp plus value).
#[derive(Debug, Default)]
pub struct PointsCursor {
    points: std::vec::IntoIter<Point>,
    stats: CursorStats,
    closed: bool,
}

impl PointsCursor {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points: points.into_iter(),
            stats: CursorStats::default(),
            closed: false,
        }
    }

    /// Drains the remaining points into a `Vec`.
    pub fn collect_all(&mut self) -> Vec<Point> {
        let mut out = Vec::new();
        while let Some(p) = self.next_point() {
            out.push(p);
        }
        out
    }
}

impl Cursor for PointsCursor {
    fn next_point(&mut self) -> Option<Point> {
        if self.closed {
            return None;
        }
        let p = self.points.next()?;
        self.stats.add(CursorStats::new(1, 8 + p.value.size() as u64));
        Some(p)
    }

    fn err(&self) -> Option<SourceError> {
        None
    }

    fn stats(&self) -> CursorStats {
        self.stats
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.points = Vec::new().into_iter();
        }
    }
}
