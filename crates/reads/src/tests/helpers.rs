use std::cell::Cell;
use std::rc::Rc;

use cursors::{source_error, Cursor, CursorStats, Point, PointsCursor, SourceError, Value};
use models::{Tag, Tags};

use crate::ResultSet;

/// Scan volume a [`MockResultSet`] accounts for each series it produces.
pub const SERIES_STATS: CursorStats = CursorStats {
    scanned_values: 1,
    scanned_bytes: 10,
};

/// Counters shared between a test and the mock it handed to a merge.
#[derive(Clone, Default)]
pub struct Probe {
    closes: Rc<Cell<usize>>,
    nexts: Rc<Cell<usize>>,
    reads_after_close: Rc<Cell<usize>>,
}

impl Probe {
    pub fn closes(&self) -> usize {
        self.closes.get()
    }

    pub fn nexts(&self) -> usize {
        self.nexts.get()
    }

    pub fn reads_after_close(&self) -> usize {
        self.reads_after_close.get()
    }
}

/// Builds the single-tag set `t=<name>`.
pub fn series(name: &str) -> Tags {
    Tags::new(vec![Tag::new("t", name)])
}

/// A result set over named series. Each series' cursor yields one point
/// whose value is the source id, so tests can tell sources apart.
pub struct MockResultSet {
    id: String,
    series: std::vec::IntoIter<Tags>,
    current: Tags,
    /// Number of series produced before `next` fails.
    fail_after: Option<usize>,
    produced: usize,
    err: Option<SourceError>,
    stats: CursorStats,
    closed: bool,
    probe: Probe,
}

impl MockResultSet {
    pub fn new(id: &str, names: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            series: names.iter().map(|n| series(n)).collect::<Vec<_>>().into_iter(),
            current: Tags::empty(),
            fail_after: None,
            produced: 0,
            err: None,
            stats: CursorStats::default(),
            closed: false,
            probe: Probe::default(),
        }
    }

    /// Makes `next` fail once `n` series have been produced.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Pretends the source already scanned `stats` before producing anything.
    pub fn with_stats(mut self, stats: CursorStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }

    pub fn boxed(self) -> Box<dyn ResultSet> {
        Box::new(self)
    }
}

impl ResultSet for MockResultSet {
    fn next(&mut self) -> bool {
        self.probe.nexts.set(self.probe.nexts.get() + 1);
        if self.closed {
            self.probe
                .reads_after_close
                .set(self.probe.reads_after_close.get() + 1);
            return false;
        }
        if self.err.is_some() {
            return false;
        }
        if self.fail_after == Some(self.produced) {
            self.err = Some(source_error(anyhow::anyhow!("source {} failed", self.id)));
            return false;
        }
        match self.series.next() {
            Some(tags) => {
                self.current = tags;
                self.produced += 1;
                self.stats.add(SERIES_STATS);
                true
            }
            None => false,
        }
    }

    fn tags(&self) -> &Tags {
        &self.current
    }

    fn cursor(&mut self) -> Option<Box<dyn Cursor>> {
        Some(Box::new(PointsCursor::new(vec![Point::new(
            0,
            Value::String(self.id.clone()),
        )])))
    }

    fn err(&self) -> Option<SourceError> {
        self.err.clone()
    }

    fn close(&mut self) {
        self.probe.closes.set(self.probe.closes.get() + 1);
        self.closed = true;
    }

    fn stats(&self) -> CursorStats {
        self.stats
    }
}

/// Returns the `t` tag value of every remaining series of `rs`.
pub fn drain_names(rs: &mut dyn ResultSet) -> Vec<String> {
    let mut out = Vec::new();
    while rs.next() {
        let value = rs.tags().get(b"t").unwrap_or_default();
        out.push(String::from_utf8_lossy(value).into_owned());
    }
    out
}

/// Returns the id of the source the current series came from.
pub fn source_of(rs: &mut dyn ResultSet) -> String {
    let mut cursor = rs.cursor().expect("cursor for current series");
    match cursor.next_point().map(|p| p.value) {
        Some(Value::String(id)) => id,
        other => panic!("unexpected cursor value {:?}", other),
    }
}
