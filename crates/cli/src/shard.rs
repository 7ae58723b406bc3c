//! # Shard files
//!
//! A shard is a text file holding one series per line, sorted by tag set:
//!
//! ```text
//! # comment
//! host=a,region=west 1000=1.5 2000=2.5
//! host=b,region=west 1000=42i 1500=true 1800="idle"
//! ```
//!
//! The first token is the canonical tag set, every following token is a
//! `<timestamp>=<value>` point. Values are `<n>i` (integer), `<n>u`
//! (unsigned), `true`/`false`, `"text"` (string, no whitespace) or a float.
//! Empty lines and lines starting with `#` are skipped.
//!
//! [`ShardResultSet`] reads a shard lazily, one line per `next`. A bad line,
//! an I/O failure, or a series sorting before its predecessor ends the
//! stream with an error naming the file and line.

use anyhow::{anyhow, bail, Context, Result};
use cursors::{
    source_error, Cursor, CursorStats, Point, PointsCursor, SourceError, StringIterator,
    StringSliceIterator, Value,
};
use models::{parse_tags, Tags};
use reads::ResultSet;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parses one point value.
pub fn parse_value(s: &str) -> Result<Value> {
    let value = match s {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') => {
            Value::String(s[1..s.len() - 1].to_string())
        }
        _ if s.ends_with('i') => Value::Integer(
            s[..s.len() - 1]
                .parse()
                .with_context(|| format!("invalid integer '{}'", s))?,
        ),
        _ if s.ends_with('u') => Value::Unsigned(
            s[..s.len() - 1]
                .parse()
                .with_context(|| format!("invalid unsigned '{}'", s))?,
        ),
        _ => Value::Float(s.parse().with_context(|| format!("invalid value '{}'", s))?),
    };
    Ok(value)
}

/// Parses a series line into its tags and points.
pub fn parse_series(line: &str) -> Result<(Tags, Vec<Point>)> {
    let mut tokens = line.split_whitespace();
    let tags = match tokens.next() {
        Some(t) => parse_tags(t)?,
        None => bail!("empty series line"),
    };
    if tags.is_empty() {
        bail!("series has no tags");
    }

    let mut points = Vec::new();
    for token in tokens {
        let (ts, value) = token
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid point '{}': expected timestamp=value", token))?;
        let timestamp: i64 = ts
            .parse()
            .with_context(|| format!("invalid timestamp '{}'", ts))?;
        points.push(Point::new(timestamp, parse_value(value)?));
    }
    Ok((tags, points))
}

/// A [`ResultSet`] over one shard file.
///
/// Stats count every point of every series read so far: one value and
/// `8 + size` bytes per point.
pub struct ShardResultSet {
    path: PathBuf,
    /// `None` once closed or failed.
    lines: Option<Lines<BufReader<File>>>,
    line_no: usize,
    produced: usize,
    current: Tags,
    points: Vec<Point>,
    err: Option<SourceError>,
    stats: CursorStats,
}

impl ShardResultSet {
    /// Opens the shard at `path`. Nothing is read until the first `next`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("failed to open shard {}", path.display()))?;

        Ok(Self {
            path,
            lines: Some(BufReader::new(file).lines()),
            line_no: 0,
            produced: 0,
            current: Tags::empty(),
            points: Vec::new(),
            err: None,
            stats: CursorStats::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fail(&mut self, err: anyhow::Error) -> bool {
        debug!(shard = %self.path.display(), line = self.line_no, "shard failed");
        self.err = Some(source_error(err));
        self.lines = None;
        self.points.clear();
        false
    }
}

impl ResultSet for ShardResultSet {
    fn next(&mut self) -> bool {
        let lines = match self.lines.as_mut() {
            Some(lines) => lines,
            None => return false,
        };

        loop {
            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("failed to read shard {}", self.path.display()));
                    return self.fail(err);
                }
                None => {
                    self.points.clear();
                    return false;
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (tags, points) = match parse_series(trimmed) {
                Ok(series) => series,
                Err(e) => {
                    let err = anyhow!("{}:{}: {:#}", self.path.display(), self.line_no, e);
                    return self.fail(err);
                }
            };
            if self.produced > 0 && tags < self.current {
                let err = anyhow!(
                    "{}:{}: series {} out of order (after {})",
                    self.path.display(),
                    self.line_no,
                    tags,
                    self.current
                );
                return self.fail(err);
            }

            for p in &points {
                self.stats.add(CursorStats::new(1, 8 + p.value.size() as u64));
            }
            self.current = tags;
            self.points = points;
            self.produced += 1;
            return true;
        }
    }

    fn tags(&self) -> &Tags {
        &self.current
    }

    fn cursor(&mut self) -> Option<Box<dyn Cursor>> {
        self.lines.as_ref()?;
        Some(Box::new(PointsCursor::new(self.points.clone())))
    }

    fn err(&self) -> Option<SourceError> {
        self.err.clone()
    }

    fn close(&mut self) {
        self.lines = None;
        self.points.clear();
    }

    fn stats(&self) -> CursorStats {
        self.stats
    }
}

/// The distinct values of one tag key within a shard, in ascending order.
pub struct TagValues {
    values: StringSliceIterator,
    stats: CursorStats,
}

impl StringIterator for TagValues {
    fn next(&mut self) -> bool {
        self.values.next()
    }

    fn value(&self) -> &str {
        self.values.value()
    }

    fn stats(&self) -> CursorStats {
        self.stats
    }
}

/// Scans the shard at `path` for the values of tag `key`.
///
/// # Errors
///
/// Returns an error if the shard cannot be opened or read.
pub fn tag_values(path: impl AsRef<Path>, key: &str) -> Result<TagValues> {
    let mut rs = ShardResultSet::open(path)?;
    let mut values = BTreeSet::new();
    while rs.next() {
        if let Some(v) = rs.tags().get(key.as_bytes()) {
            values.insert(String::from_utf8_lossy(v).into_owned());
        }
    }
    if let Some(err) = rs.err() {
        bail!("{:#}", err);
    }
    let stats = rs.stats();
    rs.close();

    Ok(TagValues {
        values: StringSliceIterator::new(values),
        stats,
    })
}
