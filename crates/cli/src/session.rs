//! Command dispatch for the shell.
//!
//! ```text
//! OPEN path...        add shard files to the session
//! SHARDS              list opened shards
//! SERIES              merge all shards and print each series
//! TAGVALUES key       distinct values of a tag key across shards
//! STATS               scan stats of the last SERIES / TAGVALUES
//! CLEAR               forget every opened shard
//! EXIT / QUIT         leave
//! ```

use anyhow::Result;
use cursors::{CursorStats, StringIterator};
use reads::{new_merged_result_set, MergedStringIterator, ResultSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::shard::{tag_values, ShardResultSet};

pub struct Session {
    config: Config,
    shards: Vec<PathBuf>,
    last_stats: Option<CursorStats>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let shards = config.shards.clone();
        Self {
            config,
            shards,
            last_stats: None,
        }
    }

    pub fn shards(&self) -> &[PathBuf] {
        &self.shards
    }

    /// Runs one command line, writing its output to `out`.
    ///
    /// Returns `Ok(false)` when the shell should exit. Command failures are
    /// reported on `out` as `ERR ...`; only write failures are returned.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        let mut parts = line.split_whitespace();
        let cmd = match parts.next() {
            Some(cmd) => cmd,
            None => return Ok(true),
        };

        match cmd.to_uppercase().as_str() {
            "OPEN" => {
                let paths: Vec<&str> = parts.collect();
                if paths.is_empty() {
                    writeln!(out, "ERR usage: OPEN path...")?;
                } else {
                    self.open(&paths, out)?;
                }
            }
            "SHARDS" => {
                if self.shards.is_empty() {
                    writeln!(out, "(empty)")?;
                }
                for (i, path) in self.shards.iter().enumerate() {
                    writeln!(out, "[{}] {}", i, path.display())?;
                }
            }
            "SERIES" => self.series(out)?,
            "TAGVALUES" => match parts.next() {
                Some(key) => self.tag_values(key, out)?,
                None => writeln!(out, "ERR usage: TAGVALUES key")?,
            },
            "STATS" => match self.last_stats {
                Some(s) => writeln!(
                    out,
                    "scanned_values={} scanned_bytes={}",
                    s.scanned_values, s.scanned_bytes
                )?,
                None => writeln!(out, "(no stats)")?,
            },
            "CLEAR" => {
                self.shards.clear();
                writeln!(out, "OK")?;
            }
            "EXIT" | "QUIT" => {
                writeln!(out, "bye")?;
                return Ok(false);
            }
            other => writeln!(out, "unknown command: {}", other)?,
        }
        Ok(true)
    }

    /// Adds every path or none of them.
    fn open<W: Write>(&mut self, paths: &[&str], out: &mut W) -> Result<()> {
        if let Some(missing) = paths.iter().find(|p| !Path::new(p).is_file()) {
            writeln!(out, "ERR no such shard: {}", missing)?;
            return Ok(());
        }
        self.shards.extend(paths.iter().map(PathBuf::from));
        writeln!(out, "OK ({} shards)", self.shards.len())?;
        Ok(())
    }

    fn series<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut sets: Vec<Box<dyn ResultSet>> = Vec::with_capacity(self.shards.len());
        for path in &self.shards {
            match ShardResultSet::open(path) {
                Ok(rs) => sets.push(Box::new(rs)),
                Err(e) => {
                    writeln!(out, "ERR open failed: {:#}", e)?;
                    return Ok(());
                }
            }
        }

        let mut rs = match new_merged_result_set(sets) {
            Some(rs) => rs,
            None => {
                writeln!(out, "(empty)")?;
                return Ok(());
            }
        };

        let mut count = 0usize;
        while rs.next() {
            count += 1;
            writeln!(out, "{}", rs.tags())?;
            if !self.config.show_points {
                continue;
            }
            if let Some(mut cursor) = rs.cursor() {
                while let Some(p) = cursor.next_point() {
                    writeln!(out, "  {} {}", p.timestamp, p.value)?;
                }
                cursor.close();
            }
        }

        match rs.err() {
            Some(err) => writeln!(out, "ERR merge failed: {:#}", err)?,
            None if count == 0 => writeln!(out, "(empty)")?,
            None => writeln!(out, "({} series)", count)?,
        }
        self.last_stats = Some(rs.stats());
        rs.close();
        info!(shards = self.shards.len(), series = count, "series merged");
        Ok(())
    }

    fn tag_values<W: Write>(&mut self, key: &str, out: &mut W) -> Result<()> {
        let mut sources: Vec<Box<dyn StringIterator>> = Vec::with_capacity(self.shards.len());
        for path in &self.shards {
            match tag_values(path, key) {
                Ok(values) => sources.push(Box::new(values)),
                Err(e) => {
                    writeln!(out, "ERR tag values failed: {:#}", e)?;
                    return Ok(());
                }
            }
        }

        let mut merged = MergedStringIterator::new(sources);
        let mut count = 0usize;
        while merged.next() {
            count += 1;
            writeln!(out, "{}", merged.value())?;
        }
        if count == 0 {
            writeln!(out, "(empty)")?;
        } else {
            writeln!(out, "({} values)", count)?;
        }
        self.last_stats = Some(merged.stats());
        Ok(())
    }
}
