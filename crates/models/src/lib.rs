//! # Models - series identity
//!
//! A series is identified by its tag set: an ordered list of key/value byte
//! pairs. The read path uses tag sets purely as comparison keys, so the
//! important piece here is [`compare_tags`], the total order every merge in
//! the [`reads`] crate is built on.
//!
//! ## Canonical form
//!
//! ```text
//! host=a,region=west
//! ```
//!
//! Pairs are sorted by key and joined with `,`. [`Tags::hash_key`] produces
//! this form and [`parse_tags`] reads it back.
//!
//! [`reads`]: ../reads/index.html

use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::fmt;

/// A single key/value pair of a series' tag set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Tag {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered set of tags, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Builds a tag set, sorting the pairs by key.
    ///
    /// Duplicate keys are kept as given; use [`Tags::set`] to replace.
    pub fn new(mut tags: Vec<Tag>) -> Self {
        tags.sort_by(|a, b| a.key.cmp(&b.key));
        Self(tags)
    }

    /// An empty tag set, usable in `static` position.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(pairs.into_iter().map(|(k, v)| Tag::new(k, v)).collect())
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.0
            .binary_search_by(|t| t.key.as_slice().cmp(key))
            .ok()
            .map(|i| self.0[i].value.as_slice())
    }

    /// Inserts or replaces the value for `key`, keeping key order.
    pub fn set(&mut self, key: &[u8], value: &[u8]) {
        match self.0.binary_search_by(|t| t.key.as_slice().cmp(key)) {
            Ok(i) => self.0[i].value = value.to_vec(),
            Err(i) => self.0.insert(i, Tag::new(key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    /// Canonical `k1=v1,k2=v2` byte form of the tag set.
    #[must_use]
    pub fn hash_key(&self) -> Vec<u8> {
        let size: usize = self.0.iter().map(|t| t.key.len() + t.value.len() + 2).sum();
        let mut out = Vec::with_capacity(size);
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(b',');
            }
            out.extend_from_slice(&tag.key);
            out.push(b'=');
            out.extend_from_slice(&tag.value);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl PartialOrd for Tags {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tags {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_tags(self, other)
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.hash_key()))
    }
}

/// Three-way comparison of two tag sets.
///
/// Pairs are compared position by position, key bytes first and then value
/// bytes, until one differs. When every shared position is equal the
/// shorter set sorts first.
pub fn compare_tags(a: &Tags, b: &Tags) -> Ordering {
    for (x, y) in a.0.iter().zip(b.0.iter()) {
        match x.key.cmp(&y.key) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match x.value.cmp(&y.value) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    a.0.len().cmp(&b.0.len())
}

/// Parses the canonical `k1=v1,k2=v2` form produced by [`Tags::hash_key`].
///
/// An empty (or all-whitespace) input yields an empty tag set.
///
/// # Errors
///
/// Returns an error for a pair without `=` or with an empty key.
pub fn parse_tags(s: &str) -> Result<Tags> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Tags::empty());
    }

    let mut tags = Vec::new();
    for pair in s.split(',') {
        let (key, value) = match pair.split_once('=') {
            Some(kv) => kv,
            None => bail!("invalid tag '{}': expected key=value", pair),
        };
        if key.is_empty() {
            bail!("invalid tag '{}': empty key", pair);
        }
        tags.push(Tag::new(key, value));
    }
    Ok(Tags::new(tags))
}
