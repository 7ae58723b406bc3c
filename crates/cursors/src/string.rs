use crate::CursorStats;

/// Enumerates a sequence of string values.
pub trait StringIterator {
    /// Advances to the next value. Returns `false` when there are no more.
    fn next(&mut self) -> bool;

    /// The current value. Only meaningful after `next` returned `true`.
    fn value(&self) -> &str;

    fn stats(&self) -> CursorStats;
}

/// A [`StringIterator`] that never yields.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyStringIterator;

impl StringIterator for EmptyStringIterator {
    fn next(&mut self) -> bool {
        false
    }

    fn value(&self) -> &str {
        ""
    }

    fn stats(&self) -> CursorStats {
        CursorStats::default()
    }
}

/// A [`StringIterator`] over an in-memory list.
#[derive(Debug, Default, Clone)]
pub struct StringSliceIterator {
    values: Vec<String>,
    current: String,
    pos: usize,
}

impl StringSliceIterator {
    pub fn new<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            current: String::new(),
            pos: 0,
        }
    }
}

impl StringIterator for StringSliceIterator {
    fn next(&mut self) -> bool {
        match self.values.get_mut(self.pos) {
            Some(v) => {
                self.current = std::mem::take(v);
                self.pos += 1;
                true
            }
            None => {
                self.current.clear();
                false
            }
        }
    }

    fn value(&self) -> &str {
        &self.current
    }

    fn stats(&self) -> CursorStats {
        CursorStats::default()
    }
}
