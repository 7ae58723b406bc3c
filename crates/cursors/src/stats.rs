use std::ops::AddAssign;

/// Scan volume touched by a cursor or iterator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorStats {
    /// Number of values read from storage.
    pub scanned_values: u64,
    /// Number of bytes read from storage.
    pub scanned_bytes: u64,
}

impl CursorStats {
    pub fn new(scanned_values: u64, scanned_bytes: u64) -> Self {
        Self {
            scanned_values,
            scanned_bytes,
        }
    }

    /// Adds `other` into `self`.
    pub fn add(&mut self, other: CursorStats) {
        self.scanned_values = self.scanned_values.saturating_add(other.scanned_values);
        self.scanned_bytes = self.scanned_bytes.saturating_add(other.scanned_bytes);
    }
}

impl AddAssign for CursorStats {
    fn add_assign(&mut self, other: CursorStats) {
        self.add(other);
    }
}
