//! Byte-offset ranges into DOT source text

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "range start {start} after end {end}");
        Self { start, end }
    }

    /// A zero-width range at `offset` (a cursor position)
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest range covering both `self` and `other`
    pub fn cover(self, other: TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// True if `offset` lies within the range, counting the end offset as inside.
    ///
    /// Cursor lookups use this so a caret placed right after a token still
    /// resolves to that token.
    pub fn contains_inclusive(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Slice `text` by this range, or `None` when the range is out of bounds
    /// or does not fall on character boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inclusive_covers_both_ends() {
        let range = TextRange::new(3, 6);
        assert!(!range.contains_inclusive(2));
        assert!(range.contains_inclusive(3));
        assert!(range.contains_inclusive(6));
        assert!(!range.contains_inclusive(7));
    }

    #[test]
    fn test_cover() {
        let a = TextRange::new(4, 8);
        let b = TextRange::new(1, 5);
        assert_eq!(a.cover(b), TextRange::new(1, 8));
    }

    #[test]
    fn test_slice_out_of_bounds() {
        assert_eq!(TextRange::new(0, 3).slice("abc"), Some("abc"));
        assert_eq!(TextRange::new(2, 9).slice("abc"), None);
    }
}
