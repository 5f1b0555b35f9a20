//! Byte-range text edits

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::span::TextRange;

/// Errors that can occur during edit application
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit range {start}..{end} out of bounds for source length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
}

/// A single replacement of a byte range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub range: TextRange,
    pub replacement: String,
    /// Human-readable description of the edit
    pub message: String,
}

impl Edit {
    pub fn new(range: TextRange, replacement: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
            message: message.into(),
        }
    }

    pub fn delete(range: TextRange, message: impl Into<String>) -> Self {
        Self::new(range, String::new(), message)
    }

    pub fn start_offset(&self) -> usize {
        self.range.start
    }

    pub fn end_offset(&self) -> usize {
        self.range.end
    }
}

/// Apply edits to `source`.
///
/// Edits are applied from the end of the text backwards so earlier offsets
/// stay valid. Touching edits are fine; overlapping ones are rejected, as are
/// ranges past the end of the text or off a character boundary.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let mut sorted_edits: Vec<&Edit> = edits.iter().collect();
    sorted_edits.sort_by(|a, b| {
        b.start_offset()
            .cmp(&a.start_offset())
            .then(b.end_offset().cmp(&a.end_offset()))
    });

    let source_len = source.len();
    let mut prev_start: Option<usize> = None;

    for edit in &sorted_edits {
        let start = edit.start_offset();
        let end = edit.end_offset();

        if start > end
            || end > source_len
            || !source.is_char_boundary(start)
            || !source.is_char_boundary(end)
        {
            return Err(EditError::RangeOutOfBounds {
                start,
                end,
                len: source_len,
            });
        }

        if let Some(prev) = prev_start {
            if end > prev {
                return Err(EditError::OverlappingEdits(start));
            }
        }

        prev_start = Some(start);
    }

    let mut result = source.to_string();
    for edit in sorted_edits {
        result.replace_range(edit.start_offset()..edit.end_offset(), &edit.replacement);
    }

    Ok(result)
}
