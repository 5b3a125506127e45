//! Character sequence backed by the ropey crate.

use ropey::{Rope, RopeSlice};
use std::ops::Range;

/// Char-indexed wrapper around `ropey::Rope`.
///
/// All positions are char offsets. Callers validate ranges before
/// mutating; the wrapper itself clamps rather than panics.
#[derive(Clone, Debug, Default)]
pub struct RopeWrapper {
    rope: Rope,
}

impl RopeWrapper {
    /// Create an empty rope.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a rope from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Get the number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get the number of lines.
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Check that `range` is ordered and lies within the text.
    #[must_use]
    pub fn contains_range(&self, range: &Range<usize>) -> bool {
        range.start <= range.end && range.end <= self.len_chars()
    }

    /// Get a slice of the rope, empty if the range is invalid.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> RopeSlice<'_> {
        self.rope
            .get_slice(range)
            .unwrap_or_else(|| self.rope.slice(..0))
    }

    /// Copy a range out as an owned string.
    #[must_use]
    pub fn substring(&self, range: Range<usize>) -> String {
        self.slice(range).to_string()
    }

    /// Replace `range` with `text`, returning the removed characters.
    pub fn splice(&mut self, range: Range<usize>, text: &str) -> String {
        if !self.contains_range(&range) {
            return String::new();
        }
        let removed = self.substring(range.clone());
        if !range.is_empty() {
            self.rope.remove(range.clone());
        }
        if !text.is_empty() {
            self.rope.insert(range.start, text);
        }
        removed
    }

    /// Char range of the line containing `char_idx`, including its line
    /// break.
    #[must_use]
    pub fn line_range(&self, char_idx: usize) -> Range<usize> {
        let len = self.len_chars();
        let line = self.rope.char_to_line(char_idx.min(len));
        let start = self.rope.line_to_char(line);
        let end = if line + 1 < self.len_lines() {
            self.rope.line_to_char(line + 1)
        } else {
            len
        };
        start..end
    }

    /// Get access to the underlying rope.
    #[must_use]
    pub fn inner(&self) -> &Rope {
        &self.rope
    }
}

impl From<&str> for RopeWrapper {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl std::fmt::Display for RopeWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
