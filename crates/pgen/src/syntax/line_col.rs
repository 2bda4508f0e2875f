//! Line and column positions
//!
//! Tokens and errors carry a `(line, column)` pair. Lines are one-based and
//! columns are zero-based byte offsets into the line, the convention the
//! tokenizers feeding this crate already use.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line and column position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LineCol {
    /// One-based line number
    pub line: u32,
    /// Zero-based column number (in UTF-8 bytes)
    pub column: u32,
}

impl LineCol {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for LineCol {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Line index for converting byte offsets to line/column positions
///
/// Line starts are cached once so each lookup is a binary search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets of line starts (the first line starts at 0)
    line_starts: Vec<usize>,
    /// Total length of the text in bytes
    text_len: usize,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];

        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_starts.push(i + 1);
                    i += 1;
                }
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(i + 2);
                    i += 2;
                }
                b'\r' => {
                    line_starts.push(i + 1);
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Self {
            line_starts,
            text_len: text.len(),
        }
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end of the text are clamped to the end.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let column = offset - self.line_starts[line];

        LineCol {
            line: u32::try_from(line + 1).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
        }
    }

    /// Position just past the last byte of the text
    #[must_use]
    pub fn end(&self) -> LineCol {
        self.line_col(self.text_len)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
