//! Append-only console transcript

use std::fmt;

/// Ordered text chunks written to the console
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    chunks: Vec<String>,
}

impl Transcript {
    /// Creates an empty transcript
    #[must_use]
    pub const fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Appends a chunk
    pub fn push(&mut self, chunk: impl Into<String>) {
        self.chunks.push(chunk.into());
    }

    /// Returns the chunks in append order
    #[must_use]
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Returns the whole transcript as one string
    #[must_use]
    pub fn text(&self) -> String {
        self.chunks.concat()
    }

    /// Returns true if nothing has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Drops everything written so far
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chunks.iter().try_for_each(|chunk| f.write_str(chunk))
    }
}
