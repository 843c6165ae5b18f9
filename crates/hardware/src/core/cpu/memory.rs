//! Data Memory.
//!
//! Word-addressed storage of signed 32-bit values. Addresses are computed as
//! signed sums by the load/store unit, so every access goes through
//! [`DataMemory::resolve`] first; an address that does not resolve is an
//! address fault, never an out-of-bounds access.

/// Fixed-size linear data memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataMemory {
    words: Vec<i32>,
}

impl DataMemory {
    /// Creates a zero-filled memory of `words` entries.
    pub fn new(words: usize) -> Self {
        Self {
            words: vec![0; words],
        }
    }

    /// Converts a computed address into a word index.
    ///
    /// # Returns
    ///
    /// `Some(index)` when `0 <= address < len`, otherwise `None`.
    pub fn resolve(&self, address: i64) -> Option<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&idx| idx < self.words.len())
    }

    /// Reads the word at a resolved index.
    pub fn read(&self, idx: usize) -> Option<i32> {
        self.words.get(idx).copied()
    }

    /// Writes the word at a resolved index.
    ///
    /// # Returns
    ///
    /// `false` if `idx` is out of range and nothing was written.
    pub fn write(&mut self, idx: usize, val: i32) -> bool {
        self.words.get_mut(idx).map(|slot| *slot = val).is_some()
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the memory has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in address order.
    pub fn as_slice(&self) -> &[i32] {
        &self.words
    }
}
