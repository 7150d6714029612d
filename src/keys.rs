//  Append-only storage of the bytes of the keys.

use alloc::vec::Vec;

/// The offset of a key within the `KeyArena`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct KeyOffset(pub u64);

/// The bytes of all keys, catenated, each followed by a NUL terminator.
///
/// Keys are never referenced by pointer, only by `KeyOffset` and length, so that growing the underlying buffer does
/// not invalidate anything but borrows, which the borrow checker already prevents from outliving an append.
#[derive(Default)]
pub(crate) struct KeyArena {
    bytes: Vec<u8>,
}

impl KeyArena {
    /// Creates an empty arena.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of bytes stored, terminators included.
    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Appends the key, followed by a terminator, and returns the offset of the key.
    ///
    /// #   Complexity
    ///
    /// Amortized O(key.len()).
    pub(crate) fn append(&mut self, key: &[u8]) -> KeyOffset {
        let offset = KeyOffset(self.bytes.len() as u64);

        self.bytes.reserve(key.len() + 1);
        self.bytes.extend_from_slice(key);
        self.bytes.push(0);

        offset
    }

    /// Returns the key at `offset`, of `length` bytes, terminator excluded.
    ///
    /// #   Panics
    ///
    /// If `offset` and `length` do not denote a range of the arena.
    pub(crate) fn slice(&self, offset: KeyOffset, length: u32) -> &[u8] {
        let start = offset.0 as usize;

        &self.bytes[start..start + length as usize]
    }

    /// Returns the key at `offset`, of `length` bytes, terminator included.
    ///
    /// #   Panics
    ///
    /// If `offset` and `length` do not denote a key appended to this arena.
    pub(crate) fn slice_with_terminator(&self, offset: KeyOffset, length: u32) -> &[u8] {
        let start = offset.0 as usize;

        &self.bytes[start..=start + length as usize]
    }
}

// mod tests
