//  The ID of a key.

use core::{fmt, num::NonZeroU32};

/// A `KeyId` identifies an interned key, within the `InternMap` which issued it.
///
/// Ids are dense: the n-th distinct key inserted in a map receives the id n - 1. Once issued, an id is never
/// reassigned, even as the map grows, and may thus be used as an index into side arrays.
///
/// #   Tied to the `InternMap` instance.
///
/// A `KeyId` is only meaningful for the `InternMap` instance which created it.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct KeyId(u32);

impl KeyId {
    /// The maximum number of ids a single `InternMap` may issue.
    ///
    /// `u32::MAX` itself is never issued.
    pub const MAX_COUNT: u32 = u32::MAX;

    /// Creates a new instance from its raw value.
    ///
    /// Accessors of `InternMap` check that the id is within range, hence this is safe.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns the raw value, as an index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<KeyId> for u32 {
    fn from(id: KeyId) -> u32 {
        id.0
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "KeyId({})", self.0)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// An occupied slot of the table: the id of the key, and the base hash of the key.
///
/// The id is stored off-by-one, so that `Option<Slot>` fits in 8 bytes.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct Slot {
    id: NonZeroU32,
    hash: u32,
}

impl Slot {
    /// Creates a new instance.
    ///
    /// #   Panics
    ///
    /// If `id` is `u32::MAX`, which is never issued.
    pub(crate) fn new(id: KeyId, hash: u32) -> Self {
        let id = id.0.checked_add(1).and_then(NonZeroU32::new).expect("Id below MAX_COUNT");

        Self { id, hash }
    }

    /// Returns the id of the key.
    pub(crate) fn id(&self) -> KeyId {
        KeyId(self.id.get() - 1)
    }

    /// Returns the base hash of the key, not any of its probing hashes.
    pub(crate) fn hash(&self) -> u32 {
        self.hash
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.debug_struct("Slot")
            .field("id", &self.id().0)
            .field("hash", &format_args!("{:#010x}", self.hash))
            .finish()
    }
}

// mod tests
