//  Open-addressing table of slots, mapping buckets to ids.

use alloc::{vec, vec::Vec};
use core::mem;

use crate::{
    hash::ProbeHasher,
    id::{KeyId, Slot},
};

/// Result of probing the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// A slot holding a matching key was found.
    Found(KeyId),
    /// No matching key, the probing sequence ended on the vacant slot at this index.
    Vacant(usize),
}

/// A power-of-2 sized table of slots.
///
/// On collision, the next index to probe is derived by re-hashing the current probe value, rather than by stepping
/// linearly. The sequence of indices probed for a given base hash is thus only reproducible by replaying the exact
/// same chain of re-hashes, which `probe`, `place`, and `expand` all do.
pub(crate) struct SlotTable {
    mask: usize,
    slots: Vec<Option<Slot>>,
}

impl SlotTable {
    /// Creates a table with `capacity` vacant slots.
    ///
    /// #   Panics
    ///
    /// If `capacity` is not a power of 2.
    pub(crate) fn new(capacity: usize) -> Self {
        assert_eq!(1, capacity.count_ones());

        Self {
            mask: capacity - 1,
            slots: vec![None; capacity],
        }
    }

    /// Returns the number of slots.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the table should be expanded before inserting one more entry, given `len` entries.
    pub(crate) fn is_overloaded(&self, len: usize) -> bool {
        len > self.capacity() / 2
    }

    /// Probes the table for a key with the given base hash.
    ///
    /// `is_match` is invoked on the id of each occupied slot encountered, in sequence, and should return true if the
    /// key of the id is the one looked for.
    ///
    /// #   Complexity
    ///
    /// O(1) on average, as long as the table is kept at most half full.
    pub(crate) fn probe<H, F>(&self, hasher: &H, hash: u32, mut is_match: F) -> Probe
    where
        H: ProbeHasher,
        F: FnMut(KeyId) -> bool,
    {
        let mut current = hash;

        loop {
            let index = self.index_of(current);

            let Some(slot) = self.slots[index] else { return Probe::Vacant(index) };

            if is_match(slot.id()) {
                return Probe::Found(slot.id());
            }

            log::trace!("collision at {index}, hash {hash:#010x}, occupied by {:?}", slot.id());

            current = hasher.hash_u32(current);
        }
    }

    /// Occupies the vacant slot at `index`, as returned by `probe`.
    pub(crate) fn occupy(&mut self, index: usize, id: KeyId, hash: u32) {
        debug_assert!(self.slots[index].is_none());

        self.slots[index] = Some(Slot::new(id, hash));
    }

    /// Doubles the capacity of the table, migrating all entries.
    ///
    /// Entries whose bucket under the new mask is their current index remain in place, all others are placed anew by
    /// probing from their base hash. Entries are migrated into a fresh table, so that no probing sequence is broken by
    /// vacating a slot it went through.
    pub(crate) fn expand<H>(&mut self, hasher: &H)
    where
        H: ProbeHasher,
    {
        let capacity = self.capacity() * 2;

        let previous = mem::replace(&mut self.slots, vec![None; capacity]);
        self.mask = capacity - 1;

        for (index, slot) in previous.iter().enumerate() {
            let Some(slot) = slot else { continue };

            if self.index_of(slot.hash()) == index {
                self.slots[index] = Some(*slot);
            }
        }

        let mut moved = 0usize;

        for (index, slot) in previous.iter().enumerate() {
            let Some(slot) = slot else { continue };

            if self.index_of(slot.hash()) == index {
                continue;
            }

            let target = self.place(hasher, *slot);

            log::trace!("moved {:?} from {index} to {target}", slot.id());

            moved += 1;
        }

        log::debug!("expanded to {capacity} slots, moved {moved} entries");
    }

    /// Iterates over the occupied slots, returning their index and content.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|slot| (index, slot)))
    }
}

//
//  Implementation
//

impl SlotTable {
    fn index_of(&self, hash: u32) -> usize {
        hash as usize & self.mask
    }

    //  Places `slot` in the first vacant slot of its probing sequence, returning the index.
    //
    //  The key of `slot` must not already be in the table.
    fn place<H>(&mut self, hasher: &H, slot: Slot) -> usize
    where
        H: ProbeHasher,
    {
        let Probe::Vacant(index) = self.probe(hasher, slot.hash(), |_| false) else {
            unreachable!("Matching never succeeds")
        };

        self.slots[index] = Some(slot);

        index
    }
}

// mod tests
