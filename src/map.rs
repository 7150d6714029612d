//  Implementation of the `InternMap`.

use core::{ffi::CStr, fmt};

use crate::{
    error::InternMapError,
    hash::{Murmur3Hasher, ProbeHasher},
    id::KeyId,
    keys::KeyArena,
    records::{RecordArena, RecordHeader},
    table::{Probe, SlotTable},
};

/// A byte slice and string interning map, associating a fixed-size record with each key.
///
/// Each distinct key is assigned a `KeyId`, in insertion order, starting from 0. The record of a key is zeroed on
/// insertion, and may then be freely read and written by the user.
pub struct InternMap<H = Murmur3Hasher> {
    hasher: H,
    table: SlotTable,
    keys: KeyArena,
    records: RecordArena,
    expansions: u32,
}

impl InternMap {
    /// Creates a new InternMap, with `capacity` initial slots and records of (at least) `payload_size` bytes.
    ///
    /// Fails if `capacity` is 0, or not a power of 2.
    ///
    /// To customize the InternMap further, use the `with()` method instead.
    pub fn new(capacity: usize, payload_size: usize) -> Result<Self, InternMapError> {
        let mut builder = Self::with(Murmur3Hasher::default());

        builder.set_capacity(capacity).set_payload_size(payload_size);

        builder.build()
    }
}

impl<H> InternMap<H> {
    /// Creates a builder for the InternMap, allowing finer-grained tuning.
    pub fn with(hasher: H) -> InternMapBuilder<H> {
        let capacity = 128;
        let payload_size = 0;
        let alignment = 16;

        InternMapBuilder {
            hasher,
            capacity,
            payload_size,
            alignment,
        }
    }

    /// Returns the number of distinct keys inserted so far.
    ///
    /// This is also the `KeyId` the next distinct key will receive.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether no key was inserted so far.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots of the table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of user bytes in each record.
    ///
    /// This is at least the requested payload size, rounded up so that records are aligned.
    pub fn payload_size(&self) -> usize {
        self.records.stride() - RecordHeader::SIZE
    }

    /// Gets a previously inserted key.
    ///
    /// Returns an error if the `id` was NOT issued by this instance.
    pub fn get_key(&self, id: KeyId) -> Result<&[u8], InternMapError> {
        let header = self.get_header(id)?;

        Ok(self.keys.slice(header.offset, header.length))
    }

    /// Gets a previously inserted string.
    ///
    /// Returns an error if the `id` was NOT issued by this instance, or if the key is not valid UTF-8.
    pub fn get_str(&self, id: KeyId) -> Result<&str, InternMapError> {
        let bytes = self.get_key(id)?;

        core::str::from_utf8(bytes).map_err(|_| InternMapError::NotUtf8)
    }

    /// Gets a previously inserted key, as a NUL-terminated C string.
    ///
    /// Returns an error if the `id` was NOT issued by this instance, or if the key contains a NUL byte.
    pub fn get_c_str(&self, id: KeyId) -> Result<&CStr, InternMapError> {
        let header = self.get_header(id)?;

        let bytes = self.keys.slice_with_terminator(header.offset, header.length);

        CStr::from_bytes_with_nul(bytes).map_err(|_| InternMapError::InteriorNul)
    }

    /// Gets the payload of the record of a previously inserted key.
    ///
    /// Returns an error if the `id` was NOT issued by this instance.
    pub fn get_record(&self, id: KeyId) -> Result<&[u8], InternMapError> {
        self.check_id(id)?;

        Ok(self.records.payload(id))
    }

    /// Gets the payload of the record of a previously inserted key, for modification.
    ///
    /// The payload of a record is only ever modified through this method: the map itself only zeroes it on insertion.
    ///
    /// Returns an error if the `id` was NOT issued by this instance.
    pub fn get_record_mut(&mut self, id: KeyId) -> Result<&mut [u8], InternMapError> {
        self.check_id(id)?;

        Ok(self.records.payload_mut(id))
    }

    /// Iterates over all keys, in order of insertion.
    pub fn iter(&self) -> impl Iterator<Item = (KeyId, &[u8])> + '_ {
        (0..self.len()).map(move |index| {
            let id = KeyId::new(index as u32);
            let header = self.records.header(id);

            (id, self.keys.slice(header.offset, header.length))
        })
    }

    /// Returns statistics about the memory usage of this instance.
    pub fn statistics(&self) -> Statistics {
        Statistics {
            number_keys: self.len(),
            number_slots: self.table.capacity(),
            number_expansions: self.expansions,
            key_bytes: self.keys.len(),
            record_stride: self.records.stride(),
            record_bytes: self.records.number_bytes(),
        }
    }
}

impl<H> InternMap<H>
where
    H: ProbeHasher,
{
    /// Looks up a key, without inserting it.
    ///
    /// Returns the `KeyId` of the key, if it was previously inserted.
    pub fn get(&self, key: &[u8]) -> Option<KeyId> {
        let hash = self.hasher.hash_bytes(key);

        match self.probe(hash, key) {
            Probe::Found(id) => Some(id),
            Probe::Vacant(_) => None,
        }
    }

    /// Looks up a string, without inserting it.
    pub fn get_by_str(&self, key: &str) -> Option<KeyId> {
        self.get(key.as_bytes())
    }

    /// Returns the `KeyId` of the key, inserting it if necessary.
    ///
    /// Looking up a previously inserted key never modifies the map. Inserting a new key assigns it the next `KeyId`,
    /// and a zeroed record; this may expand the table, and move the keys and records in memory, but never alters the
    /// `KeyId` of previously inserted keys.
    ///
    /// Returns an error, without modifying the map, if the key is longer than 2^32 - 1 bytes or if the pool of
    /// `KeyId` is exhausted.
    ///
    /// #   Complexity
    ///
    /// Amortized O(key.len()).
    pub fn get_or_insert(&mut self, key: &[u8]) -> Result<KeyId, InternMapError> {
        let hash = self.hasher.hash_bytes(key);

        let index = match self.probe(hash, key) {
            Probe::Found(id) => return Ok(id),
            Probe::Vacant(index) => index,
        };

        let length: u32 = key.len().try_into().map_err(|_| InternMapError::KeyTooLong)?;

        let id = match u32::try_from(self.len()) {
            Ok(id) if id < KeyId::MAX_COUNT => KeyId::new(id),
            _ => return Err(InternMapError::IdPoolExhausted),
        };

        let index = if self.table.is_overloaded(self.len()) {
            self.table.expand(&self.hasher);
            self.expansions += 1;

            //  The vacant slot found earlier is meaningless under the new mask.
            match self.probe(hash, key) {
                Probe::Vacant(index) => index,
                Probe::Found(_) => unreachable!("Key was not found prior to expansion"),
            }
        } else {
            index
        };

        let offset = self.keys.append(key);

        self.records.push(&RecordHeader { id, length, offset });

        self.table.occupy(index, id, hash);

        Ok(id)
    }

    /// Returns the `KeyId` of the string, inserting it if necessary.
    ///
    /// See `get_or_insert`.
    pub fn get_or_insert_str(&mut self, key: &str) -> Result<KeyId, InternMapError> {
        self.get_or_insert(key.as_bytes())
    }
}

impl<H> fmt::Debug for InternMap<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{{ statistics: {:?}, slots: [", self.statistics())?;

        for (index, (slot_index, slot)) in self.table.iter().enumerate() {
            let separator = if index > 0 { ", " } else { "" };

            let header = self.records.header(slot.id());
            let key = self.keys.slice(header.offset, header.length);

            write!(f, "{separator}{slot_index} -> ({}, {:#010x}) -> ", slot.id(), slot.hash())?;

            if let Ok(string) = core::str::from_utf8(key) {
                write!(f, "{string:?}")?;
            } else {
                write!(f, "{key:x?}")?;
            }
        }

        write!(f, "] }}")
    }
}

/// A builder for the InternMap.
#[derive(Clone, Debug)]
pub struct InternMapBuilder<H> {
    hasher: H,
    capacity: usize,
    payload_size: usize,
    alignment: usize,
}

impl<H> InternMapBuilder<H> {
    /// Sets the initial number of slots of the table, 128 by default.
    ///
    /// The table doubles whenever more than half its slots are occupied prior to an insertion. Tables of less than 4
    /// slots are rounded up to 4 slots, as smaller tables could be completely filled.
    ///
    /// The number of slots must be a power of 2, which is checked by `build`.
    pub fn set_capacity(&mut self, capacity: usize) -> &mut Self {
        self.capacity = capacity;
        self
    }

    /// Sets the number of user bytes in each record, 0 by default.
    pub fn set_payload_size(&mut self, payload_size: usize) -> &mut Self {
        self.payload_size = payload_size;
        self
    }

    /// Sets the alignment of the records, 16 by default.
    ///
    /// The size of each record, header included, is rounded up to a multiple of the alignment.
    ///
    /// The alignment must be a power of 2, and at least 8, which is checked by `build`.
    pub fn set_alignment(&mut self, alignment: usize) -> &mut Self {
        self.alignment = alignment;
        self
    }

    /// Attempts to build an InternMap with the current configuration.
    ///
    /// This may fail either because:
    ///
    /// -   The capacity is 0, or not a power of 2.
    /// -   Or the alignment is less than 8, or not a power of 2.
    pub fn build(self) -> Result<InternMap<H>, InternMapError> {
        if self.capacity.count_ones() != 1 {
            return Err(InternMapError::InvalidCapacity);
        }

        if self.alignment.count_ones() != 1 || self.alignment < MIN_ALIGNMENT {
            return Err(InternMapError::InvalidAlignment);
        }

        let capacity = self.capacity.max(MIN_CAPACITY);

        log::debug!(
            "new map: {capacity} slots, {} payload bytes, {} alignment",
            self.payload_size,
            self.alignment
        );

        Ok(InternMap {
            hasher: self.hasher,
            table: SlotTable::new(capacity),
            keys: KeyArena::new(),
            records: RecordArena::new(self.payload_size, self.alignment),
            expansions: 0,
        })
    }
}

/// Statistics about the memory usage of an InternMap.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Statistics {
    /// Number of distinct keys.
    pub number_keys: usize,
    /// Number of slots of the table.
    pub number_slots: usize,
    /// Number of times the table was expanded.
    pub number_expansions: u32,
    /// Number of bytes used to store the keys, including one terminator per key.
    pub key_bytes: usize,
    /// Number of bytes of each record, header included.
    pub record_stride: usize,
    /// Number of bytes used to store the records.
    pub record_bytes: usize,
}

//
//  Implementation
//

const MIN_CAPACITY: usize = 4;
const MIN_ALIGNMENT: usize = 8;

impl<H> InternMap<H> {
    fn check_id(&self, id: KeyId) -> Result<(), InternMapError> {
        if id.index() < self.len() {
            Ok(())
        } else {
            Err(InternMapError::IdOutOfRange)
        }
    }

    fn get_header(&self, id: KeyId) -> Result<RecordHeader, InternMapError> {
        self.check_id(id)?;

        Ok(self.records.header(id))
    }
}

impl<H> InternMap<H>
where
    H: ProbeHasher,
{
    fn probe(&self, hash: u32, key: &[u8]) -> Probe {
        self.table.probe(&self.hasher, hash, |id| {
            let header = self.records.header(id);

            header.length as usize == key.len() && self.keys.slice(header.offset, header.length) == key
        })
    }
}

// mod tests
