//  Append-only storage of fixed-stride records, one per key.

use alloc::vec::Vec;

use crate::{id::KeyId, keys::KeyOffset};

/// The header at the start of each record.
///
/// The header is serialized into, and deserialized from, the first `HEADER_SIZE` bytes of the record; the bytes
/// beyond belong to the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RecordHeader {
    /// Id of the key, that is the index of the record.
    pub(crate) id: KeyId,
    /// Length of the key, in bytes.
    pub(crate) length: u32,
    /// Offset of the key in the `KeyArena`.
    pub(crate) offset: KeyOffset,
}

impl RecordHeader {
    /// Size of the header, in bytes.
    pub(crate) const SIZE: usize = 16;

    /// Writes the header in the first `SIZE` bytes of `record`.
    ///
    /// #   Panics
    ///
    /// If `record` is shorter than `SIZE`.
    pub(crate) fn write_to(&self, record: &mut [u8]) {
        record[0..4].copy_from_slice(&self.id.get().to_le_bytes());
        record[4..8].copy_from_slice(&self.length.to_le_bytes());
        record[8..16].copy_from_slice(&self.offset.0.to_le_bytes());
    }

    /// Reads the header from the first `SIZE` bytes of `record`.
    ///
    /// #   Panics
    ///
    /// If `record` is shorter than `SIZE`.
    pub(crate) fn read_from(record: &[u8]) -> Self {
        let id = u32::from_le_bytes(field(&record[0..4]));
        let length = u32::from_le_bytes(field(&record[4..8]));
        let offset = u64::from_le_bytes(field(&record[8..16]));

        Self {
            id: KeyId::new(id),
            length,
            offset: KeyOffset(offset),
        }
    }
}

/// The records, catenated, each `stride` bytes.
pub(crate) struct RecordArena {
    stride: usize,
    bytes: Vec<u8>,
}

impl RecordArena {
    /// Creates an empty arena, where each record has room for at least `payload_size` bytes after the header.
    ///
    /// The stride is rounded up to a multiple of `alignment`.
    ///
    /// #   Panics
    ///
    /// If `alignment` is not a power of 2.
    pub(crate) fn new(payload_size: usize, alignment: usize) -> Self {
        assert_eq!(1, alignment.count_ones());

        let stride = round_up(RecordHeader::SIZE + payload_size, alignment);

        Self {
            stride,
            bytes: Vec::new(),
        }
    }

    /// Returns the number of bytes of each record, header included.
    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of records.
    pub(crate) fn len(&self) -> usize {
        self.bytes.len() / self.stride
    }

    /// Returns the total number of bytes used by the records.
    pub(crate) fn number_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Appends a zeroed record, starting with `header`.
    ///
    /// The id of the header must be the number of records prior to the call.
    pub(crate) fn push(&mut self, header: &RecordHeader) {
        debug_assert_eq!(self.len(), header.id.index());

        let start = self.bytes.len();

        self.bytes.resize(start + self.stride, 0);

        header.write_to(&mut self.bytes[start..]);
    }

    /// Returns the header of the record.
    ///
    /// #   Panics
    ///
    /// If `id` is out of bounds.
    pub(crate) fn header(&self, id: KeyId) -> RecordHeader {
        RecordHeader::read_from(self.record(id))
    }

    /// Returns the record, header included.
    ///
    /// #   Panics
    ///
    /// If `id` is out of bounds.
    pub(crate) fn record(&self, id: KeyId) -> &[u8] {
        let start = id.index() * self.stride;

        &self.bytes[start..start + self.stride]
    }

    /// Returns the payload of the record, header excluded.
    ///
    /// #   Panics
    ///
    /// If `id` is out of bounds.
    pub(crate) fn payload(&self, id: KeyId) -> &[u8] {
        &self.record(id)[RecordHeader::SIZE..]
    }

    /// Returns the payload of the record, header excluded.
    ///
    /// #   Panics
    ///
    /// If `id` is out of bounds.
    pub(crate) fn payload_mut(&mut self, id: KeyId) -> &mut [u8] {
        let start = id.index() * self.stride;

        &mut self.bytes[start + RecordHeader::SIZE..start + self.stride]
    }
}

//
//  Implementation
//

fn round_up(value: usize, alignment: usize) -> usize {
    debug_assert_eq!(1, alignment.count_ones());

    (value + alignment - 1) & !(alignment - 1)
}

fn field<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut result = [0; N];
    result.copy_from_slice(bytes);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounding() {
        assert_eq!(16, RecordArena::new(0, 16).stride());
        assert_eq!(32, RecordArena::new(1, 16).stride());
        assert_eq!(48, RecordArena::new(32, 16).stride());
        assert_eq!(144, RecordArena::new(127, 16).stride());
        assert_eq!(24, RecordArena::new(1, 8).stride());
        assert_eq!(64, RecordArena::new(1, 64).stride());
    }

    #[test]
    fn header_layout() {
        let header = RecordHeader {
            id: KeyId::new(0x0403_0201),
            length: 0x0807_0605,
            offset: KeyOffset(0x1009_0807_0605_0403),
        };

        let mut record = [0xff; 20];
        header.write_to(&mut record);

        assert_eq!(
            [1, 2, 3, 4, 5, 6, 7, 8, 3, 4, 5, 6, 7, 8, 9, 0x10, 0xff, 0xff, 0xff, 0xff],
            record
        );
        assert_eq!(header, RecordHeader::read_from(&record));
    }

    #[test]
    fn push_zeroes_payload() {
        let mut arena = RecordArena::new(32, 16);

        for i in 0..3 {
            let header = RecordHeader {
                id: KeyId::new(i),
                length: i,
                offset: KeyOffset(u64::from(i) * 10),
            };

            arena.push(&header);

            assert_eq!(header, arena.header(KeyId::new(i)));
            assert!(arena.payload(KeyId::new(i)).iter().all(|&b| b == 0));
        }

        assert_eq!(3, arena.len());
        assert_eq!(3 * 48, arena.number_bytes());
        assert_eq!(32, arena.payload(KeyId::new(1)).len());
    }

    #[test]
    fn payload_isolation() {
        let mut arena = RecordArena::new(8, 8);

        for i in 0..64 {
            arena.push(&RecordHeader {
                id: KeyId::new(i),
                length: 0,
                offset: KeyOffset(0),
            });
        }

        arena.payload_mut(KeyId::new(7)).fill(0xaa);

        for i in 0..64 {
            let id = KeyId::new(i);
            let expected = if i == 7 { 0xaa } else { 0 };

            assert_eq!(id, arena.header(id).id);
            assert!(arena.payload(id).iter().all(|&b| b == expected), "{i}");
        }
    }
} // mod tests
