//  MurmurHash3, x86 32-bits flavor.
//
//  The exact algorithm is Austin Appleby's, from `https://github.com/aappleby/smhasher`, with blocks read in
//  little-endian order.

/// A hashing algorithm usable by `InternMap`.
///
/// Two operations are required:
///
/// -   `hash_bytes` computes the base hash of a key.
/// -   `hash_u32` computes the next step of a probing sequence, from the current step.
///
/// Both must be deterministic for the lifetime of the map: the probing sequence of a key is reproduced, step by step,
/// on every lookup and on every expansion of the table.
pub trait ProbeHasher {
    /// Hashes a key.
    fn hash_bytes(&self, bytes: &[u8]) -> u32;

    /// Hashes the current probe value, to obtain the next one.
    fn hash_u32(&self, value: u32) -> u32;
}

/// A fast non-cryptographic hashing algorithm, with good avalanche behavior.
///
/// The seed is only used by `hash_bytes`; `hash_u32` always uses the hashed value as its own seed.
///
/// This is NOT a cryptographic algorithm, and hash values should not be persisted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Murmur3Hasher {
    seed: u32,
}

impl Murmur3Hasher {
    /// The seed used by `Default`.
    pub const DEFAULT_SEED: u32 = 0xcafe_babe;

    /// Creates a new instance with this specific seed.
    #[inline(always)]
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Returns the seed of this instance.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for Murmur3Hasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl ProbeHasher for Murmur3Hasher {
    #[inline(always)]
    fn hash_bytes(&self, bytes: &[u8]) -> u32 {
        murmur3_x86_32(bytes, self.seed)
    }

    #[inline(always)]
    fn hash_u32(&self, value: u32) -> u32 {
        murmur3_x86_32(&value.to_le_bytes(), value)
    }
}

//
//  Implementation
//

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

#[inline]
fn murmur3_x86_32(bytes: &[u8], seed: u32) -> u32 {
    let mut hash = seed;

    let mut blocks = bytes.chunks_exact(4);

    for block in &mut blocks {
        let block = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);

        hash ^= mix_block(block);
        hash = hash.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();

    if !tail.is_empty() {
        let block = tail
            .iter()
            .rev()
            .fold(0u32, |block, &byte| (block << 8) | u32::from(byte));

        hash ^= mix_block(block);
    }

    //  Only the low 32 bits of the length participate, as in the reference implementation.
    hash ^= bytes.len() as u32;

    fmix32(hash)
}

#[inline(always)]
fn mix_block(block: u32) -> u32 {
    block.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

//  Forces all bits of a hash block to avalanche.
#[inline(always)]
fn fmix32(mut hash: u32) -> u32 {
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2_ae35);
    hash ^= hash >> 16;

    hash
}

// mod tests
