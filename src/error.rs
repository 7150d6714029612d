/// Errors from the library.
use core::{error, fmt};

/// Errors returned by this library.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InternMapError {
    /// The initial number of slots is zero, or not a power of 2.
    InvalidCapacity,
    /// The alignment of the records is not a power of 2, or is less than 8.
    InvalidAlignment,
    /// The `KeyId` was not issued by this instance of `InternMap`.
    IdOutOfRange,
    /// The key is longer than 2^32 - 1 bytes.
    KeyTooLong,
    /// The pool of `KeyId` has been exhausted.
    IdPoolExhausted,
    /// The key is not a valid UTF-8 string.
    NotUtf8,
    /// The key contains a NUL byte, and cannot be viewed as a C string.
    InteriorNul,
}

impl fmt::Display for InternMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:?}", self)
    }
}

impl error::Error for InternMapError {}
