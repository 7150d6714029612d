//! String interning map.
//!
//! The `InternMap` assigns each distinct key, a slice of bytes, a dense and stable 32-bits `KeyId`, and associates a
//! fixed-size record with it, which the user may read and write in place.
//!
//!
//! #   How to use?
//!
//! If you just want to get going, use the `new` method with an initial number of slots and the number of bytes of
//! user data to associate with each key, and you'll get an `InternMap` which will be quite fine.
//!
//! You can always tune it later, using the configuration options.
//!
//!
//! #   Configuration options
//!
//! The `InternMap` offers multiple configuration options, available via the `InternMapBuilder`:
//!
//! -   The hashing algorithm can be tuned, it defaults to MurmurHash3.
//! -   The initial number of slots of the table can be tuned, it defaults to 128.
//! -   The number of bytes of user data per key can be tuned, it defaults to 0.
//! -   The alignment of the records can be tuned, it defaults to 16 bytes.
//!
//!
//! #   Guarantees
//!
//! -   The n-th distinct key inserted receives the `KeyId` n - 1.
//! -   Looking up a previously inserted key never modifies the map.
//! -   A `KeyId`, once issued, is never reassigned nor invalidated.
//!
//!
//! #   Limits
//!
//! The `InternMap` has some hard limits, due to design constraints:
//!
//! -   It supports only keys up to 4GB, eg. 2**32 - 1 bytes.
//! -   It supports only up to 4 billions unique keys, eg. 2**32 - 1.
//! -   It does not support removing keys.
//!
//!
//! #   Internals
//!
//! The `InternMap` contains three distinct areas:
//!
//! -   A key store, in which all keys are catenated, each followed by a NUL byte.
//! -   A record store, in which all records are catenated. The record of a key starts with a header containing its
//!     `KeyId`, and the offset and length of the key within the key store, followed by the user data.
//! -   A table of slots, each either vacant or holding a `KeyId` and the hash of its key.
//!
//! The table uses open addressing: on collision, the hash is re-hashed to determine the next slot to probe. Whenever
//! the table is more than half full prior to an insertion, its number of slots is doubled.
//!
//! Both stores grow by reallocation, hence the user is handed out `KeyId` rather than pointers, and borrows of a key or
//! record cannot outlive the next insertion.

//  Use only core and alloc, guaranteeing no I/O nor threads.
#![cfg_attr(not(test), no_std)]
//  Storage is plain vectors, there's no need for unsafe.
#![forbid(unsafe_code)]
//  Ensure proper documentation.
#![deny(missing_docs)]

//  Non-core must be explicitly depended on in no_std.
extern crate alloc;

mod error;
mod hash;
mod id;
mod keys;
mod map;
mod records;
mod table;

pub use error::InternMapError;
pub use hash::{Murmur3Hasher, ProbeHasher};
pub use id::KeyId;
pub use map::{InternMap, InternMapBuilder, Statistics};
