#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// An open-addressing hash table using double hashing with tombstone
/// deletion.
///
/// This module provides the `HashTable` along with the `KeyOps` trait used
/// to inject hash and equality behavior at construction.
pub mod hash_table;

pub use hash_table::FnKeyOps;
#[cfg(feature = "foldhash")]
pub use hash_table::FoldKeyOps;
pub use hash_table::HashTable;
pub use hash_table::KeyOps;
pub use hash_table::MIN_CAPACITY;
