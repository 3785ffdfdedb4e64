#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
pub mod benchmark;

/// Table and benchmark configuration.
pub mod config;

pub mod error;

pub mod hash_fns;

/// A raw open-addressing hash table with linear probing and tombstones.
///
/// This module provides the `HashTable` that `HashSet` is built on. Callers
/// supply hashes and equality predicates per operation.
pub mod hash_table;

/// A hash set over the linear-probing `HashTable`.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub mod hasher;

pub use config::BenchConfig;
pub use config::TableConfig;
pub use error::Error;
pub use error::ErrorKind;
pub use hash_fns::HashFunction;
pub use hash_set::HashSet;
pub use hash_table::Entry;
pub use hash_table::HashTable;
pub use hasher::BuildMicroHasher;
pub use hasher::MicroHasher;
