//! Prefix trees keyed by element sequences, and the interning pools built on
//! them.
//!
//! # Safety and Quality
//!
//! This crate forbids `unsafe` code. Both trie backends share nodes through
//! `Arc` and build on `parking_lot`, `dashmap`, `arc-swap` and `once_cell`
//! rather than hand-written synchronization.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, node contract, traversal, sequential trie
//! - `observability`: tracing for the runtime tier
//! - `runtime` (default): concurrent trie, buffer pool, join pool

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod collections;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use collections::{ConcurrentTrie, JoinPool};
#[cfg(feature = "foundation")]
pub use collections::{DuplicateKeyError, PrefixTree, SequentialTrie, TrieError, TrieNode};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
