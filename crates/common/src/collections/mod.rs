//! Prefix-tree data structures
//!
//! This module provides:
//! - **[`trie`]**: Generic prefix tree with sequential and concurrent backends
//! - **[`buffer_pool`]**: Reusable `String` scratch buffers
//! - **[`join_pool`]**: Interning pool for joined strings, built on the trie
//!
//! ## Usage
//!
//! ```rust
//! use keyseq_common::collections::{JoinPool, PrefixTree, SequentialTrie};
//!
//! let trie = SequentialTrie::new();
//! trie.add_path("abcd".chars(), 1).unwrap();
//! assert_eq!(trie.try_get_value(&['a', 'b', 'c', 'd']), Some(1));
//!
//! let pool = JoinPool::with_separator("/");
//! assert_eq!(&*pool.get(&["a", "b"]), "a/b");
//! ```

pub mod trie;

#[cfg(feature = "runtime")]
pub mod buffer_pool;
#[cfg(feature = "runtime")]
pub mod join_pool;

// Re-export commonly used types
#[cfg(feature = "runtime")]
pub use buffer_pool::{BufferPool, BufferPoolConfig, PooledBuffer};
#[cfg(feature = "runtime")]
pub use join_pool::{JoinPool, JoinPoolConfig, JoinPoolConfigBuilder};
#[cfg(feature = "runtime")]
pub use trie::{ConcurrentNode, ConcurrentTrie};
pub use trie::{
    DuplicateKeyError, PrefixTree, SequentialNode, SequentialTrie, TrieError, TrieNode, TrieStats,
};
