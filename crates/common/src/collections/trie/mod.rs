//! Associative prefix tree keyed by sequences of `K`.
//!
//! A trie maps whole key sequences (`[K]` slices or any iterable of `K`) to
//! at most one value each. Every prefix of a stored sequence is a node; the
//! empty sequence addresses the root.
//!
//! ## Backends
//! - [`SequentialTrie`]: plain hash-map children behind per-node
//!   `parking_lot` locks. Built by one writer, then readable from any
//!   number of threads; the type is `Send` and `Sync`.
//! - [`ConcurrentTrie`] (feature `runtime`): lock-free reads, `DashMap`
//!   child maps and atomically swapped root, for any number of concurrent
//!   readers and writers.
//!
//! Both implement [`PrefixTree`], which carries the traversal algorithm, and
//! their nodes implement [`TrieNode`].
//!
//! ## Semantics
//! - Values are write-once: the first stored value for a key sequence wins
//!   until the trie is cleared. [`PrefixTree::add`] reports a duplicate by
//!   returning [`DuplicateKeyError`] with the rejected value.
//! - Racing writers on the same `(node, key element)` all receive the single
//!   installed child.
//! - Nodes remember the most recently resolved child so repeated walks down
//!   the same branch skip the map lookup. Each child carries its own edge
//!   key, so refreshing that cache never allocates.
//! - Graphs are released from an explicit work list; key length never bounds
//!   stack depth on `clear` or drop.
//!
//! ## Complexity
//! Walks are `O(m)` hash lookups for a sequence of `m` elements.
//! [`PrefixTree::stats`] and [`PrefixTree::is_empty`] visit every node.

mod error;
mod node;
mod sequential;
mod tree;

#[cfg(feature = "runtime")]
mod concurrent;

#[cfg(feature = "runtime")]
pub use concurrent::{ConcurrentNode, ConcurrentTrie};
pub use error::{DuplicateKeyError, TrieError};
pub use node::TrieNode;
pub use sequential::{SequentialNode, SequentialTrie};
pub use tree::{PrefixTree, TrieStats};
