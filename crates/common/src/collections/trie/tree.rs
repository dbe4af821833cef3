//! Traversal algorithm shared by every trie backend.
//!
//! [`PrefixTree`] is implemented by a backend with two primitives (`root` and
//! `clear`); every other operation is a provided method written once against
//! [`TrieNode`].
//!
//! Each operation comes in two shapes:
//! - a slice form (`add`, `try_get_value`, `contains_key`, `get_or_add`)
//!   taking `&[K]`,
//! - a path form (`add_path`, `try_get_value_from_path`,
//!   `contains_key_from_path`, `get_or_add_path`) taking any iterable whose
//!   items borrow as `K`, including lazily produced ones such as
//!   `str::chars()`.
//!
//! Both shapes walk the same nodes and give identical results for identical
//! content.

use std::borrow::Borrow;
use std::hash::Hash;

use super::error::DuplicateKeyError;
use super::node::TrieNode;

/// Shape summary of a trie, computed by walking every reachable node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrieStats {
    /// Reachable nodes, root included.
    pub nodes: usize,
    /// Nodes holding a value.
    pub values: usize,
    /// Length of the longest path from the root.
    pub max_depth: usize,
}

/// Associative prefix tree addressed by sequences of `K`.
///
/// Values follow first-writer-wins: once a value is stored for a key
/// sequence it never changes until [`clear`](Self::clear).
pub trait PrefixTree<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Node backend.
    type Node: TrieNode<K, V>;

    /// Handle to the current root node.
    ///
    /// A handle taken before [`clear`](Self::clear) keeps addressing the old,
    /// complete graph.
    fn root(&self) -> <Self::Node as TrieNode<K, V>>::Ref;

    /// Installs a fresh root. The old graph is dropped as a unit once the
    /// last handle into it goes away.
    fn clear(&self);

    /// Walks `key` from the root, creating missing nodes, and returns the
    /// terminal node.
    fn get_or_add_node(&self, key: &[K]) -> <Self::Node as TrieNode<K, V>>::Ref {
        let mut node = self.root();
        for element in key {
            node = node.get_or_add_child(element);
        }
        node
    }

    /// Path form of [`get_or_add_node`](Self::get_or_add_node).
    fn get_or_add_node_path<I>(&self, path: I) -> <Self::Node as TrieNode<K, V>>::Ref
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let mut node = self.root();
        for item in path {
            let element: &K = item.borrow();
            node = node.get_or_add_child(element);
        }
        node
    }

    /// Like [`get_or_add_node_path`](Self::get_or_add_node_path), for paths
    /// made of borrowed key elements (`&str` segments for `String` keys).
    ///
    /// Owned key elements are only allocated for nodes that do not exist yet.
    fn get_or_add_node_by<'q, Q, I>(&self, path: I) -> <Self::Node as TrieNode<K, V>>::Ref
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized + 'q,
    {
        let mut node = self.root();
        for element in path {
            node = node.get_or_add_child(element);
        }
        node
    }

    /// Walks `key` without creating nodes.
    fn try_get_node(&self, key: &[K]) -> Option<<Self::Node as TrieNode<K, V>>::Ref> {
        let mut node = self.root();
        for element in key {
            node = node.try_get_child(element)?;
        }
        Some(node)
    }

    /// Path form of [`try_get_node`](Self::try_get_node).
    fn try_get_node_from_path<I>(&self, path: I) -> Option<<Self::Node as TrieNode<K, V>>::Ref>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let mut node = self.root();
        for item in path {
            let element: &K = item.borrow();
            node = node.try_get_child(element)?;
        }
        Some(node)
    }

    /// Stores `value` under `key`.
    ///
    /// Fails with [`DuplicateKeyError`] carrying `value` back when a value is
    /// already stored. Intermediate nodes created on the way stay in place.
    fn add(&self, key: &[K], value: V) -> Result<(), DuplicateKeyError<V>> {
        let node = self.get_or_add_node(key);
        node.try_insert_value(value).map(|_| ()).map_err(duplicate)
    }

    /// Path form of [`add`](Self::add).
    fn add_path<I>(&self, path: I, value: V) -> Result<(), DuplicateKeyError<V>>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let node = self.get_or_add_node_path(path);
        node.try_insert_value(value).map(|_| ()).map_err(duplicate)
    }

    /// Returns a clone of the value stored under `key`.
    fn try_get_value(&self, key: &[K]) -> Option<V>
    where
        V: Clone,
    {
        self.try_get_node(key)?.try_get_value().cloned()
    }

    /// Path form of [`try_get_value`](Self::try_get_value).
    fn try_get_value_from_path<I>(&self, path: I) -> Option<V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
        V: Clone,
    {
        self.try_get_node_from_path(path)?.try_get_value().cloned()
    }

    /// Returns `true` when a value is stored under `key`.
    ///
    /// Prefixes of stored keys without a value of their own report `false`.
    fn contains_key(&self, key: &[K]) -> bool {
        self.try_get_node(key).is_some_and(|node| node.has_value())
    }

    /// Path form of [`contains_key`](Self::contains_key).
    fn contains_key_from_path<I>(&self, path: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.try_get_node_from_path(path).is_some_and(|node| node.has_value())
    }

    /// Returns the value stored under `key`, storing `value` first if there
    /// is none.
    fn get_or_add(&self, key: &[K], value: V) -> V
    where
        V: Clone,
    {
        self.get_or_add_node(key).get_or_add_value(value).clone()
    }

    /// Factory form of [`get_or_add`](Self::get_or_add).
    ///
    /// `factory` only runs when no value is observed. On the concurrent
    /// backend it may still run and lose to a concurrent writer, in which
    /// case its result is dropped and the earlier value is returned.
    fn get_or_add_with<F>(&self, key: &[K], factory: F) -> V
    where
        F: FnOnce() -> V,
        V: Clone,
    {
        self.get_or_add_node(key).get_or_add_value_with(factory).clone()
    }

    /// Path form of [`get_or_add`](Self::get_or_add).
    fn get_or_add_path<I>(&self, path: I, value: V) -> V
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
        V: Clone,
    {
        self.get_or_add_node_path(path).get_or_add_value(value).clone()
    }

    /// Path form of [`get_or_add_with`](Self::get_or_add_with).
    fn get_or_add_path_with<I, F>(&self, path: I, factory: F) -> V
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
        F: FnOnce() -> V,
        V: Clone,
    {
        self.get_or_add_node_path(path).get_or_add_value_with(factory).clone()
    }

    /// Walks the whole graph reachable from the current root.
    ///
    /// `O(n)` in reachable nodes; meant for diagnostics and tests.
    fn stats(&self) -> TrieStats {
        let mut stats = TrieStats::default();
        let mut pending = vec![(self.root(), 0usize)];
        while let Some((node, depth)) = pending.pop() {
            stats.nodes += 1;
            if node.has_value() {
                stats.values += 1;
            }
            stats.max_depth = stats.max_depth.max(depth);
            pending.extend(node.children().into_iter().map(|child| (child, depth + 1)));
        }
        stats
    }

    /// Returns `true` when no value is reachable from the root.
    fn is_empty(&self) -> bool {
        self.stats().values == 0
    }
}

fn duplicate<V>((_, rejected): (&V, V)) -> DuplicateKeyError<V> {
    DuplicateKeyError::new(rejected)
}
