#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

//! Single-writer trie backed by plain hash maps.
//!
//! ## Complexity
//! - Walking a key of length `m` costs `O(m)` expected map operations; a
//!   repeated walk of the same edge skips the map via the recent-child cache.
//! - `clear` is `O(1)`; the old graph is released when the last handle into
//!   it is dropped, from an explicit work list rather than by recursion.
//!
//! ## Thread Safety
//! Nodes are shared through `Arc` and each child map sits behind a
//! [`parking_lot::RwLock`], so the trie is `Send` and `Sync` whenever `K`,
//! `V` and `S` are. Lookups only take shared locks and may run from any
//! number of threads. Inserts take the node's exclusive lock: racing writers
//! stay correct but queue on each other, so build from one thread (or behind
//! an outer lock) and share the result for reads. Use
//! [`ConcurrentTrie`](super::ConcurrentTrie) when writers contend.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::node::TrieNode;
use super::tree::PrefixTree;

type ChildMap<K, V, S> = HashMap<K, Arc<SequentialNode<K, V, S>>, S>;

/// Node of a [`SequentialTrie`].
pub struct SequentialNode<K, V, S = RandomState> {
    edge: Option<K>,
    value: OnceCell<V>,
    children: RwLock<Option<ChildMap<K, V, S>>>,
    recent: ArcSwapOption<SequentialNode<K, V, S>>,
    hasher: S,
}

impl<K, V, S> SequentialNode<K, V, S> {
    fn with_hasher(edge: Option<K>, hasher: S) -> Self {
        Self {
            edge,
            value: OnceCell::new(),
            children: RwLock::new(None),
            recent: ArcSwapOption::empty(),
            hasher,
        }
    }

    /// Detaches the cache and the child map, handing back the children.
    fn detach_children(&mut self) -> Option<ChildMap<K, V, S>> {
        self.recent.store(None);
        self.children.get_mut().take()
    }
}

impl<K, V, S> Drop for SequentialNode<K, V, S> {
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Self>> = match self.detach_children() {
            Some(children) => children.into_values().collect(),
            None => return,
        };
        while let Some(child) = pending.pop() {
            // Shared children are released by their last holder.
            if let Some(mut child) = Arc::into_inner(child) {
                if let Some(grandchildren) = child.detach_children() {
                    pending.extend(grandchildren.into_values());
                }
            }
        }
    }
}

impl<K, V, S> TrieNode<K, V> for SequentialNode<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    type Ref = Arc<Self>;

    fn edge(&self) -> Option<&K> {
        self.edge.as_ref()
    }

    fn recent_child(&self) -> Option<Arc<Self>> {
        self.recent.load_full()
    }

    fn remember_child(&self, child: &Arc<Self>) {
        self.recent.store(Some(Arc::clone(child)));
    }

    fn find_child<Q>(&self, key: &Q) -> Option<Arc<Self>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.children.read().as_ref()?.get(key).cloned()
    }

    fn find_or_insert_child<Q>(&self, key: &Q) -> Arc<Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(existing) = self.find_child(key) {
            return existing;
        }
        let mut children = self.children.write();
        let map = children.get_or_insert_with(|| HashMap::with_hasher(self.hasher.clone()));
        if let Some(existing) = map.get(key) {
            return Arc::clone(existing);
        }
        let child = Arc::new(Self::with_hasher(Some(key.to_owned()), self.hasher.clone()));
        map.insert(key.to_owned(), Arc::clone(&child));
        child
    }

    fn children(&self) -> Vec<Arc<Self>> {
        self.children
            .read()
            .as_ref()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }

    fn child_count(&self) -> usize {
        self.children.read().as_ref().map_or(0, |map| map.len())
    }

    fn try_get_value(&self) -> Option<&V> {
        self.value.get()
    }

    fn try_insert_value(&self, value: V) -> Result<&V, (&V, V)> {
        self.value.try_insert(value)
    }
}

impl<K, V, S> fmt::Debug for SequentialNode<K, V, S>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self.children.read().as_ref().map_or(0, |map| map.len());
        f.debug_struct("SequentialNode")
            .field("value", &self.value.get())
            .field("children", &children)
            .finish_non_exhaustive()
    }
}

/// Trie built by one writer and readable from any thread.
///
/// # Examples
///
/// ```
/// use keyseq_common::collections::trie::{PrefixTree, SequentialTrie};
///
/// let trie = SequentialTrie::new();
/// trie.add_path("abc".chars(), 1).unwrap();
///
/// assert_eq!(trie.try_get_value(&['a', 'b', 'c']), Some(1));
/// assert!(!trie.contains_key_from_path("ab".chars()));
/// assert!(trie.add_path("abc".chars(), 2).is_err());
/// ```
pub struct SequentialTrie<K, V, S = RandomState> {
    root: RwLock<Arc<SequentialNode<K, V, S>>>,
    hasher: S,
}

impl<K, V> SequentialTrie<K, V, RandomState> {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S: Clone> SequentialTrie<K, V, S> {
    /// Creates an empty trie whose child maps hash key elements with
    /// `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        let root = SequentialNode::with_hasher(None, hasher.clone());
        Self { root: RwLock::new(Arc::new(root)), hasher }
    }

    /// Returns the hasher used by child maps.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<K, V> Default for SequentialTrie<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PrefixTree<K, V> for SequentialTrie<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Node = SequentialNode<K, V, S>;

    fn root(&self) -> Arc<SequentialNode<K, V, S>> {
        Arc::clone(&*self.root.read())
    }

    fn clear(&self) {
        let fresh = Arc::new(SequentialNode::with_hasher(None, self.hasher.clone()));
        let previous = mem::replace(&mut *self.root.write(), fresh);
        // Released after the root lock is gone.
        drop(previous);
    }
}

impl<K, V, S> fmt::Debug for SequentialTrie<K, V, S>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialTrie").field("root", &*self.root.read()).finish()
    }
}
