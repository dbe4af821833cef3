#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

//! Trie safe for unsynchronized concurrent readers and writers.
//!
//! ## Synchronization
//! - Child maps are [`DashMap`]s created lazily on first insert. A missing
//!   child is installed through the map's entry API, so racing writers on
//!   the same `(node, key)` pair all observe the single installed child.
//! - The value slot is a set-once cell: the first completed insert wins and
//!   every later reader or writer observes it.
//! - Child maps use a small fixed shard count, since every node carries one.
//! - The recent-child cache and the root are [`arc_swap`] cells holding
//!   immutable snapshots. Readers never block on them.
//! - No node-level or tree-level lock is taken.
//!
//! ## Clear
//! [`clear`](PrefixTree::clear) swaps in a fresh root. Traversals already
//! holding the previous root finish against the old graph, which stays
//! complete and internally consistent until the last handle is dropped.
//! Dropping a graph releases nodes from an explicit work list, so key length
//! never bounds stack depth.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use super::node::TrieNode;
use super::tree::PrefixTree;

const CHILD_SHARDS: usize = 4;

type ChildMap<K, V> = DashMap<K, Arc<ConcurrentNode<K, V>>>;

/// Node of a [`ConcurrentTrie`].
pub struct ConcurrentNode<K, V>
where
    K: Hash + Eq,
{
    edge: Option<K>,
    value: OnceCell<V>,
    children: OnceCell<ChildMap<K, V>>,
    recent: ArcSwapOption<ConcurrentNode<K, V>>,
}

impl<K, V> ConcurrentNode<K, V>
where
    K: Hash + Eq,
{
    fn new(edge: Option<K>) -> Self {
        Self {
            edge,
            value: OnceCell::new(),
            children: OnceCell::new(),
            recent: ArcSwapOption::empty(),
        }
    }

    /// Detaches the cache and the child map, handing back the children.
    fn detach_children(&mut self) -> Option<ChildMap<K, V>> {
        self.recent.store(None);
        self.children.take()
    }
}

impl<K, V> Drop for ConcurrentNode<K, V>
where
    K: Hash + Eq,
{
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Self>> = match self.detach_children() {
            Some(children) => children.into_iter().map(|(_, child)| child).collect(),
            None => return,
        };
        while let Some(child) = pending.pop() {
            // Shared children are released by their last holder.
            if let Some(mut child) = Arc::into_inner(child) {
                if let Some(grandchildren) = child.detach_children() {
                    pending.extend(grandchildren.into_iter().map(|(_, node)| node));
                }
            }
        }
    }
}

impl<K, V> TrieNode<K, V> for ConcurrentNode<K, V>
where
    K: Hash + Eq,
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
        let children = self.children.get()?;
        let entry = children.get(key)?;
        Some(Arc::clone(entry.value()))
    }

    fn find_or_insert_child<Q>(&self, key: &Q) -> Arc<Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let children = self.children.get_or_init(|| DashMap::with_shard_amount(CHILD_SHARDS));
        if let Some(existing) = children.get(key) {
            return Arc::clone(existing.value());
        }
        let entry = children.entry(key.to_owned()).or_insert_with(|| {
            trace!("installing trie node");
            Arc::new(Self::new(Some(key.to_owned())))
        });
        Arc::clone(entry.value())
    }

    fn children(&self) -> Vec<Arc<Self>> {
        self.children
            .get()
            .map(|map| map.iter().map(|entry| Arc::clone(entry.value())).collect())
            .unwrap_or_default()
    }

    fn child_count(&self) -> usize {
        self.children.get().map_or(0, |map| map.len())
    }

    fn try_get_value(&self) -> Option<&V> {
        self.value.get()
    }

    fn try_insert_value(&self, value: V) -> Result<&V, (&V, V)> {
        self.value.try_insert(value)
    }
}

impl<K, V> fmt::Debug for ConcurrentNode<K, V>
where
    K: Hash + Eq,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentNode")
            .field("value", &self.value.get())
            .field("children", &self.children.get().map_or(0, |map| map.len()))
            .finish_non_exhaustive()
    }
}

/// Trie shared freely between threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use keyseq_common::collections::trie::{ConcurrentTrie, PrefixTree};
///
/// let trie: Arc<ConcurrentTrie<char, i32>> = Arc::new(ConcurrentTrie::new());
/// let handles: Vec<_> = (0..4)
///     .map(|id| {
///         let trie = Arc::clone(&trie);
///         thread::spawn(move || trie.get_or_add_path("shared".chars(), id))
///     })
///     .collect();
///
/// let winners: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
/// let stored = trie.try_get_value_from_path("shared".chars()).unwrap();
/// assert!(winners.iter().all(|&w| w == stored));
/// ```
pub struct ConcurrentTrie<K, V>
where
    K: Hash + Eq,
{
    root: ArcSwap<ConcurrentNode<K, V>>,
}

impl<K, V> ConcurrentTrie<K, V>
where
    K: Hash + Eq,
{
    /// Creates an empty trie.
    pub fn new() -> Self {
        debug!("creating concurrent trie");
        Self { root: ArcSwap::from_pointee(ConcurrentNode::new(None)) }
    }
}

impl<K, V> Default for ConcurrentTrie<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PrefixTree<K, V> for ConcurrentTrie<K, V>
where
    K: Hash + Eq + Clone,
{
    type Node = ConcurrentNode<K, V>;

    fn root(&self) -> Arc<ConcurrentNode<K, V>> {
        self.root.load_full()
    }

    fn clear(&self) {
        let previous = self.root.swap(Arc::new(ConcurrentNode::new(None)));
        debug!(root_children = previous.child_count(), "cleared concurrent trie");
    }
}

impl<K, V> fmt::Debug for ConcurrentTrie<K, V>
where
    K: Hash + Eq,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentTrie").field("root", &*self.root.load()).finish()
    }
}
