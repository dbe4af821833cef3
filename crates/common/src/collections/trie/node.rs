//! Node contract shared by every trie backend.
//!
//! A node owns two pieces of state:
//! - a set-once value slot ("first writer wins"),
//! - a lazily created map from one key element to a child node.
//!
//! Every node except a root also remembers the key element on the edge that
//! leads to it, which lets the recent-child cache be a bare child handle.
//!
//! Backends only decide how the child map, the value slot and the cache are
//! stored. The lookup algorithm (consult the recent-child cache, fall back to
//! the map, refresh the cache) lives here as provided methods and is shared.

use std::borrow::Borrow;
use std::hash::Hash;
use std::ops::Deref;

use super::error::TrieError;

/// A vertex of a trie keyed by sequences of `K` and holding values of `V`.
///
/// Implementors supply storage primitives; callers use the provided methods
/// ([`get_or_add_child`](Self::get_or_add_child),
/// [`try_get_child`](Self::try_get_child),
/// [`get_or_add_value`](Self::get_or_add_value), ...).
///
/// Child lookups accept any borrowed form `Q` of the key element, so a trie
/// keyed by `String` can be walked with `&str` segments.
pub trait TrieNode<K, V>: Sized {
    /// Shared handle to a node.
    type Ref: Clone + Deref<Target = Self>;

    /// Key element on the edge from the parent; `None` for a root.
    fn edge(&self) -> Option<&K>;

    /// Current recent-child cache entry.
    ///
    /// Never authoritative: a stale or missing entry only costs a map lookup.
    fn recent_child(&self) -> Option<Self::Ref>;

    /// Replaces the recent-child cache entry. `child` must be installed in
    /// this node's child map.
    fn remember_child(&self, child: &Self::Ref);

    /// Authoritative read-only child lookup. Never creates the child map.
    fn find_child<Q>(&self, key: &Q) -> Option<Self::Ref>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Returns the installed child for `key`, installing a fresh node if
    /// none exists. Concurrent callers racing on the same key must all get
    /// the same child back.
    fn find_or_insert_child<Q>(&self, key: &Q) -> Self::Ref
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized;

    /// Handles to every installed child, in no particular order.
    fn children(&self) -> Vec<Self::Ref>;

    /// Current state of the value slot.
    fn try_get_value(&self) -> Option<&V>;

    /// Stores `value` if the slot is unset.
    ///
    /// Returns `Ok` with the stored value when this call set it, or
    /// `Err((current, value))` handing back the value that was already
    /// present together with the rejected one.
    fn try_insert_value(&self, value: V) -> Result<&V, (&V, V)>;

    /// Returns the cached child when it was resolved for `key`.
    ///
    /// The cache only ever holds an installed child, so a match is a real
    /// child of this node.
    fn cached_child<Q>(&self, key: &Q) -> Option<Self::Ref>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.recent_child()
            .filter(|child| child.edge().is_some_and(|edge| <K as Borrow<Q>>::borrow(edge) == key))
    }

    /// Returns the child for `key`, creating it when absent.
    fn get_or_add_child<Q>(&self, key: &Q) -> Self::Ref
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(child) = self.cached_child(key) {
            return child;
        }
        let child = self.find_or_insert_child(key);
        self.remember_child(&child);
        child
    }

    /// Returns the child for `key` without creating anything.
    ///
    /// Refreshing the cache on a hit costs a handle clone, never an owned
    /// key element.
    fn try_get_child<Q>(&self, key: &Q) -> Option<Self::Ref>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(child) = self.cached_child(key) {
            return Some(child);
        }
        let child = self.find_child(key)?;
        self.remember_child(&child);
        Some(child)
    }

    /// Returns the child for `key`, failing with
    /// [`TrieError::ChildNotFound`] when it is absent.
    ///
    /// For callers that already know the child exists.
    fn get_child<Q>(&self, key: &Q) -> Result<Self::Ref, TrieError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get_child(key).ok_or(TrieError::ChildNotFound)
    }

    /// Returns `true` once a value has been stored.
    fn has_value(&self) -> bool {
        self.try_get_value().is_some()
    }

    /// Stores `value` if the slot is unset; returns whether this call set it.
    fn try_set_value(&self, value: V) -> bool {
        self.try_insert_value(value).is_ok()
    }

    /// Returns the stored value, storing `value` first if the slot is unset.
    ///
    /// When another writer wins the race, its value is returned and `value`
    /// is dropped.
    fn get_or_add_value(&self, value: V) -> &V {
        match self.try_insert_value(value) {
            Ok(stored) => stored,
            Err((current, _rejected)) => current,
        }
    }

    /// Like [`get_or_add_value`](Self::get_or_add_value), but only builds the
    /// value when the slot is observed unset.
    ///
    /// On the concurrent backend the factory can still run and have its
    /// result discarded, when another writer sets the slot between the check
    /// and the insert.
    fn get_or_add_value_with<F>(&self, factory: F) -> &V
    where
        F: FnOnce() -> V,
    {
        if let Some(current) = self.try_get_value() {
            return current;
        }
        self.get_or_add_value(factory())
    }

    /// Number of installed children.
    fn child_count(&self) -> usize {
        self.children().len()
    }
}
