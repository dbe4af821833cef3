//! Integration tests for `keyseq_common::collections::trie`.
//!
//! Exercises the traversal surface through the public [`PrefixTree`] trait on
//! the sequential backend, and on the concurrent backend when the `runtime`
//! feature is enabled.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use keyseq_common::collections::{PrefixTree, SequentialTrie, TrieNode, TrieStats};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: [&str; 6] = ["", "abcd", "dcba", "abcdef", "the brown fox", "xxx"];

/// Key length far beyond what a recursive teardown could survive.
const DEEP: usize = 100_000;

fn chars(word: &str) -> Vec<char> {
    word.chars().collect()
}

/// Inserts [`WORDS`] one at a time, checking after each insert that every
/// inserted word resolves through both lookup forms and every pending word
/// does not.
fn run_incremental_words<T>(trie: &T)
where
    T: PrefixTree<char, String>,
{
    for (inserted, word) in WORDS.iter().enumerate() {
        trie.add(&chars(word), (*word).to_string()).unwrap();

        for present in &WORDS[..=inserted] {
            assert_eq!(trie.try_get_value(&chars(present)).as_deref(), Some(*present));
            assert_eq!(trie.try_get_value_from_path(present.chars()).as_deref(), Some(*present));
            assert!(trie.contains_key(&chars(present)));
            assert!(trie.contains_key_from_path(present.chars()));
        }
        for pending in &WORDS[inserted + 1..] {
            assert_eq!(trie.try_get_value(&chars(pending)), None);
            assert_eq!(trie.try_get_value_from_path(pending.chars()), None);
            assert!(!trie.contains_key(&chars(pending)));
            assert!(!trie.contains_key_from_path(pending.chars()));
        }
    }
}

/// Stores, clears and drops a [`DEEP`]-element key, keeping handles into
/// the old graph alive across `clear` and across dropping the trie.
fn run_deep_key<T>(trie: T)
where
    T: PrefixTree<u32, u8>,
{
    let key = vec![7u32; DEEP];
    trie.add(&key, 1).unwrap();
    assert_eq!(trie.try_get_value(&key), Some(1));
    assert!(!trie.contains_key(&key[..DEEP - 1]));
    assert_eq!(trie.stats().max_depth, DEEP);

    let old_root = trie.root();
    trie.clear();
    assert!(trie.is_empty());
    assert_eq!(old_root.child_count(), 1);
    drop(old_root);

    trie.add_path(key.iter(), 2).unwrap();
    let middle = trie.get_or_add_node(&key[..DEEP / 2]);
    drop(trie);

    let tail = key[DEEP / 2..].iter().try_fold(middle, |node, element| node.try_get_child(element));
    assert_eq!(tail.and_then(|node| node.try_get_value().copied()), Some(2));
}

fn run_first_writer_wins<T>(trie: &T)
where
    T: PrefixTree<char, String>,
{
    trie.add_path("key".chars(), "v1".to_string()).unwrap();
    let rejected = trie.add(&chars("key"), "v2".to_string()).unwrap_err();

    assert_eq!(rejected.into_inner(), "v2");
    assert_eq!(trie.try_get_value_from_path("key".chars()).as_deref(), Some("v1"));
    assert_eq!(trie.get_or_add_path("key".chars(), "v3".to_string()), "v1");
}

/// Validates incremental inserts on `SequentialTrie` for the word list
/// scenario.
///
/// Assertions:
/// - Confirms each inserted word (the empty word included) is found by both
///   slice and path lookups.
/// - Ensures words not inserted yet are reported missing by both forms.
#[test]
fn sequential_incremental_words() {
    let trie = SequentialTrie::new();
    run_incremental_words(&trie);

    let stats = trie.stats();
    assert_eq!(stats.values, WORDS.len());
    assert_eq!(stats.max_depth, "the brown fox".len());
}

/// Validates first-writer-wins on `SequentialTrie`.
///
/// Assertions:
/// - Confirms a duplicate `add` returns the rejected value.
/// - Confirms the stored value never changes.
#[test]
fn sequential_first_writer_wins() {
    run_first_writer_wins(&SequentialTrie::new());
}

/// Validates incremental inserts on `ConcurrentTrie` for the word list
/// scenario.
///
/// Assertions:
/// - Confirms the concurrent backend answers the same as the sequential one.
#[cfg(feature = "runtime")]
#[test]
fn concurrent_incremental_words() {
    let trie = keyseq_common::collections::ConcurrentTrie::new();
    run_incremental_words(&trie);
    run_first_writer_wins(&keyseq_common::collections::ConcurrentTrie::new());
}

/// Validates a very deep key on `SequentialTrie`.
///
/// Assertions:
/// - Confirms the deep key round-trips and its prefix holds no value.
/// - Confirms `clear` and dropping the trie release the graph, including
///   while a handle into the middle of it is still held.
#[test]
fn sequential_deep_key_round_trip_and_release() {
    let trie: SequentialTrie<u32, u8> = SequentialTrie::new();
    run_deep_key(trie);
}

/// Validates a very deep key on `ConcurrentTrie`.
///
/// Assertions:
/// - Confirms the concurrent backend releases deep graphs the same way.
#[cfg(feature = "runtime")]
#[test]
fn concurrent_deep_key_round_trip_and_release() {
    let trie: keyseq_common::collections::ConcurrentTrie<u32, u8> =
        keyseq_common::collections::ConcurrentTrie::new();
    run_deep_key(trie);
}

/// Validates a `SequentialTrie` built on one thread and read on another.
///
/// Assertions:
/// - Confirms every word stored by the building thread resolves after the
///   trie is handed back through `join`.
#[test]
fn sequential_trie_moves_between_threads() {
    let built = thread::spawn(|| {
        let trie: SequentialTrie<char, usize> = SequentialTrie::new();
        for (index, word) in WORDS.iter().enumerate() {
            trie.add_path(word.chars(), index).unwrap();
        }
        trie
    })
    .join()
    .unwrap();

    for (index, word) in WORDS.iter().enumerate() {
        assert_eq!(built.try_get_value_from_path(word.chars()), Some(index));
    }
}

/// Validates a `SequentialTrie` mutated behind an outer lock while readers
/// walk a second, already built trie without one.
///
/// Assertions:
/// - Confirms writers serialized by a `Mutex` store one value per key.
/// - Ensures lock-free readers only ever observe stored values.
#[test]
fn sequential_trie_shared_across_threads() {
    let guarded: Arc<Mutex<SequentialTrie<u8, usize>>> =
        Arc::new(Mutex::new(SequentialTrie::new()));
    let writers: Vec<_> = (0..4usize)
        .map(|id| {
            let guarded = Arc::clone(&guarded);
            thread::spawn(move || {
                for key in 0..16u8 {
                    guarded.lock().get_or_add(&[key, key % 3], id);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    let guarded = guarded.lock();
    assert_eq!(guarded.stats().values, 16);

    let shared: SequentialTrie<char, usize> = SequentialTrie::new();
    for word in WORDS {
        shared.add_path(word.chars(), word.len()).unwrap();
    }
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for word in WORDS.iter().rev() {
                    assert_eq!(shared.try_get_value_from_path(word.chars()), Some(word.len()));
                }
                assert!(!shared.contains_key_from_path("abc".chars()));
            });
        }
    });
}

/// Validates that sequences of different lengths never collide.
///
/// Assertions:
/// - Confirms `["ab"]`, `["a", "b"]` and `["abc"]` hold independent values.
/// - Ensures the prefix `["a"]` holds no value.
#[test]
fn length_independent_string_keys() {
    let trie: SequentialTrie<String, u8> = SequentialTrie::new();

    trie.add(&["ab".to_string()], 1).unwrap();
    trie.add(&["a".to_string(), "b".to_string()], 2).unwrap();
    trie.add(&["abc".to_string()], 3).unwrap();

    assert_eq!(trie.try_get_value(&["ab".to_string()]), Some(1));
    assert_eq!(trie.try_get_value(&["a".to_string(), "b".to_string()]), Some(2));
    assert_eq!(trie.try_get_value(&["abc".to_string()]), Some(3));
    assert!(!trie.contains_key(&["a".to_string()]));
    assert_eq!(trie.stats(), TrieStats { nodes: 5, values: 3, max_depth: 2 });
}

/// Validates `clear` resets every stored key.
///
/// Assertions:
/// - Ensures no previously stored key is found after `clear`.
/// - Confirms keys can be stored again afterwards.
#[test]
fn clear_resets_fully() {
    let trie: SequentialTrie<char, usize> = SequentialTrie::new();
    for word in WORDS {
        trie.add_path(word.chars(), word.len()).unwrap();
    }

    trie.clear();

    for word in WORDS {
        assert!(!trie.contains_key_from_path(word.chars()));
    }
    assert!(trie.is_empty());
    trie.add_path("abcd".chars(), 99).unwrap();
    assert_eq!(trie.try_get_value_from_path("abcd".chars()), Some(99));
}

/// Validates walking nodes by hand from `root()`.
///
/// Assertions:
/// - Confirms the node reached by `try_get_child` holds the stored value.
/// - Confirms `get_or_add_node` returns the same node as the manual walk.
#[test]
fn manual_walk_matches_facade() {
    let trie: SequentialTrie<char, &str> = SequentialTrie::new();
    trie.add_path("fox".chars(), "animal").unwrap();

    let node = "fox".chars().try_fold(trie.root(), |node, ch| node.try_get_child(&ch)).unwrap();
    let via_facade = trie.get_or_add_node(&chars("fox"));

    assert_eq!(node.try_get_value(), Some(&"animal"));
    assert!(Arc::ptr_eq(&node, &via_facade));
    assert!(trie.try_get_node_from_path("foxes".chars()).is_none());
}

/// Validates randomized byte sequences against a `HashMap` model.
///
/// Assertions:
/// - Confirms `add` succeeds exactly when the model has no entry.
/// - Confirms every model entry is readable from the trie.
#[test]
fn random_sequences_match_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let trie = SequentialTrie::new();
    let mut model: HashMap<Vec<u8>, u32> = HashMap::new();

    for value in 0..500u32 {
        let len = rng.gen_range(0..6);
        let key: Vec<u8> = (0..len).map(|_| rng.gen_range(b'a'..=b'c')).collect();

        let added = trie.add(&key, value).is_ok();
        assert_eq!(added, !model.contains_key(&key));
        model.entry(key).or_insert(value);
    }

    for (key, value) in &model {
        assert_eq!(trie.try_get_value(key), Some(*value));
    }
    assert_eq!(trie.stats().values, model.len());
}
