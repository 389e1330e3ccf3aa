//! Bundled-shard concurrent map: one lock adjacent to the data it guards.
//!
//! ## Architecture
//! - The key space is partitioned across N shards fixed at construction.
//! - Each shard bundles its own `RwLock` with its own `FxHashMap`, so a
//!   lock can never be paired with the wrong shard's data.
//! - [`ShardSelector`](crate::ds::ShardSelector) routes every keyed
//!   operation to exactly one shard by seedless FNV-1a.
//!
//! ## Key Components
//! - `Shard`: private `RwLock<FxHashMap<K, V>>` bundle, cache-line aligned.
//! - `ShardedMap`: the public container, `Box<[Shard]>` plus selector.
//!
//! ## Core Operations
//! - `get` / `contains_key`: shared lock on the owning shard.
//! - `insert` / `remove`: exclusive lock on the owning shard.
//! - `keys` / `len` / `clear`: all shards in index order, one lock at a time.
//!
//! ## Locking Model
//! - Readers share a shard; a writer excludes readers and writers on that
//!   shard only. Operations on different shards never contend.
//! - No operation holds two shard locks simultaneously, so no lock-order
//!   deadlock is possible.
//! - Whole-map views are per-shard-consistent, not linearizable; see
//!   [`ConcurrentMap::keys`].
//!
//! ## When to Use
//! - Many threads hammer a shared map and a single global lock serializes
//!   them; striping lets disjoint keys proceed in parallel.
//! - This is the preferred variant; [`StripedMap`](crate::store::StripedMap)
//!   keeps the flat-array layout for comparison.
//!
//! ## Example Usage
//! ```
//! use shardkit::store::{ConcurrentMap, ShardedMap};
//!
//! let map: ShardedMap<&str, u64> = ShardedMap::new(8);
//! map.insert("alice", 42);
//! assert_eq!(map.get(&"alice"), Some(42));
//! assert_eq!(map.get(&"bob"), None);
//! ```
//!
//! ## Thread Safety
//! - `ShardedMap` is `Send + Sync`; all mutation goes through per-shard
//!   interior mutability.
//!
//! ## Implementation Notes
//! - Shard routing hashes the key's [`ShardKey`] byte encoding; lookup
//!   inside a shard uses the map's own Fx hasher.
//! - Shards are `#[repr(align(64))]` so adjacent lock words do not share a
//!   cache line under write contention.

use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::{ShardKey, ShardSelector};
use crate::store::traits::ConcurrentMap;

/// One partition: the lock and the mapping it guards, bundled together.
#[derive(Debug)]
#[repr(align(64))]
struct Shard<K, V> {
    entries: RwLock<FxHashMap<K, V>>,
}

impl<K, V> Shard<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            )),
        }
    }
}

/// Hash-partitioned concurrent map with one read-write lock per shard.
///
/// The bundled variant: each shard owns its lock and its data as one unit.
/// Shard count is fixed at construction (zero is coerced to one) and a key
/// lives in exactly one shard, determined by `fnv1a(key) % shard_count`.
///
/// # Example
///
/// ```
/// use shardkit::store::{ConcurrentMap, ShardedMap};
///
/// let map: ShardedMap<String, i32> = ShardedMap::new(4);
///
/// map.insert("bob".to_string(), 19);
/// assert_eq!(map.insert("bob".to_string(), 20), Some(19));
///
/// assert_eq!(map.remove(&"bob".to_string()), Some(20));
/// assert_eq!(map.remove(&"bob".to_string()), None);
/// ```
#[derive(Debug)]
pub struct ShardedMap<K, V> {
    shards: Box<[Shard<K, V>]>,
    selector: ShardSelector,
}

impl<K, V> ShardedMap<K, V>
where
    K: ShardKey + Hash + Eq,
{
    /// Create a map with `num_shards` shards. Zero is coerced to one.
    pub fn new(num_shards: usize) -> Self {
        Self::with_capacity(num_shards, 0)
    }

    /// Create a map pre-sizing each shard for its share of `capacity`
    /// entries. The capacity is a hint, not a limit.
    pub fn with_capacity(num_shards: usize, capacity: usize) -> Self {
        let selector = ShardSelector::new(num_shards);
        let per_shard = capacity.div_ceil(selector.shard_count());
        let shards: Vec<Shard<K, V>> = (0..selector.shard_count())
            .map(|_| Shard::with_capacity(per_shard))
            .collect();
        Self {
            shards: shards.into_boxed_slice(),
            selector,
        }
    }

    /// The shard owning `key`.
    fn shard(&self, key: &K) -> &Shard<K, V> {
        &self.shards[self.selector.shard_for_key(key)]
    }
}

impl<K, V> ConcurrentMap<K, V> for ShardedMap<K, V>
where
    K: ShardKey + Hash + Eq + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Fetch a value by key from its owning shard.
    fn get(&self, key: &K) -> Option<V> {
        self.shard(key).entries.read().get(key).cloned()
    }

    /// Insert or overwrite, returning the previous value if present.
    fn insert(&self, key: K, value: V) -> Option<V> {
        self.shard(&key).entries.write().insert(key, value)
    }

    /// Remove a key; absent keys return `None`.
    fn remove(&self, key: &K) -> Option<V> {
        self.shard(key).entries.write().remove(key)
    }

    /// Check whether a key exists on its owning shard.
    fn contains_key(&self, key: &K) -> bool {
        self.shard(key).entries.read().contains_key(key)
    }

    /// Collect all keys, shard by shard.
    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::new();
        for shard in self.shards.iter() {
            let guard = shard.entries.read();
            keys.reserve(guard.len());
            keys.extend(guard.keys().cloned());
        }
        keys
    }

    /// Sum entry counts across shards.
    fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.entries.read().len())
            .sum()
    }

    /// Clear every shard, one write lock at a time.
    fn clear(&self) {
        for shard in self.shards.iter() {
            shard.entries.write().clear();
        }
    }

    /// Number of shards.
    fn shard_count(&self) -> usize {
        self.selector.shard_count()
    }
}
