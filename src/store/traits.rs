//! Contract shared by the lock-striped map variants.
//!
//! Both [`ShardedMap`](crate::store::ShardedMap) and
//! [`StripedMap`](crate::store::StripedMap) implement [`ConcurrentMap`], so
//! callers, tests, and benchmarks can swap one structural variant for the
//! other without touching call sites. Implementations route every keyed
//! operation to exactly one shard and never hold more than one shard lock
//! at a time.

/// Keyed operations over a hash-partitioned concurrent map.
///
/// Values are returned by clone, matching value-copy map semantics; absence
/// is reported through `Option`, never as an error. Whole-map operations
/// (`keys`, `len`, `clear`) visit shards strictly one at a time, so their
/// results are per-shard-consistent rather than a single point-in-time view
/// of the container.
pub trait ConcurrentMap<K, V>: Send + Sync {
    /// Fetch a clone of the value for `key`, taking the owning shard's read
    /// lock only.
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or overwrite under the owning shard's write lock. Returns the
    /// previous value if the key was present.
    fn insert(&self, key: K, value: V) -> Option<V>;

    /// Remove a key under the owning shard's write lock. Absent keys are a
    /// no-op returning `None`.
    fn remove(&self, key: &K) -> Option<V>;

    /// Check whether a key is present, taking the owning shard's read lock.
    fn contains_key(&self, key: &K) -> bool;

    /// Collect every key, visiting shards in index order under one read
    /// lock at a time.
    ///
    /// Not a linearizable snapshot: each shard is consistent with itself at
    /// the moment it was visited, but concurrent inserts into
    /// already-visited shards and removals from not-yet-visited shards are
    /// reflected inconsistently. A key that stays present on its shard for
    /// the whole call always appears; one absent throughout never does.
    fn keys(&self) -> Vec<K>
    where
        K: Clone;

    /// Total entry count, summed shard by shard under one read lock at a
    /// time. Same consistency caveat as [`keys`](ConcurrentMap::keys).
    fn len(&self) -> usize;

    /// Check whether the map has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries, visiting shards in index order under one write
    /// lock at a time. Concurrent writers may repopulate already-cleared
    /// shards before the call returns.
    fn clear(&self);

    /// Number of shards fixed at construction.
    fn shard_count(&self) -> usize;
}
