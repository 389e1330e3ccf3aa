//! Flat-array concurrent map: the historical lock-striping layout.
//!
//! Keeps the original parallel-arrays shape, a flat slice of locks indexed
//! by shard number on every operation, where
//! [`ShardedMap`](crate::store::ShardedMap) names each lock/data bundle as a
//! shard object. Each slot's lock directly wraps the mapping it guards, so
//! the index discipline the parallel-arrays layout demanded (lock `i` must
//! only ever guard map `i`) is enforced by construction rather than by
//! convention. Behavior is identical to `ShardedMap`; both implement
//! [`ConcurrentMap`] and the integration suite exercises them through the
//! same contract.

use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::{ShardKey, ShardSelector};
use crate::store::traits::ConcurrentMap;

/// Hash-partitioned concurrent map over a flat slice of locked stripes.
///
/// Comparative variant of [`ShardedMap`](crate::store::ShardedMap): same
/// routing, same locking rules, no cache-line padding and no named shard
/// type. Shard count is fixed at construction; zero is coerced to one.
#[derive(Debug)]
pub struct StripedMap<K, V> {
    stripes: Box<[RwLock<FxHashMap<K, V>>]>,
    selector: ShardSelector,
}

impl<K, V> StripedMap<K, V>
where
    K: ShardKey + Hash + Eq,
{
    /// Create a map with `num_shards` stripes. Zero is coerced to one.
    pub fn new(num_shards: usize) -> Self {
        Self::with_capacity(num_shards, 0)
    }

    /// Create a map pre-sizing each stripe for its share of `capacity`.
    pub fn with_capacity(num_shards: usize, capacity: usize) -> Self {
        let selector = ShardSelector::new(num_shards);
        let per_stripe = capacity.div_ceil(selector.shard_count());
        let stripes: Vec<RwLock<FxHashMap<K, V>>> = (0..selector.shard_count())
            .map(|_| {
                RwLock::new(FxHashMap::with_capacity_and_hasher(
                    per_stripe,
                    Default::default(),
                ))
            })
            .collect();
        Self {
            stripes: stripes.into_boxed_slice(),
            selector,
        }
    }

    fn stripe_index(&self, key: &K) -> usize {
        self.selector.shard_for_key(key)
    }
}

impl<K, V> ConcurrentMap<K, V> for StripedMap<K, V>
where
    K: ShardKey + Hash + Eq + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        let idx = self.stripe_index(key);
        self.stripes[idx].read().get(key).cloned()
    }

    fn insert(&self, key: K, value: V) -> Option<V> {
        let idx = self.stripe_index(&key);
        self.stripes[idx].write().insert(key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        let idx = self.stripe_index(key);
        self.stripes[idx].write().remove(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        let idx = self.stripe_index(key);
        self.stripes[idx].read().contains_key(key)
    }

    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::new();
        for stripe in self.stripes.iter() {
            let guard = stripe.read();
            keys.reserve(guard.len());
            keys.extend(guard.keys().cloned());
        }
        keys
    }

    fn len(&self) -> usize {
        self.stripes.iter().map(|stripe| stripe.read().len()).sum()
    }

    fn clear(&self) {
        for stripe in self.stripes.iter() {
            stripe.write().clear();
        }
    }

    fn shard_count(&self) -> usize {
        self.selector.shard_count()
    }
}
