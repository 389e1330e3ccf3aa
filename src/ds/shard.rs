//! Deterministic key-to-shard routing for lock-striped containers.
//!
//! Provides the hashing layer used by [`ShardedMap`](crate::store::ShardedMap)
//! and [`StripedMap`](crate::store::StripedMap): a seedless 64-bit FNV-1a
//! hasher, a byte-encoding trait for keys, and a selector that folds the hash
//! into a shard index.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Shard Selection Flow                         │
//! │                                                                     │
//! │   Input Key (str / integer / TextKey)                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │   ┌─────────────────────────────────────────────────────────────┐   │
//! │   │  ShardKey::absorb - canonical byte encoding                 │   │
//! │   │    strings  → raw UTF-8 bytes                               │   │
//! │   │    integers → little-endian bytes                           │   │
//! │   │    TextKey  → Display rendering, as bytes                   │   │
//! │   └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │   ┌─────────────────────────────────────────────────────────────┐   │
//! │   │  Fnv1a64: state = basis; per byte: state ^= b; state *= p   │   │
//! │   └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │   ShardSelector { shards: 4 } → hash % 4                            │
//! │                                                                     │
//! │   ┌─────────┬─────────┬─────────┬─────────┐                         │
//! │   │ Shard 0 │ Shard 1 │ Shard 2 │ Shard 3 │                         │
//! │   └─────────┴─────────┴─────────┴─────────┘                         │
//! │
//! │   Properties
//! │   ──────────
//! │   • Deterministic: same (key bytes, shards) always yields same index
//! │   • Seedless: stable across processes and runs
//! │   • Total: every key that encodes to bytes maps into [0, shards)
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Concepts
//!
//! - **Byte encoding over type identity**: which bytes a key hashes to is
//!   decided at compile time by its [`ShardKey`] implementation, not by
//!   inspecting the type at runtime.
//! - **Stable routing**: FNV-1a with the standard offset basis and prime,
//!   no per-process seed, so a key's shard survives restarts.
//! - **Routing hash only**: the selector places a key on a shard; lookup
//!   inside the shard uses the map's own hasher.
//!
//! ## Example Usage
//!
//! ```
//! use shardkit::ds::ShardSelector;
//!
//! let selector = ShardSelector::new(4);
//!
//! let shard_a = selector.shard_for_key("user:123");
//! let shard_b = selector.shard_for_key(&7_u64);
//!
//! assert!(shard_a < 4);
//! assert!(shard_b < 4);
//!
//! // Same key always maps to the same shard.
//! assert_eq!(selector.shard_for_key("user:123"), shard_a);
//! ```

use std::fmt;

/// Incremental 64-bit FNV-1a hasher.
///
/// Absorbs bytes one at a time: xor the byte into the state, then multiply
/// by the FNV prime (wrapping). No seed; the initial state is the standard
/// offset basis, so digests are stable across processes.
///
/// # Example
///
/// ```
/// use shardkit::ds::Fnv1a64;
///
/// let mut hasher = Fnv1a64::new();
/// hasher.write(b"foobar");
/// assert_eq!(hasher.finish(), 0x8594_4171_f739_67e8);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    /// Creates a hasher at the FNV-1a offset basis.
    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }

    /// Absorbs `bytes` into the digest, in order.
    pub fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }

    /// Returns the digest of everything absorbed so far.
    pub fn finish(&self) -> u64 {
        self.state
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical byte encoding of a key for shard routing.
///
/// A key type decides, at compile time, which bytes represent it to the
/// routing hash: strings absorb their raw UTF-8 bytes, fixed-width integers
/// absorb their little-endian bytes, and any `Display` type can opt in
/// through [`TextKey`]. Two keys that encode to the same bytes always land
/// on the same shard.
///
/// # Example
///
/// ```
/// use shardkit::ds::{Fnv1a64, ShardKey};
///
/// let mut direct = Fnv1a64::new();
/// direct.write(b"alice");
///
/// let mut via_key = Fnv1a64::new();
/// "alice".absorb(&mut via_key);
///
/// assert_eq!(direct.finish(), via_key.finish());
/// ```
pub trait ShardKey {
    /// Feeds this key's byte encoding to `hasher`.
    fn absorb(&self, hasher: &mut Fnv1a64);
}

impl ShardKey for str {
    fn absorb(&self, hasher: &mut Fnv1a64) {
        hasher.write(self.as_bytes());
    }
}

impl ShardKey for String {
    fn absorb(&self, hasher: &mut Fnv1a64) {
        hasher.write(self.as_bytes());
    }
}

impl<T: ShardKey + ?Sized> ShardKey for &T {
    fn absorb(&self, hasher: &mut Fnv1a64) {
        (**self).absorb(hasher);
    }
}

macro_rules! impl_shard_key_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ShardKey for $ty {
                /// Absorbs the value's little-endian bytes.
                fn absorb(&self, hasher: &mut Fnv1a64) {
                    hasher.write(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_shard_key_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Adapter routing any `Display` type through its textual rendering.
///
/// The fallback encoding for key types without a natural byte layout: the
/// value is formatted once and the resulting UTF-8 bytes are absorbed.
/// Wrap values at the call site; the wrapper derives the map-key traits so
/// it can serve as the container key directly.
///
/// # Example
///
/// ```
/// use shardkit::ds::{ShardSelector, TextKey};
///
/// let selector = ShardSelector::new(8);
///
/// // f64 has no ShardKey impl; route it through its text form.
/// let shard = selector.shard_for_key(&TextKey(3.5_f64));
/// assert!(shard < 8);
/// assert_eq!(selector.shard_for_key(&TextKey(3.5_f64)), shard);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextKey<T>(pub T);

impl<T: fmt::Display> ShardKey for TextKey<T> {
    fn absorb(&self, hasher: &mut Fnv1a64) {
        hasher.write(self.0.to_string().as_bytes());
    }
}

impl<T: fmt::Display> fmt::Display for TextKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deterministic shard selector over a fixed shard count.
///
/// Maps any [`ShardKey`] to an index in `[0, shards)` by hashing its byte
/// encoding with seedless FNV-1a and reducing modulo the shard count. The
/// same `(key, shards)` pair always produces the same index.
///
/// # Example
///
/// ```
/// use shardkit::ds::ShardSelector;
///
/// let selector = ShardSelector::new(8);
///
/// let shard = selector.shard_for_key("my_key");
/// assert_eq!(selector.shard_for_key("my_key"), shard);
///
/// // Integer keys route by their little-endian bytes.
/// let int_shard = selector.shard_for_key(&12_345_u64);
/// assert!(int_shard < 8);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards.
    ///
    /// The shard count is clamped to at least 1.
    ///
    /// # Example
    ///
    /// ```
    /// use shardkit::ds::ShardSelector;
    ///
    /// let selector = ShardSelector::new(16);
    /// assert_eq!(selector.shard_count(), 16);
    ///
    /// // Zero shards is clamped to 1.
    /// let single = ShardSelector::new(0);
    /// assert_eq!(single.shard_count(), 1);
    /// ```
    pub fn new(shards: usize) -> Self {
        Self {
            shards: shards.max(1),
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps a key to a shard index in `[0, shards)`.
    ///
    /// Pure in the key's byte encoding: identical bytes always route to the
    /// same shard for a fixed shard count.
    ///
    /// # Example
    ///
    /// ```
    /// use shardkit::ds::ShardSelector;
    ///
    /// let selector = ShardSelector::new(4);
    ///
    /// let shard = selector.shard_for_key("user:alice");
    /// assert!(shard < 4);
    /// assert_eq!(selector.shard_for_key("user:alice"), shard);
    /// ```
    pub fn shard_for_key<K: ShardKey + ?Sized>(&self, key: &K) -> usize {
        let mut hasher = Fnv1a64::new();
        key.absorb(&mut hasher);
        (hasher.finish() % self.shards as u64) as usize
    }
}

impl Default for ShardSelector {
    /// Creates a single-shard selector.
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_matches_reference_vectors() {
        let empty = Fnv1a64::new();
        assert_eq!(empty.finish(), 0xcbf2_9ce4_8422_2325);

        let mut one = Fnv1a64::new();
        one.write(b"a");
        assert_eq!(one.finish(), 0xaf63_dc4c_8601_ec8c);

        let mut word = Fnv1a64::new();
        word.write(b"foobar");
        assert_eq!(word.finish(), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn fnv1a_is_incremental() {
        let mut split = Fnv1a64::new();
        split.write(b"foo");
        split.write(b"bar");

        let mut whole = Fnv1a64::new();
        whole.write(b"foobar");

        assert_eq!(split.finish(), whole.finish());
    }

    #[test]
    fn selector_is_deterministic() {
        let selector = ShardSelector::new(8);

        let a = selector.shard_for_key("key");
        let b = selector.shard_for_key("key");
        assert_eq!(a, b);
        assert!(a < selector.shard_count());
    }

    #[test]
    fn selector_covers_range_for_many_keys() {
        for shards in [1, 2, 3, 7, 64] {
            let selector = ShardSelector::new(shards);
            for i in 0..1000_u64 {
                assert!(selector.shard_for_key(&i) < shards);
                assert!(selector.shard_for_key(format!("k{i}").as_str()) < shards);
            }
        }
    }

    #[test]
    fn selector_clamps_zero_shards() {
        let selector = ShardSelector::new(0);
        assert_eq!(selector.shard_count(), 1);
        assert_eq!(selector.shard_for_key("anything"), 0);
    }

    #[test]
    fn string_and_str_encode_identically() {
        let selector = ShardSelector::new(16);
        let owned = String::from("user:42");
        assert_eq!(
            selector.shard_for_key(&owned),
            selector.shard_for_key("user:42")
        );
    }

    #[test]
    fn signed_integers_encode_as_twos_complement() {
        // -1i64 and u64::MAX share a byte pattern, so they share a shard.
        let selector = ShardSelector::new(13);
        assert_eq!(
            selector.shard_for_key(&-1_i64),
            selector.shard_for_key(&u64::MAX)
        );
    }

    #[test]
    fn integer_encoding_is_little_endian() {
        let selector = ShardSelector::new(97);

        let mut raw = Fnv1a64::new();
        raw.write(&[5, 0, 0, 0, 0, 0, 0, 0]);
        let expected = (raw.finish() % 97) as usize;

        assert_eq!(selector.shard_for_key(&5_u64), expected);
    }

    #[test]
    fn text_key_encodes_display_output() {
        let selector = ShardSelector::new(11);

        let mut raw = Fnv1a64::new();
        raw.write(b"3.5");
        let expected = (raw.finish() % 11) as usize;

        assert_eq!(selector.shard_for_key(&TextKey(3.5_f64)), expected);
    }
}
