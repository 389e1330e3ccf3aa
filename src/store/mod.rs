//! Lock-striped concurrent map variants.
//!
//! Two structural renditions of the same contract: [`ShardedMap`] bundles
//! each lock with the data it guards (preferred), [`StripedMap`] keeps the
//! flat indexed-array layout. Both route keys with
//! [`ShardSelector`](crate::ds::ShardSelector) and implement
//! [`ConcurrentMap`].

pub mod sharded;
pub mod striped;
pub mod traits;

pub use sharded::ShardedMap;
pub use striped::StripedMap;
pub use traits::ConcurrentMap;
