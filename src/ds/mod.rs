pub mod shard;

pub use shard::{Fnv1a64, ShardKey, ShardSelector, TextKey};
