use shardkit::store::{ConcurrentMap, ShardedMap};

fn main() {
    let map: ShardedMap<&str, u64> = ShardedMap::new(4);

    map.insert("alice", 31);
    map.insert("bob", 42);
    map.insert("charlie", 27);
    map.insert("dave", 35);
    map.insert("eve", 29);

    if let Some(age) = map.get(&"alice") {
        println!("alice: {age}");
    }

    map.remove(&"bob");
    println!("contains bob? {}", map.contains_key(&"bob"));

    let mut names = map.keys();
    names.sort_unstable();
    println!("{} keys: {}", map.len(), names.join(", "));
}

// Expected output:
// alice: 31
// contains bob? false
// 4 keys: alice, charlie, dave, eve
//
// Explanation: each key hashes to one of 4 shards, so operations on
// different names contend on different locks. keys() visits the shards
// one at a time; sorting makes the printed order stable.
