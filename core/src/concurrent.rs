use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Keys that route to a shard by `key mod shard_count`.
pub trait ShardKey: Copy + Ord {
    fn shard_index(&self, shard_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {$(
        impl ShardKey for $t {
            #[inline]
            fn shard_index(&self, shard_count: usize) -> usize {
                (*self as i128).rem_euclid(shard_count as i128) as usize
            }
        }
    )*};
}

impl_shard_key!(i32, i64, u32, u64, usize);

/// Map split into independently locked shards. Writers touching different
/// shards never wait on each other.
pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V: Default> ConcurrentMap<K, V> {
    /// Panics if `shard_count` is zero.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        let shards = (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize { self.shards.len() }

    fn shard(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        &self.shards[key.shard_index(self.shards.len())]
    }

    /// Locks the owning shard and returns the value for `key`, inserting the
    /// default first if absent. The shard stays locked while the guard lives.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V> {
        MutexGuard::map(self.shard(&key).lock(), |map| map.entry(key).or_default())
    }

    /// Removes `key`, locking only its shard.
    pub fn erase(&self, key: &K) -> Option<V> {
        self.shard(key).lock().remove(key)
    }

    /// Merges every shard into one ordered map, locking the shards one at a time.
    /// Callers must make sure no writer is still running.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            result.append(&mut shard.lock());
        }
        result
    }

    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for shard in self.shards {
            result.append(&mut shard.into_inner());
        }
        result
    }
}
