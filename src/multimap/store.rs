use super::types::Data;
use crate::routing::partitioner::Partitioner;
use dashmap::DashMap;
use std::sync::Arc;

/// The local slice of the distributed multimap: named collections, each
/// sharded partition-first so a partition's entries can be enumerated or
/// handed off wholesale. Values under a key form a set (duplicate puts are
/// rejected).
///
/// Entry locks are per key and reentrant per logical thread: the owner
/// thread may re-acquire, every other thread is refused. Operations consult
/// `lock_owner` before touching an entry.
pub struct MultiMapStore {
    partitioner: Arc<Partitioner>,
    collections: DashMap<String, Collection>,
}

#[derive(Default)]
struct Collection {
    partitions: DashMap<u32, DashMap<Data, Vec<Data>>>,
    locks: DashMap<Data, EntryLock>,
}

#[derive(Debug, Clone, Copy)]
struct EntryLock {
    owner_thread: u64,
    count: u32,
}

impl MultiMapStore {
    pub fn new(partitioner: Arc<Partitioner>) -> Self {
        Self {
            partitioner,
            collections: DashMap::new(),
        }
    }

    /// Adds `value` to the set under `key`. Returns `false` when the exact
    /// pair is already stored, leaving the state untouched.
    pub fn put(&self, name: &str, key: Data, value: Data) -> bool {
        let partition = self.partitioner.partition_for(key.as_slice());
        let collection = self.collections.entry(name.to_string()).or_default();
        let partition_map = collection.partitions.entry(partition).or_default();
        let mut values = partition_map.entry(key).or_default();

        if values.contains(&value) {
            return false;
        }
        values.push(value);
        true
    }

    /// Removes one value from the set under `key`. Returns whether the pair
    /// was present. A key whose set drains empty disappears entirely.
    pub fn remove(&self, name: &str, key: &Data, value: &Data) -> bool {
        let Some(collection) = self.collections.get(name) else {
            return false;
        };
        let partition = self.partitioner.partition_for(key.as_slice());
        let Some(partition_map) = collection.partitions.get(&partition) else {
            return false;
        };
        let Some(mut values) = partition_map.get_mut(key) else {
            return false;
        };

        let Some(idx) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(idx);
        drop(values);

        partition_map.remove_if(key, |_, values| values.is_empty());
        true
    }

    pub fn contains_key(&self, name: &str, key: &Data) -> bool {
        let partition = self.partitioner.partition_for(key.as_slice());
        if let Some(collection) = self.collections.get(name)
            && let Some(partition_map) = collection.partitions.get(&partition)
            && let Some(values) = partition_map.get(key)
        {
            return !values.is_empty();
        }
        false
    }

    pub fn contains_entry(&self, name: &str, key: &Data, value: &Data) -> bool {
        let partition = self.partitioner.partition_for(key.as_slice());
        if let Some(collection) = self.collections.get(name)
            && let Some(partition_map) = collection.partitions.get(&partition)
            && let Some(values) = partition_map.get(key)
        {
            return values.contains(value);
        }
        false
    }

    pub fn value_count(&self, name: &str, key: &Data) -> usize {
        let partition = self.partitioner.partition_for(key.as_slice());
        if let Some(collection) = self.collections.get(name)
            && let Some(partition_map) = collection.partitions.get(&partition)
            && let Some(values) = partition_map.get(key)
        {
            return values.len();
        }
        0
    }

    /// Acquires the entry lock for `thread_id`. Reentrant: the owner thread
    /// may acquire again (the lock counts acquisitions). Returns `false`
    /// when another thread holds the lock.
    pub fn lock(&self, name: &str, key: &Data, thread_id: u64) -> bool {
        let collection = self.collections.entry(name.to_string()).or_default();
        let mut lock = collection.locks.entry(key.clone()).or_insert(EntryLock {
            owner_thread: thread_id,
            count: 0,
        });

        if lock.owner_thread != thread_id {
            return false;
        }
        lock.count += 1;
        true
    }

    /// Releases one acquisition held by `thread_id`. The lock disappears
    /// when its count reaches zero. Returns `false` when the caller does
    /// not own the lock.
    pub fn unlock(&self, name: &str, key: &Data, thread_id: u64) -> bool {
        let Some(collection) = self.collections.get(name) else {
            return false;
        };
        let Some(mut lock) = collection.locks.get_mut(key) else {
            return false;
        };

        if lock.owner_thread != thread_id {
            return false;
        }
        lock.count -= 1;
        drop(lock);

        collection.locks.remove_if(key, |_, lock| lock.count == 0);
        true
    }

    /// The thread currently holding the entry lock, if any.
    pub fn lock_owner(&self, name: &str, key: &Data) -> Option<u64> {
        let collection = self.collections.get(name)?;
        let lock = collection.locks.get(key)?;
        Some(lock.owner_thread)
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Total number of stored key/value pairs across all collections.
    pub fn entry_count(&self) -> usize {
        let mut total = 0;
        for collection in self.collections.iter() {
            for partition_map in collection.partitions.iter() {
                for values in partition_map.iter() {
                    total += values.len();
                }
            }
        }
        total
    }

    /// Snapshot of one partition of a collection, for observability and
    /// hand-off tooling.
    pub fn dump_partition(&self, name: &str, partition: u32) -> Vec<(Data, Vec<Data>)> {
        let mut entries = Vec::new();
        if let Some(collection) = self.collections.get(name)
            && let Some(partition_map) = collection.partitions.get(&partition)
        {
            for entry in partition_map.iter() {
                entries.push((entry.key().clone(), entry.value().clone()));
            }
        }
        entries
    }
}
