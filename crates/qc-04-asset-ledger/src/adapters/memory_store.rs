use crate::ports::KvStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory ordered store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        self.entries.write().insert(key.to_vec(), value);
    }

    fn delete(&self, key: &[u8]) {
        self.entries.write().remove(key);
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
            .read()
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Write-buffering branch of a parent store.
///
/// Reads see buffered writes first. `write()` flushes them to the parent;
/// dropping the branch discards them.
pub struct CacheStore<P: KvStore> {
    parent: P,
    // None marks a buffered delete
    pending: RwLock<BTreeMap<Vec<u8>, Option<Vec<u8>>>>,
}

impl<P: KvStore> CacheStore<P> {
    pub fn new(parent: P) -> Self {
        Self {
            parent,
            pending: RwLock::new(BTreeMap::new()),
        }
    }

    /// Flush buffered writes to the parent, in key order.
    pub fn write(&self) {
        let pending = std::mem::take(&mut *self.pending.write());
        for (key, value) in pending {
            match value {
                Some(v) => self.parent.set(&key, v),
                None => self.parent.delete(&key),
            }
        }
    }

    /// Drop buffered writes.
    pub fn discard(&self) {
        self.pending.write().clear();
    }

    pub fn pending_len(&self) -> usize {
        self.pending.read().len()
    }
}

impl<P: KvStore> KvStore for CacheStore<P> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.read().get(key) {
            Some(buffered) => buffered.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        self.pending.write().insert(key.to_vec(), Some(value));
    }

    fn delete(&self, key: &[u8]) {
        self.pending.write().insert(key.to_vec(), None);
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.iter_prefix(prefix).into_iter().collect();

        let pending = self.pending.read();
        for (key, value) in pending
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        merged.into_iter().collect()
    }
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        (**self).set(key, value)
    }

    fn delete(&self, key: &[u8]) {
        (**self).delete(key)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        (**self).iter_prefix(prefix)
    }
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: Vec<u8>) {
        (**self).set(key, value)
    }

    fn delete(&self, key: &[u8]) {
        (**self).delete(key)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        (**self).iter_prefix(prefix)
    }
}
