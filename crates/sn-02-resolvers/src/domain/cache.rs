//! Bounded hash-keyed cache used for every data pool.
//!
//! Oldest-inserted entries are evicted first. Handlers registered with
//! `register_handler` run after every new insertion, outside the lock.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared_types::Hash;

/// Callback fired with the key of each newly inserted entry.
pub type AddedHandler = Arc<dyn Fn(&Hash) + Send + Sync>;

struct Entries<V> {
    values: HashMap<Hash, V>,
    insertion_order: VecDeque<Hash>,
}

pub struct BoundedCache<V> {
    capacity: usize,
    entries: Mutex<Entries<V>>,
    handlers: RwLock<Vec<AddedHandler>>,
}

impl<V: Clone> BoundedCache<V> {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(Entries {
                values: HashMap::with_capacity(capacity),
                insertion_order: VecDeque::with_capacity(capacity),
            }),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Insert unless present. Returns `true` if the key was already there.
    pub fn has_or_add(&self, key: Hash, value: V) -> bool {
        !self.insert(key, value, false)
    }

    /// Insert or overwrite. Returns `true` if the key is new.
    pub fn put(&self, key: Hash, value: V) -> bool {
        self.insert(key, value, true)
    }

    fn insert(&self, key: Hash, value: V, overwrite: bool) -> bool {
        let added = {
            let mut entries = self.entries.lock();
            if let Some(existing) = entries.values.get_mut(&key) {
                if overwrite {
                    *existing = value;
                }
                false
            } else {
                if entries.values.len() >= self.capacity {
                    if let Some(oldest) = entries.insertion_order.pop_front() {
                        entries.values.remove(&oldest);
                    }
                }
                entries.values.insert(key, value);
                entries.insertion_order.push_back(key);
                true
            }
        };

        if added {
            let handlers = self.handlers.read().clone();
            for handler in handlers {
                handler(&key);
            }
        }
        added
    }

    pub fn get(&self, key: &Hash) -> Option<V> {
        self.entries.lock().values.get(key).cloned()
    }

    pub fn has(&self, key: &Hash) -> bool {
        self.entries.lock().values.contains_key(key)
    }

    pub fn remove(&self, key: &Hash) -> Option<V> {
        let mut entries = self.entries.lock();
        let removed = entries.values.remove(key);
        if removed.is_some() {
            entries.insertion_order.retain(|k| k != key);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<Hash> {
        self.entries.lock().insertion_order.iter().copied().collect()
    }

    pub fn register_handler(&self, handler: AddedHandler) {
        self.handlers.write().push(handler);
    }
}
