//! # Keyed Registry
//!
//! Thread-safe name to component map used by the interceptor and resolver
//! containers. Components are registered once at wiring time and looked up
//! concurrently afterwards.
//!
//! ## Usage
//!
//! ```rust
//! use shared_types::registry::Registry;
//!
//! let registry: Registry<String, u32> = Registry::new();
//! registry.add("transactions_0".to_string(), 7).unwrap();
//! assert_eq!(registry.get("transactions_0"), Some(7));
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::errors::RegistryError;

/// Central registry of components by key.
pub struct Registry<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a component. Fails if the key is already taken.
    pub fn add(&self, key: K, value: V) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            warn!(key = %key, "[Registry] duplicate registration rejected");
            return Err(RegistryError::Duplicate(key.to_string()));
        }
        debug!(key = %key, "[Registry] registered");
        entries.insert(key, value);
        Ok(())
    }

    /// Register several components; stops at the first duplicate.
    pub fn add_multiple(&self, items: Vec<(K, V)>) -> Result<(), RegistryError> {
        for (key, value) in items {
            self.add(key, value)?;
        }
        Ok(())
    }

    /// Insert or overwrite a component.
    pub fn replace(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().get(key).cloned()
    }

    pub fn remove<Q>(&self, key: &Q) -> Result<V, RegistryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.entries
            .write()
            .remove(key)
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of the registered keys.
    pub fn keys(&self) -> Vec<K> {
        self.entries.read().keys().cloned().collect()
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V> Default for Registry<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
