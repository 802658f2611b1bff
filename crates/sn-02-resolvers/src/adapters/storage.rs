//! In-memory storers and the per-unit storage service.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::ShardId;

use crate::events::StorageError;
use crate::ports::Storer;

/// Key of a nonce unit entry: nonce then shard id, both big-endian.
pub fn nonce_key(nonce: u64, shard_id: ShardId) -> Vec<u8> {
    let mut key = Vec::with_capacity(12);
    key.extend_from_slice(&nonce.to_be_bytes());
    key.extend_from_slice(&shard_id.to_be_bytes());
    key
}

/// Storage units a resolver may fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    Transactions,
    MiniBlocks,
    ShardHeaders,
    MetaHeaders,
    /// `nonce_key(nonce, shard)` to shard header hash.
    ShardHeaderNonces,
    /// `nonce_key(nonce, METACHAIN_SHARD_ID)` to meta header hash.
    MetaHeaderNonces,
}

impl UnitType {
    pub const ALL: [UnitType; 6] = [
        UnitType::Transactions,
        UnitType::MiniBlocks,
        UnitType::ShardHeaders,
        UnitType::MetaHeaders,
        UnitType::ShardHeaderNonces,
        UnitType::MetaHeaderNonces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Transactions => "transactions",
            UnitType::MiniBlocks => "mini_blocks",
            UnitType::ShardHeaders => "shard_headers",
            UnitType::MetaHeaders => "meta_headers",
            UnitType::ShardHeaderNonces => "shard_header_nonces",
            UnitType::MetaHeaderNonces => "meta_header_nonces",
        }
    }
}

#[derive(Default)]
pub struct MemoryStorer {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storer for MemoryStorer {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_vec(), value);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.entries.read().contains_key(key))
    }
}

/// One storer per unit.
#[derive(Default)]
pub struct StorageService {
    units: RwLock<HashMap<UnitType, Arc<dyn Storer>>>,
}

impl StorageService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service with a fresh `MemoryStorer` for every unit.
    pub fn in_memory() -> Self {
        let service = Self::new();
        for unit in UnitType::ALL {
            service.add_storer(unit, Arc::new(MemoryStorer::new()));
        }
        service
    }

    pub fn add_storer(&self, unit: UnitType, storer: Arc<dyn Storer>) {
        self.units.write().insert(unit, storer);
    }

    pub fn storer(&self, unit: UnitType) -> Result<Arc<dyn Storer>, StorageError> {
        self.units
            .read()
            .get(&unit)
            .cloned()
            .ok_or(StorageError::UnknownUnit(unit.as_str()))
    }

    pub fn get(&self, unit: UnitType, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.storer(unit)?.get(key)
    }

    pub fn put(&self, unit: UnitType, key: &[u8], value: Vec<u8>) -> Result<(), StorageError> {
        self.storer(unit)?.put(key, value)
    }
}
