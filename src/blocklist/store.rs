// src/blocklist/store.rs
// Whole-list persistence of blocked addresses in the key-value store

use super::BlockList;
use crate::error::StorageError;
use crate::store::KeyValueStore;

/// Single key holding the full address -> timestamp map.
pub const BLOCKED_IPS_KEY: &str = "blocked_ips";

/// Load/save of the entire block list as one unit. Last write wins.
pub trait BlockStore {
    fn load(&self) -> Result<BlockList, StorageError>;
    fn save(&self, list: &BlockList) -> Result<(), StorageError>;
}

impl<T: BlockStore + ?Sized> BlockStore for &T {
    fn load(&self) -> Result<BlockList, StorageError> {
        (**self).load()
    }
    fn save(&self, list: &BlockList) -> Result<(), StorageError> {
        (**self).save(list)
    }
}

/// `BlockStore` serialising the list as JSON under [`BLOCKED_IPS_KEY`].
#[derive(Debug)]
pub struct KvBlockStore<S> {
    kv: S,
}

impl<S: KeyValueStore> KvBlockStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }
}

impl<S: KeyValueStore> BlockStore for KvBlockStore<S> {
    fn load(&self) -> Result<BlockList, StorageError> {
        let raw = self
            .kv
            .get(BLOCKED_IPS_KEY)
            .map_err(|source| StorageError::Backend {
                op: "get",
                key: BLOCKED_IPS_KEY.to_string(),
                source,
            })?;
        match raw {
            None => Ok(BlockList::new()),
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode {
                    key: BLOCKED_IPS_KEY.to_string(),
                    source,
                })
            }
        }
    }

    fn save(&self, list: &BlockList) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(list).map_err(StorageError::Encode)?;
        self.kv
            .set(BLOCKED_IPS_KEY, &bytes)
            .map_err(|source| StorageError::Backend {
                op: "set",
                key: BLOCKED_IPS_KEY.to_string(),
                source,
            })
    }
}
