// src/blocklist/mod.rs
// Blocked-address list: data model, persistence, expiry and lifecycle

mod expiry;
mod manager;
mod store;


pub use expiry::{is_expired, ExpiryPolicy, DEFAULT_BLOCK_DURATION_SECS};
pub use manager::BlockManager;
pub use store::{BlockStore, KvBlockStore, BLOCKED_IPS_KEY};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One blocked client address and the Unix second it was blocked at.
///
/// The address is an opaque key: it is never parsed or canonicalised, so
/// `"::1"` and `"0:0:0:0:0:0:0:1"` are two different entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub address: String,
    pub blocked_at: u64,
}

/// Insertion-ordered mapping from address to block timestamp.
///
/// Persisted as a JSON object (`{"203.0.113.5": 1700000000}`); entry order in
/// the object is the order kept here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    entries: Vec<BlockEntry>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, address: &str) -> Option<&BlockEntry> {
        self.entries.iter().find(|e| e.address == address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.get(address).is_some()
    }

    /// Sets `address -> blocked_at`. An existing entry keeps its position and
    /// gets the new timestamp.
    pub fn insert(&mut self, address: impl Into<String>, blocked_at: u64) {
        let address = address.into();
        match self.entries.iter_mut().find(|e| e.address == address) {
            Some(existing) => existing.blocked_at = blocked_at,
            None => self.entries.push(BlockEntry {
                address,
                blocked_at,
            }),
        }
    }

    /// Returns true if an entry was removed.
    pub fn remove(&mut self, address: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.address != address);
        self.entries.len() != before
    }

    /// Keeps only entries matching `keep`; returns how many were dropped.
    pub fn retain(&mut self, keep: impl FnMut(&BlockEntry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(keep);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<BlockEntry> {
        self.entries
    }
}

impl FromIterator<(String, u64)> for BlockList {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut list = BlockList::new();
        for (address, blocked_at) in iter {
            list.insert(address, blocked_at);
        }
        list
    }
}

impl Serialize for BlockList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.address, &entry.blocked_at)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BlockList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BlockListVisitor;

        impl<'de> Visitor<'de> for BlockListVisitor {
            type Value = BlockList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of address to unix timestamp")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<BlockList, A::Error> {
                let mut list = BlockList::new();
                while let Some((address, blocked_at)) = access.next_entry::<String, u64>()? {
                    list.insert(address, blocked_at);
                }
                Ok(list)
            }
        }

        deserializer.deserialize_map(BlockListVisitor)
    }
}
