// src/blocklist/manager.rs
// Block/unblock/lookup with lazy expiry pruning

use super::{BlockEntry, BlockList, BlockStore, ExpiryPolicy};
use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use std::sync::{Mutex, MutexGuard};

/// Owns the block list lifecycle over an injected store and clock.
///
/// Expired entries are removed lazily: every lookup prunes the whole list and
/// writes it back when something was dropped. Load-modify-save cycles issued
/// through one manager are serialised; separate managers over the same
/// backend still race with last-write-wins.
pub struct BlockManager<S, C = SystemClock> {
    store: S,
    clock: C,
    policy: ExpiryPolicy,
    write_lock: Mutex<()>,
}

impl<S: BlockStore> BlockManager<S, SystemClock> {
    pub fn new(store: S, policy: ExpiryPolicy) -> Self {
        Self::with_clock(store, SystemClock, policy)
    }
}

impl<S: BlockStore, C: Clock> BlockManager<S, C> {
    pub fn with_clock(store: S, clock: C, policy: ExpiryPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Records `address` as blocked now, resetting any earlier timer.
    pub fn block(&self, address: &str) -> Result<(), StorageError> {
        let _guard = self.lock();
        let mut list = self.store.load()?;
        let now = self.clock.now();
        let reblock = list.contains(address);
        list.insert(address, now);
        self.store.save(&list)?;
        tracing::info!(ip = %address, blocked_at = now, reblock, "address blocked");
        Ok(())
    }

    /// Removes `address`. Returns false, writing nothing, when it was not listed.
    pub fn unblock(&self, address: &str) -> Result<bool, StorageError> {
        let _guard = self.lock();
        let mut list = self.store.load()?;
        if !list.remove(address) {
            tracing::debug!(ip = %address, "unblock of unlisted address ignored");
            return Ok(false);
        }
        self.store.save(&list)?;
        tracing::info!(ip = %address, "address unblocked");
        Ok(true)
    }

    /// Prunes expired entries first. The list is written back only when the
    /// prune removed something; otherwise the read performs no write.
    pub fn is_blocked(&self, address: &str) -> Result<bool, StorageError> {
        let _guard = self.lock();
        let list = self.load_pruned()?;
        Ok(list.contains(address))
    }

    /// Active entries in store order, after pruning. Writes back only when
    /// something expired.
    pub fn list_active(&self) -> Result<Vec<BlockEntry>, StorageError> {
        let _guard = self.lock();
        Ok(self.load_pruned()?.into_entries())
    }

    /// Runs one prune pass on its own and returns how many entries expired.
    pub fn prune(&self) -> Result<usize, StorageError> {
        let _guard = self.lock();
        let mut list = self.store.load()?;
        self.prune_and_persist(&mut list)
    }

    fn load_pruned(&self) -> Result<BlockList, StorageError> {
        let mut list = self.store.load()?;
        self.prune_and_persist(&mut list)?;
        Ok(list)
    }

    fn prune_and_persist(&self, list: &mut BlockList) -> Result<usize, StorageError> {
        let now = self.clock.now();
        let policy = self.policy;
        let pruned = list.retain(|entry| !policy.is_expired(entry, now));
        if pruned > 0 {
            self.store.save(list)?;
            tracing::info!(pruned, remaining = list.len(), "expired blocks pruned");
        }
        Ok(pruned)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
