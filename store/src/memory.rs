//! In-memory entry store for tests and simulation.

use crate::entry::{queue_key, EntryStore, QueueStatus, QUEUE_KEY_SIZE};
use crate::StoreError;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use stele_types::{ChainId, EntryHash};

#[derive(Default)]
struct Inner {
    entries: HashMap<EntryHash, Vec<u8>>,
    // BTreeMap keeps queue keys in byte order, mirroring an LSM/B-tree backend.
    queue: BTreeMap<[u8; QUEUE_KEY_SIZE], u8>,
}

/// Entry store backed by process memory. Contents vanish on drop.
#[derive(Default)]
pub struct MemoryEntryStore {
    inner: Mutex<Inner>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_count(&self) -> usize {
        self.lock().map(|g| g.entries.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }
}

impl EntryStore for MemoryEntryStore {
    fn insert_entry(
        &self,
        hash: &EntryHash,
        raw: &[u8],
        chain_id: &ChainId,
        queued_at: u64,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.entries.insert(*hash, raw.to_vec());
        guard.queue.insert(
            queue_key(chain_id, queued_at, hash),
            QueueStatus::InQueue.as_byte(),
        );
        Ok(())
    }

    fn entry(&self, hash: &EntryHash) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock()?.entries.get(hash).cloned())
    }

    fn contains(&self, hash: &EntryHash) -> Result<bool, StoreError> {
        Ok(self.lock()?.entries.contains_key(hash))
    }

    fn set_status(
        &self,
        chain_id: &ChainId,
        queued_at: u64,
        hash: &EntryHash,
        status: QueueStatus,
    ) -> Result<(), StoreError> {
        let key = queue_key(chain_id, queued_at, hash);
        let mut guard = self.lock()?;
        match guard.queue.get_mut(&key) {
            Some(byte) => {
                *byte = status.as_byte();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("queue entry for {hash}"))),
        }
    }

    fn queued(&self, chain_id: &ChainId) -> Result<Vec<(u64, EntryHash, QueueStatus)>, StoreError> {
        let guard = self.lock()?;
        let mut low = [0u8; QUEUE_KEY_SIZE];
        low[..32].copy_from_slice(chain_id.as_bytes());
        let mut high = [0xFFu8; QUEUE_KEY_SIZE];
        high[..32].copy_from_slice(chain_id.as_bytes());

        let mut out = Vec::new();
        for (key, byte) in guard.queue.range(low..=high) {
            let mut ts = [0u8; 8];
            ts.copy_from_slice(&key[32..40]);
            let mut hash = [0u8; 32];
            hash.copy_from_slice(&key[40..]);
            let status = QueueStatus::from_byte(*byte).ok_or_else(|| {
                StoreError::Corruption(format!("unknown queue status byte {byte}"))
            })?;
            out.push((u64::from_be_bytes(ts), EntryHash::new(hash), status));
        }
        Ok(out)
    }
}
