//! Entry storage trait and queue-key layout.

use crate::StoreError;
use stele_types::{ChainId, EntryHash};

/// Queue key: chain id (32) ∥ timestamp (8, big-endian) ∥ entry hash (32).
pub const QUEUE_KEY_SIZE: usize = 72;

/// The status byte stored under a queue key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueStatus {
    /// Waiting to be placed into a block.
    InQueue,
    /// Already placed; kept for audit until the queue is pruned.
    Processed,
}

impl QueueStatus {
    pub fn as_byte(self) -> u8 {
        match self {
            QueueStatus::InQueue => 1,
            QueueStatus::Processed => 2,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(QueueStatus::InQueue),
            2 => Some(QueueStatus::Processed),
            _ => None,
        }
    }
}

/// Build the `entry_queue` key for an entry queued on a chain.
///
/// Keys sort by chain, then arrival time, then hash, so a prefix scan over a
/// chain id yields its queue in arrival order.
pub fn queue_key(chain_id: &ChainId, queued_at: u64, hash: &EntryHash) -> [u8; QUEUE_KEY_SIZE] {
    let mut key = [0u8; QUEUE_KEY_SIZE];
    key[..32].copy_from_slice(chain_id.as_bytes());
    key[32..40].copy_from_slice(&queued_at.to_be_bytes());
    key[40..].copy_from_slice(hash.as_bytes());
    key
}

/// Trait for entry storage operations.
pub trait EntryStore {
    /// Store an entry's canonical bytes and queue it on its chain, atomically.
    fn insert_entry(
        &self,
        hash: &EntryHash,
        raw: &[u8],
        chain_id: &ChainId,
        queued_at: u64,
    ) -> Result<(), StoreError>;

    /// Retrieve an entry's canonical bytes by hash.
    fn entry(&self, hash: &EntryHash) -> Result<Option<Vec<u8>>, StoreError>;

    /// Whether an entry exists.
    fn contains(&self, hash: &EntryHash) -> Result<bool, StoreError>;

    /// Update the queue status of a previously queued entry.
    fn set_status(
        &self,
        chain_id: &ChainId,
        queued_at: u64,
        hash: &EntryHash,
        status: QueueStatus,
    ) -> Result<(), StoreError>;

    /// The queue for one chain, in arrival order.
    fn queued(&self, chain_id: &ChainId) -> Result<Vec<(u64, EntryHash, QueueStatus)>, StoreError>;
}
