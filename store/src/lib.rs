//! Entry persistence for the stele ledger.
//!
//! Storage backends (LMDB, RocksDB, in-memory for testing) implement the
//! [`EntryStore`] trait; the rest of the codebase depends only on the trait.
//! Two namespaces exist:
//!
//! - `entries` — entry hash (32 B) → canonical entry bytes
//! - `entry_queue` — `chain_id ∥ timestamp (8 B BE) ∥ entry_hash` → status byte
//!
//! The election core never touches persistence; the host feeds it decoded
//! messages and stores entries on its own schedule.

pub mod entry;
pub mod error;
pub mod memory;

pub use entry::{queue_key, EntryStore, QueueStatus, QUEUE_KEY_SIZE};
pub use error::StoreError;
pub use memory::MemoryEntryStore;
