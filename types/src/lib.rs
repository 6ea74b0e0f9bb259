//! Fundamental types for the stele ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: participant identities, chain/entry hashes, Ed25519 key
//! material, process-list locations, and the 6-byte milli-timestamp used by
//! the commit records.

pub mod hash;
pub mod identity;
pub mod keys;
pub mod location;
pub mod time;

pub use hash::{ChainId, EntryHash};
pub use identity::Identity;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use location::ProcessListLocation;
pub use time::{Clock, MilliTime, SystemClock};
