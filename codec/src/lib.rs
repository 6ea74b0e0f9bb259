//! Canonical wire codecs for the ledger's fundamental records.
//!
//! Three record types cross the wire: variable-length content [`Entry`]s and
//! the two fixed-layout entry-credit commits ([`CommitEntry`], 136 bytes, and
//! [`CommitChain`], 200 bytes). All multi-byte integers are big-endian, and
//! every node must produce bit-identical encodings — record hashes and commit
//! signatures are computed over these bytes.
//!
//! Decoders return typed [`DecodeError`]s and never panic on truncated or
//! malformed input.

pub mod commit_chain;
pub mod commit_entry;
pub mod entry;
pub mod error;

pub use commit_chain::{CommitChain, COMMIT_CHAIN_SIZE, MIN_CHAIN_CREDITS};
pub use commit_entry::{CommitEntry, COMMIT_ENTRY_SIZE};
pub use entry::{Entry, ENTRY_HEADER_SIZE};
pub use error::DecodeError;
