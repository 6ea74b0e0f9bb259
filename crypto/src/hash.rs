//! SHA-256 hashing for ledger records.
//!
//! Entry hashes use a single SHA-256 of the canonical serialization; chain
//! binding values (chain-id hash, weld) use double SHA-256.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the double SHA-256 hash: `sha256(sha256(data))`.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Double SHA-256 over multiple byte slices in sequence.
pub fn sha256d_multi(parts: &[&[u8]]) -> [u8; 32] {
    sha256(&sha256_multi(parts))
}
