//! Entry commit — the fixed 136-byte entry-credit record.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use stele_crypto::{sha256, sign_message, verify_signature};
use stele_types::{Clock, EntryHash, KeyPair, MilliTime, PublicKey, Signature};

/// Exact wire size of an entry commit.
pub const COMMIT_ENTRY_SIZE: usize = 136;

/// Bytes covered by the signature: everything before pubkey ∥ signature.
const SIGNED_REGION_SIZE: usize = COMMIT_ENTRY_SIZE - 96;

/// A commit paying entry credits for one content entry.
///
/// Layout (big-endian):
///
/// ```text
/// offset  0   1 byte   version (must be 0)
/// offset  1   6 bytes  milli-timestamp
/// offset  7   32 bytes entry hash
/// offset 39   1 byte   credits
/// offset 40   32 bytes public key
/// offset 72   64 bytes signature
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub version: u8,
    pub milli_time: MilliTime,
    pub entry_hash: EntryHash,
    pub credits: u8,
    pub pub_key: PublicKey,
    pub sig: Signature,
}

impl CommitEntry {
    /// Build an unsigned commit stamped from the injected clock.
    pub fn new(entry_hash: EntryHash, credits: u8, clock: &dyn Clock) -> Self {
        Self {
            version: 0,
            milli_time: clock.now(),
            entry_hash,
            credits,
            pub_key: PublicKey::ZERO,
            sig: Signature::ZERO,
        }
    }

    /// Canonical 136-byte serialization.
    pub fn encode(&self) -> [u8; COMMIT_ENTRY_SIZE] {
        let mut buf = [0u8; COMMIT_ENTRY_SIZE];
        buf[0] = self.version;
        buf[1..7].copy_from_slice(self.milli_time.as_bytes());
        buf[7..39].copy_from_slice(self.entry_hash.as_bytes());
        buf[39] = self.credits;
        buf[40..72].copy_from_slice(self.pub_key.as_bytes());
        buf[72..136].copy_from_slice(self.sig.as_bytes());
        buf
    }

    /// The prefix the signature covers.
    pub fn signed_region(&self) -> [u8; SIGNED_REGION_SIZE] {
        let mut buf = [0u8; SIGNED_REGION_SIZE];
        buf.copy_from_slice(&self.encode()[..SIGNED_REGION_SIZE]);
        buf
    }

    /// Decode from the first 136 bytes of `data`; trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < COMMIT_ENTRY_SIZE {
            return Err(DecodeError::Truncated {
                need: COMMIT_ENTRY_SIZE,
                have: data.len(),
            });
        }

        let version = data[0];
        if version != 0 {
            return Err(DecodeError::BadVersion(version));
        }

        let mut milli = [0u8; 6];
        milli.copy_from_slice(&data[1..7]);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&data[7..39]);
        let mut key = [0u8; 32];
        key.copy_from_slice(&data[40..72]);
        let mut sig = [0u8; 64];
        sig.copy_from_slice(&data[72..136]);

        Ok(Self {
            version,
            milli_time: MilliTime::new(milli),
            entry_hash: EntryHash::new(hash),
            credits: data[39],
            pub_key: PublicKey(key),
            sig: Signature(sig),
        })
    }

    /// Sign the commit, filling in the public key and signature.
    pub fn sign(&mut self, keypair: &KeyPair) {
        self.pub_key = keypair.public.clone();
        self.sig = sign_message(&self.signed_region(), &keypair.private);
    }

    /// A commit is valid when the signed region verifies canonically and the
    /// version and credit thresholds hold.
    pub fn is_valid(&self) -> bool {
        if self.credits < 1 || self.version != 0 {
            return false;
        }
        verify_signature(&self.signed_region(), &self.sig, &self.pub_key)
    }

    /// SHA-256 of the full 136-byte encoding.
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.encode())
    }

    /// SHA-256 of the signed region.
    pub fn sig_hash(&self) -> [u8; 32] {
        sha256(&self.signed_region())
    }

    /// Timestamp widened from the 6 wire bytes.
    pub fn timestamp_millis(&self) -> i64 {
        self.milli_time.as_millis()
    }
}
