//! Chain commit — the fixed 200-byte entry-credit record creating a chain.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use stele_crypto::{sha256, sha256d, sha256d_multi, sign_message, verify_signature};
use stele_types::{ChainId, Clock, EntryHash, KeyPair, MilliTime, PublicKey, Signature};

/// Exact wire size of a chain commit.
pub const COMMIT_CHAIN_SIZE: usize = 200;

/// Creating a chain costs at least ten entry credits.
pub const MIN_CHAIN_CREDITS: u8 = 10;

/// Bytes covered by the signature: everything before pubkey ∥ signature.
const SIGNED_REGION_SIZE: usize = COMMIT_CHAIN_SIZE - 96;

/// A commit paying entry credits for a new chain and its first entry.
///
/// Layout (big-endian):
///
/// ```text
/// offset   0   1 byte   version (must be 0)
/// offset   1   6 bytes  milli-timestamp
/// offset   7   32 bytes sha256d(chain id)
/// offset  39   32 bytes weld = sha256d(entry hash ∥ chain id)
/// offset  71   32 bytes entry hash
/// offset 103   1 byte   credits (≥ 10)
/// offset 104   32 bytes public key
/// offset 136   64 bytes signature
/// ```
///
/// The chain id itself never appears; the double hash hides it until the
/// first entry reveals it, and the weld binds that entry to the commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitChain {
    pub version: u8,
    pub milli_time: MilliTime,
    pub chain_id_hash: [u8; 32],
    pub weld: [u8; 32],
    pub entry_hash: EntryHash,
    pub credits: u8,
    pub pub_key: PublicKey,
    pub sig: Signature,
}

impl CommitChain {
    /// Build an unsigned commit for `chain_id` and its first entry, stamped
    /// from the injected clock. The chain-id hash and weld are derived here.
    pub fn new(chain_id: &ChainId, entry_hash: EntryHash, credits: u8, clock: &dyn Clock) -> Self {
        Self {
            version: 0,
            milli_time: clock.now(),
            chain_id_hash: sha256d(chain_id.as_bytes()),
            weld: Self::compute_weld(&entry_hash, chain_id),
            entry_hash,
            credits,
            pub_key: PublicKey::ZERO,
            sig: Signature::ZERO,
        }
    }

    /// `sha256d(entry_hash ∥ chain_id)` — binds the first entry to the chain.
    pub fn compute_weld(entry_hash: &EntryHash, chain_id: &ChainId) -> [u8; 32] {
        sha256d_multi(&[entry_hash.as_bytes(), chain_id.as_bytes()])
    }

    /// Canonical 200-byte serialization.
    pub fn encode(&self) -> [u8; COMMIT_CHAIN_SIZE] {
        let mut buf = [0u8; COMMIT_CHAIN_SIZE];
        buf[0] = self.version;
        buf[1..7].copy_from_slice(self.milli_time.as_bytes());
        buf[7..39].copy_from_slice(&self.chain_id_hash);
        buf[39..71].copy_from_slice(&self.weld);
        buf[71..103].copy_from_slice(self.entry_hash.as_bytes());
        buf[103] = self.credits;
        buf[104..136].copy_from_slice(self.pub_key.as_bytes());
        buf[136..200].copy_from_slice(self.sig.as_bytes());
        buf
    }

    /// The prefix the signature covers.
    pub fn signed_region(&self) -> [u8; SIGNED_REGION_SIZE] {
        let mut buf = [0u8; SIGNED_REGION_SIZE];
        buf.copy_from_slice(&self.encode()[..SIGNED_REGION_SIZE]);
        buf
    }

    /// Decode from the first 200 bytes of `data`; trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < COMMIT_CHAIN_SIZE {
            return Err(DecodeError::Truncated {
                need: COMMIT_CHAIN_SIZE,
                have: data.len(),
            });
        }

        let version = data[0];
        if version != 0 {
            return Err(DecodeError::BadVersion(version));
        }

        let credits = data[103];
        if credits < MIN_CHAIN_CREDITS {
            return Err(DecodeError::CreditsOutOfRange(credits));
        }

        let mut milli = [0u8; 6];
        milli.copy_from_slice(&data[1..7]);
        let mut chain_id_hash = [0u8; 32];
        chain_id_hash.copy_from_slice(&data[7..39]);
        let mut weld = [0u8; 32];
        weld.copy_from_slice(&data[39..71]);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&data[71..103]);
        let mut key = [0u8; 32];
        key.copy_from_slice(&data[104..136]);
        let mut sig = [0u8; 64];
        sig.copy_from_slice(&data[136..200]);

        Ok(Self {
            version,
            milli_time: MilliTime::new(milli),
            chain_id_hash,
            weld,
            entry_hash: EntryHash::new(hash),
            credits,
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
        if self.credits < MIN_CHAIN_CREDITS || self.version != 0 {
            return false;
        }
        verify_signature(&self.signed_region(), &self.sig, &self.pub_key)
    }

    /// SHA-256 of the full 200-byte encoding.
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
