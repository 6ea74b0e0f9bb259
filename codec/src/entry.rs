//! Content entry — the variable-length ledger record.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use stele_crypto::sha256;
use stele_types::{ChainId, EntryHash};

/// Fixed prefix of every entry: version (1) + chain id (32) + section length (2).
pub const ENTRY_HEADER_SIZE: usize = 35;

/// Entry-credit accounting unit, in bytes.
const KSIZE_UNIT: usize = 1024;

/// A content entry.
///
/// Canonical layout (all integers big-endian):
///
/// ```text
/// 1  byte   version (must be 0)
/// 32 bytes  chain id
/// 2  bytes  external-id section length
///           repeated until the section is consumed:
///             2 bytes body length, then body
/// rest      content payload
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub version: u8,
    pub chain_id: ChainId,
    pub ext_ids: Vec<Vec<u8>>,
    pub content: Vec<u8>,
}

impl Entry {
    pub fn new(chain_id: ChainId, ext_ids: Vec<Vec<u8>>, content: Vec<u8>) -> Self {
        Self {
            version: 0,
            chain_id,
            ext_ids,
            content,
        }
    }

    /// Total bytes the external-id section occupies on the wire.
    pub fn ext_id_section_len(&self) -> usize {
        self.ext_ids.iter().map(|id| 2 + id.len()).sum()
    }

    /// Canonical serialization. The entry hash and all signatures are
    /// computed over exactly these bytes.
    pub fn encode(&self) -> Vec<u8> {
        let section = self.ext_id_section_len();
        debug_assert!(section <= u16::MAX as usize);

        let mut buf = Vec::with_capacity(ENTRY_HEADER_SIZE + section + self.content.len());
        buf.push(self.version);
        buf.extend_from_slice(self.chain_id.as_bytes());
        buf.extend_from_slice(&(section as u16).to_be_bytes());
        for id in &self.ext_ids {
            buf.extend_from_slice(&(id.len() as u16).to_be_bytes());
            buf.extend_from_slice(id);
        }
        buf.extend_from_slice(&self.content);
        buf
    }

    /// Decode an entry, consuming the whole input (the content payload is
    /// everything after the external-id section).
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < ENTRY_HEADER_SIZE {
            return Err(DecodeError::Truncated {
                need: ENTRY_HEADER_SIZE,
                have: data.len(),
            });
        }

        let version = data[0];
        if version != 0 {
            return Err(DecodeError::BadVersion(version));
        }

        let mut chain = [0u8; 32];
        chain.copy_from_slice(&data[1..33]);

        let section = u16::from_be_bytes([data[33], data[34]]) as usize;
        let body = &data[ENTRY_HEADER_SIZE..];
        if section > body.len() {
            return Err(DecodeError::ExtIdSectionOverrun {
                section,
                available: body.len(),
            });
        }

        let mut ext_ids = Vec::new();
        let mut off = 0usize;
        while off < section {
            if section - off < 2 {
                return Err(DecodeError::ExtIdLengthMismatch);
            }
            let len = u16::from_be_bytes([body[off], body[off + 1]]) as usize;
            off += 2;
            if off + len > section {
                return Err(DecodeError::ExtIdLengthMismatch);
            }
            ext_ids.push(body[off..off + len].to_vec());
            off += len;
        }

        Ok(Self {
            version,
            chain_id: ChainId::new(chain),
            ext_ids,
            content: body[section..].to_vec(),
        })
    }

    /// SHA-256 of the canonical serialization. Single SHA, unlike the
    /// double-SHA chain bindings.
    pub fn hash(&self) -> EntryHash {
        EntryHash::new(sha256(&self.encode()))
    }

    /// Entry-credit cost: payload kilobytes past the fixed header and chain
    /// id, rounded up, never less than one.
    pub fn ksize(&self) -> usize {
        let payload = self.ext_id_section_len() + self.content.len();
        payload.div_ceil(KSIZE_UNIT).max(1)
    }
}
