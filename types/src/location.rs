//! Process-list location — scopes one election instance.

use crate::ChainId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The slot an election runs for: `(chain_id, vm_index, height)`.
///
/// Two elections with differing locations are fully independent; the
/// location also seeds the volunteer-priority permutation, so it must be
/// identical on every node before any election message is exchanged.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessListLocation {
    pub chain_id: ChainId,
    pub vm_index: u32,
    pub height: u32,
}

impl ProcessListLocation {
    pub fn new(chain_id: ChainId, vm_index: u32, height: u32) -> Self {
        Self {
            chain_id,
            vm_index,
            height,
        }
    }

    /// Canonical big-endian byte form, used as the priority-permutation seed.
    pub fn to_bytes(&self) -> [u8; 40] {
        let mut out = [0u8; 40];
        out[..32].copy_from_slice(self.chain_id.as_bytes());
        out[32..36].copy_from_slice(&self.vm_index.to_be_bytes());
        out[36..40].copy_from_slice(&self.height.to_be_bytes());
        out
    }
}

impl fmt::Debug for ProcessListLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location(vm {} @ {} on {})",
            self.vm_index, self.height, self.chain_id
        )
    }
}

impl fmt::Display for ProcessListLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.chain_id, self.vm_index, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_form_is_injective_over_fields() {
        let chain = ChainId::new([3u8; 32]);
        let a = ProcessListLocation::new(chain, 1, 2);
        let b = ProcessListLocation::new(chain, 2, 1);
        assert_ne!(a.to_bytes(), b.to_bytes());
        assert_eq!(a.to_bytes(), ProcessListLocation::new(chain, 1, 2).to_bytes());
    }
}
