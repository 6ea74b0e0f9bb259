//! The ordered authority set and volunteer-priority derivation.

use serde::{Deserialize, Serialize};
use stele_crypto::sha256_multi;
use stele_types::{Identity, ProcessListLocation};

/// The committee authorized to vote in an election.
///
/// The member list is ordered and duplicate-free. All nodes must construct
/// the set from the same list: majority arithmetic and the volunteer
/// priority permutation both derive from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSet {
    members: Vec<Identity>,
}

impl AuthSet {
    /// Build an authority set from an ordered member list.
    ///
    /// Later duplicates are dropped. Returns `None` for an empty list.
    pub fn new(members: Vec<Identity>) -> Option<Self> {
        let mut seen = Vec::with_capacity(members.len());
        for id in members {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        if seen.is_empty() {
            return None;
        }
        Some(Self { members: seen })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        // The constructor rejects empty sets; kept for completeness.
        self.members.is_empty()
    }

    /// Smallest strict majority: `floor(N / 2) + 1`.
    pub fn majority(&self) -> usize {
        self.members.len() / 2 + 1
    }

    pub fn contains(&self, id: Identity) -> bool {
        self.members.contains(&id)
    }

    pub fn members(&self) -> &[Identity] {
        &self.members
    }

    /// The volunteer rank of `id` for the slot at `location`; lower wins.
    ///
    /// Every node derives the same permutation of the member list from the
    /// location, so priorities are identical everywhere without any message
    /// exchange. Returns `None` for non-members.
    pub fn priority(&self, id: Identity, location: &ProcessListLocation) -> Option<i32> {
        if !self.contains(id) {
            return None;
        }
        self.priority_order(location)
            .iter()
            .position(|m| *m == id)
            .map(|p| p as i32)
    }

    /// Members sorted best-priority first for the slot at `location`.
    pub fn priority_order(&self, location: &ProcessListLocation) -> Vec<Identity> {
        let seed = location.to_bytes();
        let mut keyed: Vec<([u8; 32], Identity)> = self
            .members
            .iter()
            .map(|id| (sha256_multi(&[&seed, id.as_bytes()]), *id))
            .collect();
        // Identity tie-break keeps the order total even on a digest collision.
        keyed.sort();
        keyed.into_iter().map(|(_, id)| id).collect()
    }
}
