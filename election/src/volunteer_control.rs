//! Per-candidate aggregation of ranked assertions.

use crate::messages::{LeaderLevelMessage, UNSET};
use std::collections::{BTreeMap, HashMap};
use stele_types::Identity;

/// Tracks, for one volunteer, the best assertion seen from each authority
/// and decides when a majority of some rank justifies the next rank.
#[derive(Clone, Debug)]
pub struct VolunteerControl {
    self_id: Identity,
    volunteer: Identity,
    majority: usize,
    votes: HashMap<Identity, LeaderLevelMessage>,
}

impl VolunteerControl {
    pub fn new(self_id: Identity, majority: usize, volunteer: Identity) -> Self {
        Self {
            self_id,
            volunteer,
            majority,
            votes: HashMap::new(),
        }
    }

    pub fn volunteer(&self) -> Identity {
        self.volunteer
    }

    /// Best assertions currently held, one per signer.
    pub fn votes(&self) -> &HashMap<Identity, LeaderLevelMessage> {
        &self.votes
    }

    /// Feed one assertion for this control's volunteer.
    ///
    /// Returns a synthesized next-rank assertion when a majority supports
    /// some rank, plus whether the stored state changed. The synthesized
    /// message leaves `level` and `volunteer_priority` unset; the election
    /// assigns both before anything leaves the node.
    pub fn execute(&mut self, msg: &LeaderLevelMessage) -> (Option<LeaderLevelMessage>, bool) {
        if msg.volunteer.signer != self.volunteer {
            tracing::warn!(
                expected = %self.volunteer,
                got = %msg.volunteer.signer,
                "assertion routed to the wrong volunteer control",
            );
            return (None, false);
        }

        let changed = self.add_message(msg);
        (self.check_vote_count(), changed)
    }

    /// Store `msg` under its signer if it supersedes what is already held:
    /// strictly higher rank, or the same rank with more supporting votes.
    fn add_message(&mut self, msg: &LeaderLevelMessage) -> bool {
        match self.votes.get(&msg.signer) {
            None => {
                self.votes.insert(msg.signer, msg.clone());
                true
            }
            Some(existing)
                if msg.rank > existing.rank
                    || (msg.rank == existing.rank && msg.votes.len() > existing.votes.len()) =>
            {
                self.votes.insert(msg.signer, msg.clone());
                true
            }
            Some(_) => false,
        }
    }

    /// Look for the lowest rank backed by a majority of distinct signers and
    /// synthesize the next-rank assertion from it.
    fn check_vote_count(&self) -> Option<LeaderLevelMessage> {
        let mut by_rank: BTreeMap<i32, Vec<&LeaderLevelMessage>> = BTreeMap::new();
        for held in self.votes.values() {
            by_rank.entry(held.rank).or_default().push(held);
        }

        for (rank, group) in by_rank {
            if group.len() < self.majority {
                continue;
            }
            // Lowest signers first so every node builds the same justification.
            let mut justification: Vec<LeaderLevelMessage> =
                group.into_iter().cloned().collect();
            justification.sort_by(|a, b| a.signer.cmp(&b.signer));
            justification.truncate(self.majority);

            let mut out = LeaderLevelMessage::new(
                self.self_id,
                rank + 1,
                UNSET,
                justification[0].volunteer.clone(),
            );
            out.justification = justification;
            return Some(out);
        }
        None
    }
}
