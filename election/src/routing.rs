//! Re-broadcast wrapper for the transport layer.

use crate::election::Election;
use crate::messages::ElectionMessage;

/// Wraps an [`Election`] so the transport always has something to gossip.
///
/// The bare election only returns a message when it produces a new
/// assertion. On a mesh, progress also depends on re-forwarding: a message
/// that changed our state is worth passing along, and when nothing changed
/// we remind peers of our standing vote.
#[derive(Clone, Debug)]
pub struct RoutingElection {
    election: Election,
}

impl RoutingElection {
    pub fn new(election: Election) -> Self {
        Self { election }
    }

    pub fn election(&self) -> &Election {
        &self.election
    }

    pub fn into_inner(self) -> Election {
        self.election
    }

    /// Drive the inner election and pick what to put back on the wire.
    pub fn execute(&mut self, msg: &ElectionMessage) -> (Option<ElectionMessage>, bool) {
        let (resp, changed) = self.election.execute(msg);

        if resp.is_none() && changed {
            return (Some(msg.clone()), true);
        }

        if resp.is_none() && self.election.current_vote().level > 0 {
            return (
                Some(ElectionMessage::LeaderLevel(
                    self.election.current_vote().clone(),
                )),
                false,
            );
        }

        (resp, changed)
    }
}
