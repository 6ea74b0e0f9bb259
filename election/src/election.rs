//! Election state machine — one instance per participant per slot.

use crate::auth_set::AuthSet;
use crate::error::ProtocolFault;
use crate::messages::{
    ElectionMessage, EomMessage, LeaderLevelMessage, VoteMessage, VolunteerMessage, UNSET,
};
use crate::volunteer_control::VolunteerControl;
use std::collections::{HashMap, HashSet};
use std::fmt;
use stele_types::{Identity, ProcessListLocation};

/// The per-participant election driver.
///
/// All state mutation happens inside [`Election::execute`], which the host
/// calls sequentially with decoded, signature-verified messages. Every call
/// returns synchronously with at most one outgoing message the host is
/// responsible for broadcasting, plus a state-changed hint.
///
/// The instance is single-threaded by construction: it takes `&mut self`,
/// holds no locks, and shares nothing but the read-only authority set.
#[derive(Clone, Debug)]
pub struct Election {
    self_id: Identity,
    auth: AuthSet,
    location: ProcessListLocation,

    /// Level-0 endorsements: volunteer → (voter → vote).
    volunteer_votes: HashMap<Identity, HashMap<Identity, VoteMessage>>,
    /// Ranked-assertion aggregation, one control per volunteer.
    volunteer_controls: HashMap<Identity, VolunteerControl>,

    /// Next level number this participant will stamp on an emission.
    current_level: i32,
    /// Best assertion this participant has endorsed; starts at the unset
    /// placeholder (rank −1).
    current_vote: LeaderLevelMessage,

    /// Consecutive-promotion counter for the same volunteer.
    commitment_tally: i32,
    /// Terminal flag; nothing moves once set.
    committed: bool,

    total_messages: u64,

    /// Arrival-ordered audit log of received assertions.
    msg_in: Vec<LeaderLevelMessage>,
    /// Emission-ordered audit log of produced assertions.
    msg_out: Vec<LeaderLevelMessage>,
    /// Malformed messages seen, in arrival order.
    faults: Vec<ProtocolFault>,
}

impl Election {
    pub fn new(self_id: Identity, auth: AuthSet, location: ProcessListLocation) -> Self {
        Self {
            self_id,
            auth,
            location,
            volunteer_votes: HashMap::new(),
            volunteer_controls: HashMap::new(),
            current_level: 1,
            current_vote: LeaderLevelMessage::unset(location),
            commitment_tally: 0,
            committed: false,
            total_messages: 0,
            msg_in: Vec::new(),
            msg_out: Vec::new(),
            faults: Vec::new(),
        }
    }

    pub fn self_id(&self) -> Identity {
        self.self_id
    }

    pub fn auth(&self) -> &AuthSet {
        &self.auth
    }

    pub fn location(&self) -> ProcessListLocation {
        self.location
    }

    pub fn current_level(&self) -> i32 {
        self.current_level
    }

    pub fn current_vote(&self) -> &LeaderLevelMessage {
        &self.current_vote
    }

    pub fn committed(&self) -> bool {
        self.committed
    }

    pub fn commitment_tally(&self) -> i32 {
        self.commitment_tally
    }

    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    /// Distinct level-0 endorsements seen for `volunteer`.
    pub fn vote_count(&self, volunteer: Identity) -> usize {
        self.volunteer_votes
            .get(&volunteer)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    pub fn msg_in(&self) -> &[LeaderLevelMessage] {
        &self.msg_in
    }

    pub fn msg_out(&self) -> &[LeaderLevelMessage] {
        &self.msg_out
    }

    pub fn faults(&self) -> &[ProtocolFault] {
        &self.faults
    }

    /// Feed one message into the election.
    ///
    /// The message is deep-cloned on entry; nothing the caller hands in is
    /// aliased by election state afterwards. Returns at most one outgoing
    /// message for broadcast and whether any state changed.
    pub fn execute(&mut self, msg: &ElectionMessage) -> (Option<ElectionMessage>, bool) {
        self.deliver(msg.clone())
    }

    /// Internal entry point shared by [`Election::execute`] and the
    /// self-delivery recursions; takes ownership, so no second copy.
    fn deliver(&mut self, msg: ElectionMessage) -> (Option<ElectionMessage>, bool) {
        if self.committed {
            return (None, false);
        }
        self.total_messages += 1;

        match msg {
            ElectionMessage::Volunteer(vol) => self.execute_volunteer(vol),
            ElectionMessage::Vote(vote) => self.execute_vote(vote),
            ElectionMessage::LeaderLevel(assertion) => self.execute_leader_level(assertion),
            ElectionMessage::Eom(eom) => self.execute_eom(eom),
        }
    }

    /// A candidacy announcement: endorse it ourselves unless we already did.
    fn execute_volunteer(&mut self, vol: VolunteerMessage) -> (Option<ElectionMessage>, bool) {
        if let Some(fault) = self.validate_volunteer(&vol) {
            return self.record_fault(fault);
        }

        let self_id = self.self_id;
        let votes = self.volunteer_votes.entry(vol.signer).or_default();
        if votes.contains_key(&self_id) {
            return (None, false);
        }

        let vote = VoteMessage::new(self_id, vol);
        votes.insert(self_id, vote.clone());

        // Our own endorsement may complete a majority; re-enter with it. A
        // rank-0 assertion coming back already carries the full vote set.
        let (resp, _) = self.deliver(ElectionMessage::Vote(vote.clone()));
        if let Some(out @ ElectionMessage::LeaderLevel(_)) = resp {
            return (Some(out), true);
        }
        (Some(ElectionMessage::Vote(vote)), true)
    }

    /// A level-0 endorsement: store it and check for a rank-0 majority.
    fn execute_vote(&mut self, vote: VoteMessage) -> (Option<ElectionMessage>, bool) {
        if let Some(fault) = self.validate_vote(&vote) {
            return self.record_fault(fault);
        }

        let volunteer = vote.volunteer.signer;
        self.volunteer_votes
            .entry(volunteer)
            .or_default()
            .insert(vote.signer, vote.clone());

        if self.vote_count(volunteer) < self.auth.majority() {
            return (None, false);
        }

        // A majority of endorsements exists. Emit a rank-0 assertion unless
        // our standing vote already outranks anything a rank 0 could say.
        if self.current_vote.rank > 0 {
            return (None, false);
        }
        let priority = self.priority_of(volunteer);
        if self.current_vote.rank == 0 && self.current_vote.volunteer_priority <= priority {
            // Same or better volunteer already endorsed. Equal priority is
            // impossible within one slot, but cheap to handle.
            return (None, false);
        }

        let mut assertion =
            LeaderLevelMessage::new(self.self_id, 0, self.current_level, vote.volunteer);
        assertion.volunteer_priority = priority;
        assertion.votes = self.known_votes_for(volunteer);
        self.current_level += 1;
        self.update_current_vote(&assertion);
        self.emit(&assertion);

        // Our rank 0 may immediately complete a higher-rank majority; if the
        // recursion produced something strictly better, broadcast that.
        let (resp, _) = self.deliver(ElectionMessage::LeaderLevel(assertion.clone()));
        if let Some(ElectionMessage::LeaderLevel(better)) = resp {
            if assertion.less(&better) {
                return (Some(ElectionMessage::LeaderLevel(better)), true);
            }
        }
        (Some(ElectionMessage::LeaderLevel(assertion)), true)
    }

    /// A ranked assertion: replay its endorsements, aggregate it, and adopt
    /// the synthesized next rank when it beats the current vote.
    fn execute_leader_level(
        &mut self,
        assertion: LeaderLevelMessage,
    ) -> (Option<ElectionMessage>, bool) {
        if let Some(fault) = self.validate_leader_level(&assertion) {
            return self.record_fault(fault);
        }

        self.msg_in.push(assertion.clone());

        // The carried endorsements can complete level-0 majorities of their
        // own; any emission they trigger lands in msg_out, and the changed
        // hint lets the routing layer re-forward.
        let mut vote_change = false;
        for vote in assertion.votes.clone() {
            let (_, changed) = self.deliver(ElectionMessage::Vote(vote));
            vote_change = changed || vote_change;
        }

        let majority = self.auth.majority();
        let self_id = self.self_id;
        let control = self
            .volunteer_controls
            .entry(assertion.volunteer.signer)
            .or_insert_with(|| {
                VolunteerControl::new(self_id, majority, assertion.volunteer.signer)
            });
        let (synthesized, change) = control.execute(&assertion);

        let Some(mut next) = synthesized else {
            return (None, change || vote_change);
        };
        next.volunteer_priority = self.priority_of(next.volunteer.signer);

        if !self.current_vote.less(&next) {
            return (None, change || vote_change);
        }

        // Adopt. A rank can outrun the level counter: a rank-r assertion
        // must sit on a level of at least r + 1.
        if next.rank >= self.current_level {
            next.level = next.rank + 1;
            self.current_level = next.rank + 2;
        } else {
            next.level = self.current_level;
            self.current_level += 1;
        }

        self.update_current_vote(&next);
        self.commit_if_last(&mut next);
        self.emit(&next);
        if self.committed {
            return (Some(ElectionMessage::LeaderLevel(next)), true);
        }

        // The adoption may cascade into a yet higher rank.
        let (resp, _) = self.deliver(ElectionMessage::LeaderLevel(next.clone()));
        if let Some(ElectionMessage::LeaderLevel(better)) = resp {
            if next.less(&better) {
                return (Some(ElectionMessage::LeaderLevel(better)), true);
            }
        }
        (Some(ElectionMessage::LeaderLevel(next)), true)
    }

    /// The scheduled leader spoke after all; the election is moot.
    fn execute_eom(&mut self, eom: EomMessage) -> (Option<ElectionMessage>, bool) {
        if eom.location != self.location {
            return self.record_fault(ProtocolFault::WrongLocation);
        }
        self.committed = true;
        (None, true)
    }

    fn validate_volunteer(&self, vol: &VolunteerMessage) -> Option<ProtocolFault> {
        if vol.location != self.location {
            return Some(ProtocolFault::WrongLocation);
        }
        if !self.auth.contains(vol.signer) {
            return Some(ProtocolFault::UnknownVolunteer(vol.signer));
        }
        None
    }

    fn validate_vote(&self, vote: &VoteMessage) -> Option<ProtocolFault> {
        if vote.volunteer.location != self.location {
            return Some(ProtocolFault::WrongLocation);
        }
        if !self.auth.contains(vote.signer) {
            return Some(ProtocolFault::UnknownSigner(vote.signer));
        }
        if !self.auth.contains(vote.volunteer.signer) {
            return Some(ProtocolFault::UnknownVolunteer(vote.volunteer.signer));
        }
        None
    }

    fn validate_leader_level(&self, assertion: &LeaderLevelMessage) -> Option<ProtocolFault> {
        if assertion.level <= 0 {
            return Some(ProtocolFault::BadLevel(assertion.level));
        }
        if assertion.rank < 0 {
            return Some(ProtocolFault::BadRank(assertion.rank));
        }
        if assertion.level < assertion.rank + 1 {
            return Some(ProtocolFault::LevelBelowRank {
                rank: assertion.rank,
                level: assertion.level,
            });
        }
        if assertion.volunteer.location != self.location {
            return Some(ProtocolFault::WrongLocation);
        }
        if !self.auth.contains(assertion.signer) {
            return Some(ProtocolFault::UnknownSigner(assertion.signer));
        }
        if !self.auth.contains(assertion.volunteer.signer) {
            return Some(ProtocolFault::UnknownVolunteer(assertion.volunteer.signer));
        }

        let need = self.auth.majority();
        if assertion.rank == 0 {
            if !assertion.justification.is_empty() {
                return Some(ProtocolFault::UnexpectedJustification);
            }
            let endorsers: HashSet<Identity> = assertion
                .votes
                .iter()
                .filter(|v| {
                    v.volunteer.signer == assertion.volunteer.signer
                        && self.auth.contains(v.signer)
                })
                .map(|v| v.signer)
                .collect();
            if endorsers.len() < need {
                return Some(ProtocolFault::InsufficientVotes {
                    got: endorsers.len(),
                    need,
                });
            }
        } else {
            let supporters: HashSet<Identity> = assertion
                .justification
                .iter()
                .filter(|j| {
                    j.rank == assertion.rank - 1
                        && j.volunteer.signer == assertion.volunteer.signer
                        && self.auth.contains(j.signer)
                })
                .map(|j| j.signer)
                .collect();
            if supporters.len() < need {
                return Some(ProtocolFault::InsufficientJustification {
                    rank: assertion.rank,
                    got: supporters.len(),
                    need,
                });
            }
        }
        None
    }

    /// Swap in a better vote, tracking consecutive promotions of the same
    /// volunteer. Three in a row (tally > 2) end the election.
    fn update_current_vote(&mut self, new: &LeaderLevelMessage) {
        if new.volunteer_priority == self.current_vote.volunteer_priority
            && new.rank == self.current_vote.rank + 1
        {
            self.commitment_tally += 1;
        } else {
            self.commitment_tally = 1;
        }
        self.current_vote = new.clone();
    }

    fn commit_if_last(&mut self, msg: &mut LeaderLevelMessage) {
        if self.commitment_tally > 2 {
            self.committed = true;
            msg.committed = true;
        }
    }

    fn emit(&mut self, msg: &LeaderLevelMessage) {
        self.msg_out.push(msg.clone());
    }

    fn record_fault(&mut self, fault: ProtocolFault) -> (Option<ElectionMessage>, bool) {
        tracing::warn!(
            election = %self.self_id,
            location = %self.location,
            %fault,
            "dropping malformed election message",
        );
        self.faults.push(fault);
        (None, false)
    }

    /// All known endorsements for a volunteer, lowest voter first.
    fn known_votes_for(&self, volunteer: Identity) -> Vec<VoteMessage> {
        let mut votes: Vec<VoteMessage> = self
            .volunteer_votes
            .get(&volunteer)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        votes.sort_by(|a, b| a.signer.cmp(&b.signer));
        votes
    }

    fn priority_of(&self, volunteer: Identity) -> i32 {
        self.auth
            .priority(volunteer, &self.location)
            .unwrap_or(UNSET)
    }
}

impl fmt::Display for Election {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "election {} @ {}: level {} vote [{}] tally {}",
            self.self_id, self.location, self.current_level, self.current_vote,
            self.commitment_tally,
        )?;
        if self.committed {
            write!(f, " committed")?;
        }
        Ok(())
    }
}
