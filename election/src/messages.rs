//! Election message algebra.
//!
//! All four variants are value types: `Clone` produces a deep copy (votes
//! and justification chains own their storage), equality is structural, and
//! [`LeaderLevelMessage::less`] is the strict tie-break order the driver
//! uses to decide whether an assertion beats its current vote.

use serde::{Deserialize, Serialize};
use std::fmt;
use stele_types::{Identity, ProcessListLocation};

/// Sentinel for fields the election has not assigned yet.
pub(crate) const UNSET: i32 = -1;

/// Candidacy announcement for the slot under election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerMessage {
    pub signer: Identity,
    pub location: ProcessListLocation,
}

impl VolunteerMessage {
    pub fn new(signer: Identity, location: ProcessListLocation) -> Self {
        Self { signer, location }
    }
}

/// Level-0 endorsement of one volunteer by one authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMessage {
    pub signer: Identity,
    pub volunteer: VolunteerMessage,
}

impl VoteMessage {
    pub fn new(signer: Identity, volunteer: VolunteerMessage) -> Self {
        Self { signer, volunteer }
    }
}

/// Rank-r assertion that `volunteer` should win, with the evidence that
/// justified it.
///
/// Rank 0 rests on a majority of [`VoteMessage`]s; rank k+1 rests on a
/// majority of rank-k assertions for the same volunteer. `level` is the
/// emitting node's own monotonic counter and only breaks ties.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderLevelMessage {
    pub signer: Identity,
    pub rank: i32,
    pub level: i32,
    pub volunteer: VolunteerMessage,
    pub volunteer_priority: i32,
    pub votes: Vec<VoteMessage>,
    pub justification: Vec<LeaderLevelMessage>,
    pub committed: bool,
}

impl LeaderLevelMessage {
    pub fn new(signer: Identity, rank: i32, level: i32, volunteer: VolunteerMessage) -> Self {
        Self {
            signer,
            rank,
            level,
            volunteer,
            volunteer_priority: UNSET,
            votes: Vec::new(),
            justification: Vec::new(),
            committed: false,
        }
    }

    /// The "no vote yet" placeholder an election starts with.
    pub(crate) fn unset(location: ProcessListLocation) -> Self {
        let mut msg = Self::new(
            Identity::ZERO,
            UNSET,
            0,
            VolunteerMessage::new(Identity::ZERO, location),
        );
        msg.volunteer_priority = UNSET;
        msg
    }

    /// Strict total order for vote replacement: higher rank dominates, then
    /// the better (numerically smaller) volunteer priority, then the later
    /// level. Equal keys are not less-than in either direction.
    pub fn less(&self, other: &Self) -> bool {
        (self.rank, -self.volunteer_priority, self.level)
            < (other.rank, -other.volunteer_priority, other.level)
    }
}

/// End-of-slot marker injected by the host when the scheduled leader turns
/// out to be alive after all. Never produced by the election core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EomMessage {
    pub signer: Identity,
    pub location: ProcessListLocation,
}

impl EomMessage {
    pub fn new(signer: Identity, location: ProcessListLocation) -> Self {
        Self { signer, location }
    }
}

/// Every message an election can receive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionMessage {
    Volunteer(VolunteerMessage),
    Vote(VoteMessage),
    LeaderLevel(LeaderLevelMessage),
    Eom(EomMessage),
}

impl ElectionMessage {
    /// The authority this message is attributed to.
    pub fn signer(&self) -> Identity {
        match self {
            ElectionMessage::Volunteer(m) => m.signer,
            ElectionMessage::Vote(m) => m.signer,
            ElectionMessage::LeaderLevel(m) => m.signer,
            ElectionMessage::Eom(m) => m.signer,
        }
    }
}

impl fmt::Display for VolunteerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "volunteer {}", self.signer)
    }
}

impl fmt::Display for VoteMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vote {} -> {}", self.signer, self.volunteer.signer)
    }
}

impl fmt::Display for LeaderLevelMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{} vol={} pri={} votes={} just={}",
            self.signer,
            self.rank,
            self.level,
            self.volunteer.signer,
            self.volunteer_priority,
            self.votes.len(),
            self.justification.len(),
        )?;
        if self.committed {
            write!(f, " committed")?;
        }
        Ok(())
    }
}

impl fmt::Display for EomMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eom {}", self.signer)
    }
}

impl fmt::Display for ElectionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElectionMessage::Volunteer(m) => fmt::Display::fmt(m, f),
            ElectionMessage::Vote(m) => fmt::Display::fmt(m, f),
            ElectionMessage::LeaderLevel(m) => fmt::Display::fmt(m, f),
            ElectionMessage::Eom(m) => fmt::Display::fmt(m, f),
        }
    }
}
