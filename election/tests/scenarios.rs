//! End-to-end walkthroughs of one participant's election, exercising the
//! promotion ladder from candidacy to commitment.

use stele_election::{
    AuthSet, Election, ElectionMessage, LeaderLevelMessage, ProtocolFault, VolunteerMessage,
    VoteMessage,
};
use stele_types::{ChainId, Identity, ProcessListLocation};

const P0: u8 = 10;
const P1: u8 = 20;
const P2: u8 = 30;
const P3: u8 = 40;

fn ident(byte: u8) -> Identity {
    Identity::new([byte; 32])
}

fn location() -> ProcessListLocation {
    ProcessListLocation::new(ChainId::new([0xCC; 32]), 0, 1000)
}

fn committee() -> AuthSet {
    AuthSet::new(vec![ident(P0), ident(P1), ident(P2), ident(P3)]).unwrap()
}

fn volunteer(byte: u8) -> VolunteerMessage {
    VolunteerMessage::new(ident(byte), location())
}

fn vote(signer: u8, vol: u8) -> ElectionMessage {
    ElectionMessage::Vote(VoteMessage::new(ident(signer), volunteer(vol)))
}

/// A peer's rank-0 assertion for `vol`, endorsed by three authorities.
fn peer_rank0(signer: u8, vol: u8, voters: [u8; 3]) -> LeaderLevelMessage {
    let mut m = LeaderLevelMessage::new(ident(signer), 0, 1, volunteer(vol));
    m.votes = voters
        .iter()
        .map(|v| VoteMessage::new(ident(*v), volunteer(vol)))
        .collect();
    m
}

/// A peer's rank-1 assertion justified by three rank-0 assertions.
fn peer_rank1(signer: u8, vol: u8, supporters: [u8; 3]) -> LeaderLevelMessage {
    let mut m = LeaderLevelMessage::new(ident(signer), 1, 2, volunteer(vol));
    m.justification = supporters
        .iter()
        .map(|s| peer_rank0(*s, vol, [P1, P2, P3]))
        .collect();
    m
}

fn expect_leader_level(resp: Option<ElectionMessage>) -> LeaderLevelMessage {
    match resp {
        Some(ElectionMessage::LeaderLevel(m)) => m,
        other => panic!("expected a leader-level emission, got {other:?}"),
    }
}

/// Runs the base-promotion preamble: candidacy plus two peer endorsements,
/// leaving the election holding a rank-0 vote for P3.
fn promoted_to_rank0() -> Election {
    stele_utils::init_tracing();
    let mut e = Election::new(ident(P0), committee(), location());

    let (resp, changed) = e.execute(&ElectionMessage::Volunteer(volunteer(P3)));
    assert!(changed);
    match resp {
        Some(ElectionMessage::Vote(v)) => {
            assert_eq!(v.signer, ident(P0));
            assert_eq!(v.volunteer.signer, ident(P3));
        }
        other => panic!("expected own endorsement, got {other:?}"),
    }

    let (resp, changed) = e.execute(&vote(P1, P3));
    assert!(resp.is_none());
    assert!(!changed);

    let (resp, changed) = e.execute(&vote(P2, P3));
    assert!(changed);
    let emitted = expect_leader_level(resp);
    assert_eq!(emitted.signer, ident(P0));
    assert_eq!(emitted.rank, 0);
    assert_eq!(emitted.level, 1);
    assert_eq!(emitted.volunteer.signer, ident(P3));
    let endorsers: Vec<Identity> = emitted.votes.iter().map(|v| v.signer).collect();
    assert_eq!(endorsers, vec![ident(P0), ident(P1), ident(P2)]);

    e
}

/// Continues past base promotion: peer rank-0s push the election to rank 1.
fn promoted_to_rank1() -> Election {
    let mut e = promoted_to_rank0();

    let mut emissions = Vec::new();
    for peer in [P1, P2, P3] {
        let (resp, _) =
            e.execute(&ElectionMessage::LeaderLevel(peer_rank0(peer, P3, [P1, P2, P3])));
        if let Some(msg) = resp {
            emissions.push(expect_leader_level(Some(msg)));
        }
    }

    assert_eq!(emissions.len(), 1, "exactly one rank promotion expected");
    let promoted = &emissions[0];
    assert_eq!(promoted.rank, 1);
    assert_eq!(promoted.level, 2);
    assert_eq!(promoted.volunteer.signer, ident(P3));
    assert_eq!(promoted.justification.len(), 3);
    assert!(promoted.justification.iter().all(|j| j.rank == 0));
    assert!(!promoted.committed);
    assert_eq!(e.commitment_tally(), 2);

    e
}

#[test]
fn base_promotion() {
    let e = promoted_to_rank0();
    assert_eq!(e.current_level(), 2);
    assert_eq!(e.current_vote().rank, 0);
    assert_eq!(e.commitment_tally(), 1);
    assert_eq!(e.msg_out().len(), 1);
}

#[test]
fn rank_promotion() {
    let e = promoted_to_rank1();
    assert_eq!(e.current_vote().rank, 1);
    assert_eq!(e.current_level(), 3);
}

#[test]
fn commitment_after_three_consecutive_promotions() {
    let mut e = promoted_to_rank1();

    let mut emissions = Vec::new();
    for peer in [P1, P2, P3] {
        let (resp, _) =
            e.execute(&ElectionMessage::LeaderLevel(peer_rank1(peer, P3, [P1, P2, P3])));
        if let Some(msg) = resp {
            emissions.push(expect_leader_level(Some(msg)));
        }
    }

    assert_eq!(emissions.len(), 1);
    let terminal = &emissions[0];
    assert_eq!(terminal.rank, 2);
    assert_eq!(terminal.level, 3);
    assert!(terminal.committed);
    assert!(e.committed());
    assert!(e.commitment_tally() > 2);

    // Terminal: everything afterwards is ignored.
    let (resp, changed) = e.execute(&vote(P1, P3));
    assert!(resp.is_none());
    assert!(!changed);
}

#[test]
fn higher_priority_volunteer_displaces_rank0_vote() {
    stele_utils::init_tracing();
    let auth = committee();
    let order = auth.priority_order(&location());
    let best = order[0];
    let worst = *order.last().unwrap();
    assert_ne!(best, worst);

    let mut e = Election::new(ident(P0), auth.clone(), location());

    // Reach a rank-0 vote for the worst-priority candidate first.
    e.execute(&ElectionMessage::Volunteer(VolunteerMessage::new(
        worst,
        location(),
    )));
    let mut endorsed = 1;
    for peer in [P1, P2, P3] {
        let (resp, _) = e.execute(&ElectionMessage::Vote(VoteMessage::new(
            ident(peer),
            VolunteerMessage::new(worst, location()),
        )));
        endorsed += 1;
        if endorsed >= auth.majority() {
            let emitted = expect_leader_level(resp);
            assert_eq!(emitted.rank, 0);
            assert_eq!(emitted.volunteer.signer, worst);
            break;
        }
    }
    assert_eq!(e.current_vote().volunteer.signer, worst);
    let level_before = e.current_level();

    // Now the better-priority candidate volunteers and gains a majority.
    e.execute(&ElectionMessage::Volunteer(VolunteerMessage::new(
        best,
        location(),
    )));
    let mut switched = None;
    for peer in [P1, P2, P3] {
        let (resp, _) = e.execute(&ElectionMessage::Vote(VoteMessage::new(
            ident(peer),
            VolunteerMessage::new(best, location()),
        )));
        if let Some(msg) = resp {
            switched = Some(expect_leader_level(Some(msg)));
            break;
        }
    }

    let switched = switched.expect("majority for the better candidate must re-emit");
    assert_eq!(switched.rank, 0);
    assert_eq!(switched.volunteer.signer, best);
    assert_eq!(e.commitment_tally(), 1, "switching volunteers resets the tally");
    assert!(e.current_level() > level_before);
}

#[test]
fn duplicate_vote_is_idempotent() {
    let mut e = promoted_to_rank0();
    assert_eq!(e.vote_count(ident(P3)), 3);

    let (resp, changed) = e.execute(&vote(P1, P3));
    assert!(resp.is_none());
    assert!(!changed);
    assert_eq!(e.vote_count(ident(P3)), 3);
}

#[test]
fn non_positive_level_is_rejected_without_state_change() {
    stele_utils::init_tracing();
    let mut e = Election::new(ident(P0), committee(), location());

    let mut bad = peer_rank0(P1, P3, [P1, P2, P3]);
    bad.level = 0;
    let (resp, changed) = e.execute(&ElectionMessage::LeaderLevel(bad));

    assert!(resp.is_none());
    assert!(!changed);
    assert_eq!(e.faults(), &[ProtocolFault::BadLevel(0)]);
    assert!(e.msg_in().is_empty());
    assert!(e.msg_out().is_empty());
    assert_eq!(e.current_level(), 1);
    assert_eq!(e.current_vote().rank, -1);
    assert_eq!(e.vote_count(ident(P3)), 0);
}

#[test]
fn thin_justification_is_rejected() {
    stele_utils::init_tracing();
    let mut e = Election::new(ident(P0), committee(), location());

    // Claims rank 2 but justifies with rank-0 assertions.
    let mut bad = LeaderLevelMessage::new(ident(P1), 2, 3, volunteer(P3));
    bad.justification = vec![
        peer_rank0(P1, P3, [P1, P2, P3]),
        peer_rank0(P2, P3, [P1, P2, P3]),
        peer_rank0(P3, P3, [P1, P2, P3]),
    ];
    let (resp, changed) = e.execute(&ElectionMessage::LeaderLevel(bad));

    assert!(resp.is_none());
    assert!(!changed);
    assert_eq!(
        e.faults(),
        &[ProtocolFault::InsufficientJustification {
            rank: 2,
            got: 0,
            need: 3
        }]
    );
}
