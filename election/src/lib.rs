//! Leader election for a lost processing slot.
//!
//! When the scheduled leader for a slot goes silent, the remaining
//! authorities run this protocol to agree on a single replacement
//! ("volunteer"). Each node drives a deterministic, single-threaded
//! [`Election`] state machine: level-0 votes accumulate into rank-0
//! assertions, majorities of rank-k assertions promote to rank k+1, and
//! three consecutive promotions for the same volunteer commit the node.
//!
//! ## Module overview
//!
//! - [`auth_set`] — the authorized committee and the per-slot volunteer
//!   priority permutation.
//! - [`messages`] — the four message variants and their tie-break ordering.
//! - [`volunteer_control`] — per-candidate aggregation of ranked assertions.
//! - [`election`] — the per-participant driver.
//! - [`routing`] — re-broadcast wrapper for the transport layer.
//! - [`error`] — protocol fault taxonomy.

pub mod auth_set;
pub mod election;
pub mod error;
pub mod messages;
pub mod routing;
pub mod volunteer_control;

pub use auth_set::AuthSet;
pub use election::Election;
pub use error::ProtocolFault;
pub use messages::{
    ElectionMessage, EomMessage, LeaderLevelMessage, VolunteerMessage, VoteMessage,
};
pub use routing::RoutingElection;
pub use volunteer_control::VolunteerControl;
