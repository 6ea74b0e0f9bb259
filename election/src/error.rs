use stele_types::Identity;
use thiserror::Error;

/// A malformed election message.
///
/// Faulty messages are logged, recorded on the election instance, and
/// dropped; they never advance state and never abort the process.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolFault {
    #[error("leader-level message with non-positive level {0}")]
    BadLevel(i32),

    #[error("leader-level message with negative rank {0}")]
    BadRank(i32),

    #[error("level {level} below rank {rank} + 1")]
    LevelBelowRank { rank: i32, level: i32 },

    #[error("message signed by non-member {0}")]
    UnknownSigner(Identity),

    #[error("volunteer {0} is not an authority for this slot")]
    UnknownVolunteer(Identity),

    #[error("message scoped to a different location")]
    WrongLocation,

    #[error("rank-0 assertion carries {got} distinct endorsements, needs {need}")]
    InsufficientVotes { got: usize, need: usize },

    #[error("rank-{rank} assertion carries {got} supporting assertions, needs {need}")]
    InsufficientJustification { rank: i32, got: usize, need: usize },

    #[error("rank-0 assertion carries a justification chain")]
    UnexpectedJustification,
}
