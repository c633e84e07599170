//! Error taxonomy (spec §7). Every variant rejects its operation without
//! mutating coordinator state; none of these are retried automatically.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeError {
    #[error("output has already passed the finalization window")]
    OutputFinalized,

    #[error("invalid output index")]
    InvalidIndex,

    #[error("a non-terminal challenge already exists for this output index")]
    AlreadyActive,

    #[error("bad segments: {0}")]
    BadSegments(&'static str),

    #[error("caller is not the actor permitted to move next")]
    WrongTurn,

    #[error("proof rejected: {0}")]
    ProofRejected(&'static str),

    #[error("public-input digest has already been verified")]
    Replay,

    #[error("caller is not the security council")]
    NotCouncil,

    #[error("challenge is not in PROVEN status")]
    NotProven,

    #[error("segments-lengths configuration violates the product law")]
    ConfigInvalid,
}
