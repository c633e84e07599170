//! Turn Validator (spec §4.3): maps the current status to the unique actor
//! permitted to act next, and checks the authenticated caller against it.

use crate::error::ChallengeError;
use crate::status::Status;
use crate::types::{Address, Challenge};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Asserter,
    Challenger,
}

/// `None` means no legal move exists in this status (every mutating
/// operation except `challengerTimeout` rejects such calls as `WrongTurn`).
pub fn expected_actor(status: Status) -> Option<Actor> {
    match status {
        Status::ChallengerTurn | Status::ReadyToProve | Status::AsserterTimeout => {
            Some(Actor::Challenger)
        }
        Status::AsserterTurn | Status::ChallengerTimeout => Some(Actor::Asserter),
        _ => None,
    }
}

/// Compares the authenticated caller against the expected actor's address on
/// the challenge record. Must be the transaction originator; no indirection
/// that could forge identity is permitted (spec §4.3).
pub fn assert_caller(
    expected: Actor,
    caller: Address,
    challenge: &Challenge,
) -> Result<(), ChallengeError> {
    let matches = match expected {
        Actor::Asserter => caller == challenge.asserter,
        Actor::Challenger => caller == challenge.challenger,
    };
    if matches {
        Ok(())
    } else {
        Err(ChallengeError::WrongTurn)
    }
}
