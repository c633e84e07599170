//! Status Evaluator (spec §4.2): a pure function of `(challenge, now)`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::segment;
use crate::types::Challenge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    None,
    ChallengerTurn,
    AsserterTurn,
    ChallengerTimeout,
    AsserterTimeout,
    ReadyToProve,
    Proven,
    Approved,
}

/// Evaluates the rules of spec §4.2 in order, for a challenge still present
/// in the coordinator's map. Rule 1 (`approved == true -> APPROVED`) never
/// reaches this function: `approveChallenge` clears the record entirely
/// (spec §3 lifecycle), so there is no live `Challenge` left to carry an
/// `approved` flag by the time that would matter. The `APPROVED` tombstone
/// case is handled one layer up, in `ChallengeCoordinator::get_status`,
/// against its own `approved_tombstones` set.
pub fn evaluate(challenge: &Challenge, now: u64, config: &Config) -> Status {
    if challenge.turn < 1 {
        return Status::None;
    }
    if challenge.has_proof() {
        return Status::Proven;
    }

    let challenger_is_next = segment::challenger_is_next(challenge.turn);

    if now > challenge.timeout_at {
        if challenger_is_next {
            return Status::ChallengerTimeout;
        }
        return if now > challenge.timeout_at + config.proving_timeout {
            Status::ChallengerTimeout
        } else {
            Status::AsserterTimeout
        };
    }

    let l_t = match config.segments_lengths.get(challenge.turn) {
        Some(l) => l,
        None => return Status::None,
    };
    if !segment::is_able_to_bisect(challenge.seg_size, l_t) {
        return Status::ReadyToProve;
    }

    if challenger_is_next {
        Status::ChallengerTurn
    } else {
        Status::AsserterTurn
    }
}
