//! Challenge Coordinator (spec §4.5): the top-level operations, orchestrating
//! segment arithmetic, the status evaluator, the turn validator, and the
//! proof pipeline against the injected external collaborators.
//!
//! Every mutating operation runs to completion or not at all — no operation
//! observes another's partial effects (spec §5). A host running on a
//! multithreaded executor should reach for `sync::Striped` rather than share
//! one `ChallengeCoordinator` across threads directly.

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};

use crate::collaborators::{
    BondPool, Clock, MerkleTrieVerifier, OutputOracle, SecurityCouncil, ValidationPayload,
    ZkVerifier,
};
use crate::config::Config;
use crate::error::ChallengeError;
use crate::events::Event;
use crate::proof::{self, ProofPair, PublicInputProof, ZkProof};
use crate::segment;
use crate::status::{self, Status};
use crate::turn;
use crate::types::{Address, Challenge, Digest, ZERO_DIGEST};

pub struct ChallengeCoordinator<O, B, C, Z, M, K>
where
    O: OutputOracle,
    B: BondPool,
    C: SecurityCouncil,
    Z: ZkVerifier,
    M: MerkleTrieVerifier,
    K: Clock,
{
    config: Config,
    challenges: BTreeMap<u64, Challenge>,
    /// Indices permanently closed by `approveChallenge` — a minimal tombstone
    /// kept after the full `Challenge` record is deleted (spec §3 lifecycle).
    approved_tombstones: BTreeSet<u64>,
    verified_public_inputs: BTreeSet<Digest>,
    events: Vec<Event>,
    oracle: O,
    bond_pool: B,
    council: C,
    zk_verifier: Z,
    trie_verifier: M,
    clock: K,
}

impl<O, B, C, Z, M, K> ChallengeCoordinator<O, B, C, Z, M, K>
where
    O: OutputOracle,
    B: BondPool,
    C: SecurityCouncil,
    Z: ZkVerifier,
    M: MerkleTrieVerifier,
    K: Clock,
{
    pub fn new(
        config: Config,
        oracle: O,
        bond_pool: B,
        council: C,
        zk_verifier: Z,
        trie_verifier: M,
        clock: K,
    ) -> Self {
        Self {
            config,
            challenges: BTreeMap::new(),
            approved_tombstones: BTreeSet::new(),
            verified_public_inputs: BTreeSet::new(),
            events: Vec::new(),
            oracle,
            bond_pool,
            council,
            zk_verifier,
            trie_verifier,
            clock,
        }
    }

    fn emit(&mut self, event: Event) {
        info!("colosseum: {event:?}");
        self.events.push(event);
    }

    fn reject(&self, output_index: u64, err: ChallengeError) -> ChallengeError {
        warn!("colosseum: rejected operation on output {output_index}: {err}");
        err
    }

    // ---- queries (spec §6) -------------------------------------------------

    pub fn get_challenge(&self, output_index: u64) -> Option<&Challenge> {
        self.challenges.get(&output_index)
    }

    pub fn get_status(&self, output_index: u64) -> Status {
        self.status_at(output_index, self.clock.now())
    }

    /// Evaluates status against an already-read clock value, so a single
    /// mutating operation that both checks status and schedules a new
    /// timeout reads the clock exactly once (spec §5).
    fn status_at(&self, output_index: u64, now: u64) -> Status {
        if self.approved_tombstones.contains(&output_index) {
            return Status::Approved;
        }
        match self.challenges.get(&output_index) {
            Some(c) => status::evaluate(c, now, &self.config),
            None => Status::None,
        }
    }

    pub fn get_segments_length(&self, turn: u64) -> Option<u64> {
        self.config.segments_lengths.get(turn)
    }

    pub fn is_able_to_bisect(&self, output_index: u64) -> bool {
        match self.challenges.get(&output_index) {
            Some(c) => match self.config.segments_lengths.get(c.turn) {
                Some(l_t) => segment::is_able_to_bisect(c.seg_size, l_t),
                None => false,
            },
            None => false,
        }
    }

    /// "In progress" = status ∉ {NONE, CHALLENGER_TIMEOUT} (spec §4.2).
    pub fn is_in_progress(&self, output_index: u64) -> bool {
        !matches!(
            self.get_status(output_index),
            Status::None | Status::ChallengerTimeout
        )
    }

    pub fn is_challenge_related(&self, output_index: u64, addr: Address) -> bool {
        match self.challenges.get(&output_index) {
            Some(c) => c.asserter == addr || c.challenger == addr,
            None => false,
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- operations (spec §4.5) -------------------------------------------

    pub fn create_challenge(
        &mut self,
        caller: Address,
        output_index: u64,
        segments: Vec<Digest>,
    ) -> Result<(), ChallengeError> {
        if output_index == 0 {
            return Err(self.reject(output_index, ChallengeError::InvalidIndex));
        }
        if self.oracle.is_finalized(output_index) {
            return Err(self.reject(output_index, ChallengeError::OutputFinalized));
        }

        let now = self.clock.now();
        let in_progress = !matches!(
            self.status_at(output_index, now),
            Status::None | Status::ChallengerTimeout
        );
        if self.approved_tombstones.contains(&output_index) || in_progress {
            return Err(self.reject(output_index, ChallengeError::AlreadyActive));
        }

        let target = match self.oracle.get_l2_output(output_index) {
            Some(t) => t,
            None => return Err(self.reject(output_index, ChallengeError::InvalidIndex)),
        };
        if caller == target.submitter {
            return Err(self.reject(output_index, ChallengeError::InvalidIndex));
        }

        let l1 = self
            .config
            .segments_lengths
            .get(1)
            .ok_or_else(|| self.reject(output_index, ChallengeError::ConfigInvalid))?;
        if segments.len() as u64 != l1 {
            return Err(self.reject(
                output_index,
                ChallengeError::BadSegments("wrong segment count for turn 1"),
            ));
        }
        // First must match the disputed output's own root (spec §9: this is
        // deliberately *not* tied to the prior checkpoint's root — preserved
        // as specified, not hardened).
        if segments[0] != target.output_root {
            return Err(self.reject(
                output_index,
                ChallengeError::BadSegments("first segment must match the disputed output root"),
            ));
        }
        if segments[segments.len() - 1] == target.output_root {
            return Err(self.reject(
                output_index,
                ChallengeError::BadSegments(
                    "last segment must disagree with the disputed output root",
                ),
            ));
        }

        self.bond_pool.increase_bond(caller, output_index);

        let challenge = Challenge {
            asserter: target.submitter,
            challenger: caller,
            segments,
            seg_start: target
                .l2_block_number
                .saturating_sub(self.config.submission_interval),
            seg_size: self.config.submission_interval,
            turn: 1,
            timeout_at: now + self.config.bisection_timeout,
            output_root: ZERO_DIGEST,
        };
        self.challenges.insert(output_index, challenge);
        self.emit(Event::ChallengeCreated {
            output_index,
            asserter: target.submitter,
            challenger: caller,
        });
        Ok(())
    }

    pub fn bisect(
        &mut self,
        caller: Address,
        output_index: u64,
        pos: u64,
        segments: Vec<Digest>,
    ) -> Result<(), ChallengeError> {
        if self.oracle.is_finalized(output_index) {
            return Err(self.reject(output_index, ChallengeError::OutputFinalized));
        }

        let now = self.clock.now();
        let status = self.status_at(output_index, now);
        if !matches!(status, Status::ChallengerTurn | Status::AsserterTurn) {
            return Err(self.reject(output_index, ChallengeError::WrongTurn));
        }
        let expected = turn::expected_actor(status).ok_or(ChallengeError::WrongTurn)?;

        let challenge = self
            .challenges
            .get(&output_index)
            .ok_or_else(|| self.reject(output_index, ChallengeError::WrongTurn))?
            .clone();
        turn::assert_caller(expected, caller, &challenge)
            .map_err(|e| self.reject(output_index, e))?;

        let t = challenge.turn;
        let l_t = self
            .config
            .segments_lengths
            .get(t)
            .ok_or(ChallengeError::ConfigInvalid)?;
        let l_next = self
            .config
            .segments_lengths
            .get(t + 1)
            .ok_or(ChallengeError::ConfigInvalid)?;

        if segments.len() as u64 != l_next {
            return Err(self.reject(
                output_index,
                ChallengeError::BadSegments("wrong segment count for next turn"),
            ));
        }
        let pos_usize = pos as usize;
        let prev_first = *challenge
            .segments
            .get(pos_usize)
            .ok_or_else(|| self.reject(output_index, ChallengeError::BadSegments("pos out of range")))?;
        let prev_last = *challenge.segments.get(pos_usize + 1).ok_or_else(|| {
            self.reject(output_index, ChallengeError::BadSegments("pos out of range"))
        })?;
        if segments[0] != prev_first {
            return Err(self.reject(
                output_index,
                ChallengeError::BadSegments("first segment must match the parent boundary"),
            ));
        }
        if segments[segments.len() - 1] == prev_last {
            return Err(self.reject(
                output_index,
                ChallengeError::BadSegments("last segment must not collide with the parent boundary"),
            ));
        }

        let next_seg_size = segment::next_seg_size(challenge.seg_size, l_t);
        let (new_start, _) = segment::child_range(challenge.seg_start, next_seg_size, pos);
        let able = segment::is_able_to_bisect(next_seg_size, l_next);
        let timeout_span = if able {
            self.config.bisection_timeout
        } else {
            self.config.proving_timeout
        };

        let challenge = self.challenges.get_mut(&output_index).unwrap();
        challenge.segments = segments;
        challenge.seg_start = new_start;
        challenge.seg_size = next_seg_size;
        challenge.turn = t + 1;
        challenge.timeout_at = now + timeout_span;

        self.emit(Event::Bisected {
            output_index,
            turn: t + 1,
        });
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn prove_fault(
        &mut self,
        caller: Address,
        output_index: u64,
        pos: u64,
        new_output_root: Digest,
        bundle: PublicInputProof,
        zk_proof: ZkProof,
        pair: ProofPair,
    ) -> Result<(), ChallengeError> {
        if self.oracle.is_finalized(output_index) {
            return Err(self.reject(output_index, ChallengeError::OutputFinalized));
        }

        let status = self.get_status(output_index);
        if !matches!(status, Status::ReadyToProve | Status::AsserterTimeout) {
            return Err(self.reject(output_index, ChallengeError::WrongTurn));
        }
        let expected = turn::expected_actor(status).ok_or(ChallengeError::WrongTurn)?;

        let challenge = self
            .challenges
            .get(&output_index)
            .ok_or_else(|| self.reject(output_index, ChallengeError::WrongTurn))?
            .clone();
        turn::assert_caller(expected, caller, &challenge)
            .map_err(|e| self.reject(output_index, e))?;

        let l_t = self
            .config
            .segments_lengths
            .get(challenge.turn)
            .ok_or(ChallengeError::ConfigInvalid)?;
        let able = segment::is_able_to_bisect(challenge.seg_size, l_t);
        let via_asserter_timeout = matches!(status, Status::AsserterTimeout);

        let h = proof::run_checks(
            &challenge,
            able,
            via_asserter_timeout,
            pos as usize,
            &bundle,
            self.config.max_txs,
            self.config.dummy_hash,
            &zk_proof,
            &pair,
            &self.zk_verifier,
            &self.trie_verifier,
            &self.verified_public_inputs,
        )
        .map_err(|e| self.reject(output_index, e))?;

        self.verified_public_inputs.insert(h);
        let record = self.challenges.get_mut(&output_index).unwrap();
        record.output_root = new_output_root;

        self.council.request_validation(
            ValidationPayload {
                output_index,
                output_root: new_output_root,
            },
            output_index,
        );

        self.emit(Event::Proven {
            output_index,
            output_root: new_output_root,
        });
        Ok(())
    }

    /// Deliberately does not check `caller == asserter` (spec §9, Open
    /// Questions): the transition is forced by the clock alone, and the
    /// outcome — the bond staying with the asserter via the oracle/bond-pool
    /// mechanism — is not caller-controlled, so anyone may trigger cleanup.
    pub fn challenger_timeout(
        &mut self,
        _caller: Address,
        output_index: u64,
    ) -> Result<(), ChallengeError> {
        let status = self.get_status(output_index);
        if status != Status::ChallengerTimeout {
            return Err(self.reject(output_index, ChallengeError::WrongTurn));
        }
        self.challenges.remove(&output_index);
        self.emit(Event::Deleted { output_index });
        Ok(())
    }

    pub fn approve_challenge(
        &mut self,
        caller: Address,
        output_index: u64,
    ) -> Result<(), ChallengeError> {
        if caller != self.config.council {
            return Err(self.reject(output_index, ChallengeError::NotCouncil));
        }
        let status = self.get_status(output_index);
        if status != Status::Proven {
            return Err(self.reject(output_index, ChallengeError::NotProven));
        }

        let challenge = self.challenges.get(&output_index).unwrap().clone();
        self.oracle
            .replace_l2_output(output_index, challenge.output_root, challenge.challenger);
        self.challenges.remove(&output_index);
        self.approved_tombstones.insert(output_index);

        self.emit(Event::Approved {
            output_index,
            output_root: challenge.output_root,
        });
        Ok(())
    }
}

/// Accessors for integrators' own tests (and this crate's `tests/` suite) to
/// reach into the injected collaborators — e.g. to seed oracle state or
/// advance a fake clock — without exposing them on the production API.
#[cfg(feature = "test-util")]
impl<O, B, C, Z, M, K> ChallengeCoordinator<O, B, C, Z, M, K>
where
    O: OutputOracle,
    B: BondPool,
    C: SecurityCouncil,
    Z: ZkVerifier,
    M: MerkleTrieVerifier,
    K: Clock,
{
    pub fn oracle_mut_for_test(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn bond_pool_for_test(&self) -> &B {
        &self.bond_pool
    }

    pub fn council_for_test(&self) -> &C {
        &self.council
    }

    pub fn clock_for_test(&self) -> &K {
        &self.clock
    }
}
