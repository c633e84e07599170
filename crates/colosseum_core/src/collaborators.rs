//! Capability traits for the external collaborators of spec §6 — the output
//! oracle, validator bond pool, security council, and the two opaque
//! verifier predicates. Implementations are injected at `ChallengeCoordinator`
//! construction, so they can be swapped for in-memory fakes in tests
//! (`fakes` module, `test-util` feature) without touching the state machine.

use crate::proof::inputs::{ProofPair, ZkProof};
use crate::types::{Address, Digest};

/// A checkpoint output as reported by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2Output {
    pub output_root: Digest,
    pub l2_block_number: u64,
    pub timestamp: u64,
    pub submitter: Address,
}

/// The output oracle: stores checkpoint outputs, enforces the finalization
/// window, and accepts replacements once a challenge is approved.
pub trait OutputOracle {
    fn is_finalized(&self, output_index: u64) -> bool;
    fn get_l2_output(&self, output_index: u64) -> Option<L2Output>;
    fn replace_l2_output(&mut self, output_index: u64, new_root: Digest, submitter: Address);
}

/// The validator bond pool: escrows challenger bonds, doubling on re-challenge.
pub trait BondPool {
    /// Idempotent-per-bidder; doubles the escrowed amount on repeat calls for
    /// the same `output_index` (spec §4.2, re-challenge after
    /// `CHALLENGER_TIMEOUT`).
    fn increase_bond(&mut self, bidder: Address, output_index: u64);
}

/// Payload handed to the security council when a proof is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPayload {
    pub output_index: u64,
    pub output_root: Digest,
}

/// The security council multisig. `request_validation` schedules an
/// off-chain vote; the council later re-enters the coordinator directly via
/// `ChallengeCoordinator::approve_challenge` once the vote succeeds (spec §9,
/// "re-entrancy from council callback" — the callback *is* that re-entry, so
/// this trait only needs to record the request, not hold a callback value).
pub trait SecurityCouncil {
    fn request_validation(&mut self, payload: ValidationPayload, nonce: u64);
}

/// Opaque boolean predicate over `(proof, public-input pair, digest)`.
pub trait ZkVerifier {
    fn verify(&self, proof: &ZkProof, pair: &ProofPair, public_input_digest: &Digest) -> bool;
}

/// Opaque inclusion-proof predicate over the withdrawal-passer account
/// (verified under the src output root proof's state root, spec step 5).
pub trait MerkleTrieVerifier {
    fn verify_inclusion_proof(
        &self,
        key: &[u8],
        value_encoding: &[u8],
        proof_nodes: &[Vec<u8>],
        state_root: &Digest,
    ) -> bool;
}

/// A monotonic authoritative clock, read once per operation (spec §5).
/// Injectable so tests can drive timeouts deterministically (spec §9).
pub trait Clock {
    fn now(&self) -> u64;
}

/// Wall-clock production implementation, seconds since `UNIX_EPOCH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_secs()
    }
}
