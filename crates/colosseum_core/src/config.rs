//! Configuration constants (spec §6), set once at construction and immutable
//! thereafter. `SegmentsLengths` is the frozen `L[1..K]` vector from §3.

use serde::{Deserialize, Serialize};

use crate::error::ChallengeError;
use crate::types::{Address, Digest};

/// `L[1..K]`, stored 0-indexed: `vector[i]` serves turn `i + 1` (spec §6,
/// "persisted state layout").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentsLengths(Vec<u64>);

impl SegmentsLengths {
    pub fn new(lengths: Vec<u64>) -> Self {
        Self(lengths)
    }

    /// `L[turn]`, or `None` if `turn` is out of `[1, K]`.
    pub fn get(&self, turn: u64) -> Option<u64> {
        if turn == 0 {
            return None;
        }
        self.0.get((turn - 1) as usize).copied()
    }

    pub fn k(&self) -> u64 {
        self.0.len() as u64
    }
}

/// Configuration constants for one coordinator instance (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub submission_interval: u64,
    pub bisection_timeout: u64,
    pub proving_timeout: u64,
    pub dummy_hash: Digest,
    pub max_txs: usize,
    pub segments_lengths: SegmentsLengths,
    pub council: Address,
    /// Recorded for parity with the external interface (spec §6); the actual
    /// inclusion-proof predicate is the injected `MerkleTrieVerifier`, not
    /// this address.
    pub trie_verifier: Address,
}

impl Config {
    /// Validates `len(SegmentsLengths)` is even and `∏(L[t]−1) ==
    /// SubmissionInterval`, per spec §3 and §6. Fails closed with
    /// `ConfigInvalid` — this is the one check performed at initialization
    /// rather than per-operation.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        submission_interval: u64,
        bisection_timeout: u64,
        proving_timeout: u64,
        dummy_hash: Digest,
        max_txs: usize,
        segments_lengths: SegmentsLengths,
        council: Address,
        trie_verifier: Address,
    ) -> Result<Self, ChallengeError> {
        let k = segments_lengths.k();
        if k == 0 || k % 2 != 0 {
            return Err(ChallengeError::ConfigInvalid);
        }

        let mut product: u64 = 1;
        for turn in 1..=k {
            let l = segments_lengths.get(turn).ok_or(ChallengeError::ConfigInvalid)?;
            if l < 2 {
                return Err(ChallengeError::ConfigInvalid);
            }
            product = product
                .checked_mul(l - 1)
                .ok_or(ChallengeError::ConfigInvalid)?;
        }
        if product != submission_interval {
            return Err(ChallengeError::ConfigInvalid);
        }

        Ok(Self {
            submission_interval,
            bisection_timeout,
            proving_timeout,
            dummy_hash,
            max_txs,
            segments_lengths,
            council,
            trie_verifier,
        })
    }
}
