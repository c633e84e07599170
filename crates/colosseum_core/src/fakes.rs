//! In-memory fake collaborators, gated behind the `test-util` feature so
//! downstream integrators can reuse them in their own tests without pulling
//! in a full oracle/bond-pool/council/verifier stack.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use crate::collaborators::{
    BondPool, Clock, L2Output, MerkleTrieVerifier, OutputOracle, SecurityCouncil, ValidationPayload,
    ZkVerifier,
};
use crate::proof::{ProofPair, ZkProof};
use crate::types::{Address, Digest};

#[derive(Debug, Default)]
pub struct FakeOracle {
    outputs: BTreeMap<u64, L2Output>,
    finalized: BTreeSet<u64>,
    pub replacements: Vec<(u64, Digest, Address)>,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_output(&mut self, output_index: u64, output: L2Output) {
        self.outputs.insert(output_index, output);
    }

    pub fn finalize(&mut self, output_index: u64) {
        self.finalized.insert(output_index);
    }
}

impl OutputOracle for FakeOracle {
    fn is_finalized(&self, output_index: u64) -> bool {
        self.finalized.contains(&output_index)
    }

    fn get_l2_output(&self, output_index: u64) -> Option<L2Output> {
        self.outputs.get(&output_index).copied()
    }

    fn replace_l2_output(&mut self, output_index: u64, new_root: Digest, submitter: Address) {
        if let Some(out) = self.outputs.get_mut(&output_index) {
            out.output_root = new_root;
            out.submitter = submitter;
        }
        self.replacements.push((output_index, new_root, submitter));
    }
}

#[derive(Debug, Default)]
pub struct FakeBondPool {
    min_bond: u64,
    bonds: BTreeMap<u64, u64>,
}

impl FakeBondPool {
    pub fn new(min_bond: u64) -> Self {
        Self {
            min_bond,
            bonds: BTreeMap::new(),
        }
    }

    pub fn bond_for(&self, output_index: u64) -> u64 {
        self.bonds.get(&output_index).copied().unwrap_or(0)
    }
}

impl BondPool for FakeBondPool {
    fn increase_bond(&mut self, _bidder: Address, output_index: u64) {
        let entry = self.bonds.entry(output_index).or_insert(0);
        *entry = if *entry == 0 { self.min_bond } else { *entry * 2 };
    }
}

#[derive(Debug, Default)]
pub struct FakeCouncil {
    pub requests: Vec<(ValidationPayload, u64)>,
}

impl FakeCouncil {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecurityCouncil for FakeCouncil {
    fn request_validation(&mut self, payload: ValidationPayload, nonce: u64) {
        self.requests.push((payload, nonce));
    }
}

/// Accepts any proof whose digest is in `accepted` (default: accepts every
/// digest, so tests can focus on the pipeline's own checks unless they
/// specifically want to exercise ZK rejection).
#[derive(Debug)]
pub struct FakeZkVerifier {
    accept_all: bool,
    accepted: BTreeSet<Digest>,
}

impl Default for FakeZkVerifier {
    fn default() -> Self {
        Self {
            accept_all: true,
            accepted: BTreeSet::new(),
        }
    }
}

impl FakeZkVerifier {
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn reject_all() -> Self {
        Self {
            accept_all: false,
            accepted: BTreeSet::new(),
        }
    }

    pub fn accept_only(digests: impl IntoIterator<Item = Digest>) -> Self {
        Self {
            accept_all: false,
            accepted: digests.into_iter().collect(),
        }
    }
}

impl ZkVerifier for FakeZkVerifier {
    fn verify(&self, _proof: &ZkProof, _pair: &ProofPair, public_input_digest: &Digest) -> bool {
        self.accept_all || self.accepted.contains(public_input_digest)
    }
}

/// Accepts any inclusion proof by default; set `accept = false` to exercise
/// the rejection path.
#[derive(Debug)]
pub struct FakeMerkleVerifier {
    pub accept: bool,
}

impl Default for FakeMerkleVerifier {
    fn default() -> Self {
        Self { accept: true }
    }
}

impl MerkleTrieVerifier for FakeMerkleVerifier {
    fn verify_inclusion_proof(
        &self,
        _key: &[u8],
        _value_encoding: &[u8],
        _proof_nodes: &[Vec<u8>],
        _state_root: &Digest,
    ) -> bool {
        self.accept
    }
}

#[derive(Debug, Default)]
pub struct FakeClock {
    now: Cell<u64>,
}

impl FakeClock {
    pub fn new(now: u64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: u64) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
