//! The `PublicInputProof` bundle and related proof-pipeline types (spec §4.4).

use serde::{Deserialize, Serialize};

use crate::types::Digest;

/// A structured preimage that hashes to an output root, exposing the fields
/// the proof pipeline needs to cross-check (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRootProof {
    pub state_root: Digest,
    pub message_passer_storage_root: Digest,
    pub block_hash: Digest,
    pub next_block_hash: Digest,
}

/// Header fields sufficient, with `rlps`, to recompute the next block hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderPublicInput {
    pub state_root: Digest,
    pub parent_hash: Digest,
    pub number: u64,
    pub timestamp: u64,
    /// Digest standing in for the remaining header fields this
    /// reimplementation does not itself decode (gas limit, base fee, ...);
    /// calldata/RLP encoding is out of scope (spec §1).
    pub extra_fields_hash: Digest,
}

/// Supplementary pre-encoded header slices needed alongside `BlockHeaderPublicInput`
/// to recompute the next block hash deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rlps {
    pub slices: Vec<Vec<u8>>,
}

/// The full bundle `proveFault` is handed (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputProof {
    pub src_output_root_proof: OutputRootProof,
    pub dst_output_root_proof: OutputRootProof,
    pub public_input: BlockHeaderPublicInput,
    pub rlps: Rlps,
    pub merkle_proof: Vec<Vec<u8>>,
    pub l2_to_l1_message_passer_balance: u128,
    pub l2_to_l1_message_passer_code_hash: Digest,
}

/// Opaque ZK proof bytes; generation is out of scope (spec §1 Non-goals).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkProof(pub Vec<u8>);

/// Opaque opening/public-input pair bytes handed to the ZK verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPair(pub Vec<u8>);
