//! Proof Pipeline (spec §4.4): steps 2 through 8 of the `proveFault`
//! acceptance sequence. The turn check (step 1) and the effects (step 9) live
//! in the coordinator, which owns caller authentication and map mutation;
//! everything here is a pure check over an already-loaded `Challenge`.

use std::collections::BTreeSet;

use crate::collaborators::{MerkleTrieVerifier, ZkVerifier};
use crate::error::ChallengeError;
use crate::hashing;
use crate::proof::inputs::{ProofPair, PublicInputProof, ZkProof};
use crate::types::{Challenge, Digest};

/// The L2ToL1MessagePasser predeploy address used by OP-stack rollups
/// (0x4200...0016) — the withdrawal-passer account the proof must show
/// included under the *src* output root proof's state root (spec step 5),
/// carrying the *dst* proof's message-passer storage root as its value.
pub const L2_TO_L1_MESSAGE_PASSER_ADDRESS: [u8; 20] = [
    0x42, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x16,
];

fn encode_passer_account(balance: u128, code_hash: Digest, storage_root: Digest) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 16 + 32 + 32);
    buf.push(0u8); // nonce is always 0 for the passer predeploy
    buf.extend_from_slice(&balance.to_be_bytes());
    buf.extend_from_slice(&code_hash);
    buf.extend_from_slice(&storage_root);
    buf
}

/// Runs steps 2–8 of spec §4.4 and returns the public-input digest `h` on
/// success. The caller (the coordinator) is responsible for then inserting
/// `h` into the verified set and applying the challenge's effects — this
/// function mutates nothing.
///
/// `able_to_bisect` and `via_asserter_timeout` describe the challenge's
/// collapse state and the status it was reached through; together they
/// decide whether segment anchoring (step 2) applies (spec §4.4: "When still
/// bisectable ... skip this anchoring; the asserter's default waives the
/// anchoring requirement").
#[allow(clippy::too_many_arguments)]
pub fn run_checks(
    challenge: &Challenge,
    able_to_bisect: bool,
    via_asserter_timeout: bool,
    pos: usize,
    bundle: &PublicInputProof,
    max_txs: usize,
    dummy_hash: Digest,
    zk_proof: &ZkProof,
    pair: &ProofPair,
    zk: &impl ZkVerifier,
    trie: &impl MerkleTrieVerifier,
    verified: &BTreeSet<Digest>,
) -> Result<Digest, ChallengeError> {
    // Step 2: segment anchoring, only when the challenge has actually
    // collapsed to single-block granularity and wasn't reached via the
    // asserter's default.
    if !able_to_bisect && !via_asserter_timeout {
        let src = *challenge
            .segments
            .get(pos)
            .ok_or(ChallengeError::BadSegments("proof position out of range"))?;
        let dst = *challenge
            .segments
            .get(pos + 1)
            .ok_or(ChallengeError::BadSegments("proof position out of range"))?;

        if hashing::hash_output_root_proof(&bundle.src_output_root_proof) != src {
            return Err(ChallengeError::BadSegments(
                "src output root proof does not match the committed boundary",
            ));
        }
        if hashing::hash_output_root_proof(&bundle.dst_output_root_proof) == dst {
            return Err(ChallengeError::BadSegments(
                "dst output root proof must disagree with the asserter's committed boundary",
            ));
        }
    }

    // Step 3: block linkage.
    if bundle.src_output_root_proof.next_block_hash != bundle.dst_output_root_proof.block_hash {
        return Err(ChallengeError::ProofRejected(
            "src next-block-hash does not link to dst block-hash",
        ));
    }

    // Step 4: public-input consistency.
    if bundle.public_input.state_root != bundle.dst_output_root_proof.state_root {
        return Err(ChallengeError::ProofRejected(
            "public input state root does not match dst output root proof",
        ));
    }
    if hashing::hash_block_header(&bundle.public_input, &bundle.rlps)
        != bundle.src_output_root_proof.next_block_hash
    {
        return Err(ChallengeError::ProofRejected(
            "recomputed block header hash does not match src next-block-hash",
        ));
    }

    // Step 5: withdrawal storage inclusion.
    let value_encoding = encode_passer_account(
        bundle.l2_to_l1_message_passer_balance,
        bundle.l2_to_l1_message_passer_code_hash,
        bundle.dst_output_root_proof.message_passer_storage_root,
    );
    if !trie.verify_inclusion_proof(
        &L2_TO_L1_MESSAGE_PASSER_ADDRESS,
        &value_encoding,
        &bundle.merkle_proof,
        &bundle.src_output_root_proof.state_root,
    ) {
        return Err(ChallengeError::ProofRejected(
            "withdrawal passer account not included under src state root",
        ));
    }

    // Step 6: public-input digest.
    let dummy_hashes = hashing::generate_dummy_hashes(dummy_hash, max_txs);
    let h = hashing::hash_public_input(
        &bundle.src_output_root_proof.state_root,
        &bundle.public_input,
        &dummy_hashes,
    );

    // Step 7: replay check.
    if verified.contains(&h) {
        return Err(ChallengeError::Replay);
    }

    // Step 8: ZK verify.
    if !zk.verify(zk_proof, pair, &h) {
        return Err(ChallengeError::ProofRejected("zk verifier rejected the proof"));
    }

    Ok(h)
}
