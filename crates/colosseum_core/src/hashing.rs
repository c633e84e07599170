//! Hashing primitives (spec §6): `hashOutputRootProof`, `hashBlockHeader`,
//! `hashPublicInput`, and `generateDummyHashes`. These are the one collaborator
//! family spec §1 marks "treated as pure functions" rather than a stateful
//! external system, so they're implemented directly rather than mocked.
//!
//! Each hash is domain-separated with a fixed label, following the same
//! convention as a Fiat-Shamir transcript.

use blake3::Hasher;

use crate::proof::inputs::{BlockHeaderPublicInput, OutputRootProof, Rlps};
use crate::types::Digest;

pub fn hash_output_root_proof(proof: &OutputRootProof) -> Digest {
    let mut h = Hasher::new();
    h.update(b"colosseum/output-root-proof/v1");
    h.update(&proof.state_root);
    h.update(&proof.message_passer_storage_root);
    h.update(&proof.block_hash);
    h.update(&proof.next_block_hash);
    *h.finalize().as_bytes()
}

pub fn hash_block_header(public_input: &BlockHeaderPublicInput, rlps: &Rlps) -> Digest {
    let mut h = Hasher::new();
    h.update(b"colosseum/block-header/v1");
    h.update(&public_input.state_root);
    h.update(&public_input.parent_hash);
    h.update(&public_input.number.to_be_bytes());
    h.update(&public_input.timestamp.to_be_bytes());
    h.update(&public_input.extra_fields_hash);
    for slice in &rlps.slices {
        h.update(slice);
    }
    *h.finalize().as_bytes()
}

/// Transaction-root verification is deliberately omitted here, matching the
/// source's own comment (spec §9, Open Questions) — the dummy hashes are
/// folded into the digest unchecked, not validated against any tx list.
pub fn hash_public_input(
    prev_state_root: &Digest,
    public_input: &BlockHeaderPublicInput,
    dummy_hashes: &[Digest],
) -> Digest {
    let mut h = Hasher::new();
    h.update(b"colosseum/public-input/v1");
    h.update(prev_state_root);
    h.update(&public_input.state_root);
    h.update(&public_input.parent_hash);
    h.update(&public_input.number.to_be_bytes());
    h.update(&public_input.timestamp.to_be_bytes());
    h.update(&(dummy_hashes.len() as u64).to_be_bytes());
    for d in dummy_hashes {
        h.update(d);
    }
    *h.finalize().as_bytes()
}

/// Pads the transaction-hash list up to `max_txs` with the fixed `DummyHash`
/// constant (spec §4.4 step 6).
pub fn generate_dummy_hashes(dummy_hash: Digest, max_txs: usize) -> Vec<Digest> {
    vec![dummy_hash; max_txs]
}
