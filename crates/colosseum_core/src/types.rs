//! Shared primitive types and the `Challenge` record (spec §3 data model).

use serde::{Deserialize, Serialize};

/// A 32-byte digest: output roots, state roots, storage roots, and public-input hashes
/// all share this representation.
pub type Digest = [u8; 32];

/// A 20-byte account identifier (asserter, challenger, council, bidder).
pub type Address = [u8; 20];

pub const ZERO_DIGEST: Digest = [0u8; 32];
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// A single dispute, keyed externally by `outputIndex`.
///
/// `segments`, `segStart`, and `segSize` describe the current turn's bisection
/// frontier; `turn` and `timeoutAt` describe whose move it is and by when.
///
/// There is no `approved` flag on this record: spec §3's lifecycle clears the
/// challenge record entirely on approval, so the tombstone that prevents
/// re-open lives one layer up, in `ChallengeCoordinator`'s own
/// `approved_tombstones` set, not on a `Challenge` value (a removed record
/// cannot carry a flag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub asserter: Address,
    pub challenger: Address,
    pub segments: Vec<Digest>,
    pub seg_start: u64,
    pub seg_size: u64,
    pub turn: u64,
    pub timeout_at: u64,
    pub output_root: Digest,
}

impl Challenge {
    pub fn has_proof(&self) -> bool {
        self.output_root != ZERO_DIGEST
    }

    /// Serializes this record for a host that wants to snapshot challenge
    /// state externally (a node's RPC surface, a test fixture, a simulator).
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
