//! Events emitted by the coordinator (spec §6) — named records, not a wire
//! format. Collected in-memory and drainable by the host; also logged at
//! `info` level as they occur.

use serde::{Deserialize, Serialize};

use crate::types::{Address, Digest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    ChallengeCreated {
        output_index: u64,
        asserter: Address,
        challenger: Address,
    },
    Bisected {
        output_index: u64,
        turn: u64,
    },
    Proven {
        output_index: u64,
        output_root: Digest,
    },
    Approved {
        output_index: u64,
        output_root: Digest,
    },
    Deleted {
        output_index: u64,
    },
}
