//! Colosseum: the interactive fault-dispute state machine for optimistic-
//! rollup checkpoint challenges.
//!
//! A challenger disputes an asserter's output commitment by recursively
//! bisecting a block range (`bisect`) until a single-block disagreement is
//! isolated, then submits a ZK validity proof for that block (`proveFault`),
//! forcing replacement of the invalid output subject to security-council
//! approval. This crate is the per-challenge state machine, bisection
//! arithmetic, timeout taxonomy, and proof-acceptance pipeline only — the
//! output oracle, bond pool, ZK verifier, Merkle-trie verifier, and security
//! council are external collaborators, modeled here as narrow traits
//! (`collaborators` module) injected at `ChallengeCoordinator` construction.

pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod hashing;
pub mod proof;
pub mod segment;
pub mod status;
pub mod sync;
pub mod turn;
pub mod types;

#[cfg(feature = "test-util")]
pub mod fakes;

pub use collaborators::{
    BondPool, Clock, L2Output, MerkleTrieVerifier, OutputOracle, SecurityCouncil, SystemClock,
    ValidationPayload, ZkVerifier,
};
pub use config::{Config, SegmentsLengths};
pub use coordinator::ChallengeCoordinator;
pub use error::ChallengeError;
pub use events::Event;
pub use proof::{BlockHeaderPublicInput, OutputRootProof, ProofPair, PublicInputProof, Rlps, ZkProof};
pub use status::Status;
pub use turn::Actor;
pub use types::{Address, Challenge, Digest, ZERO_ADDRESS, ZERO_DIGEST};
