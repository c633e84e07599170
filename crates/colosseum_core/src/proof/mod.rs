//! Proof Pipeline (spec §4.4): the `PublicInputProof` bundle and the
//! `proveFault` acceptance sequence.

pub mod inputs;
pub mod pipeline;

pub use inputs::{BlockHeaderPublicInput, OutputRootProof, ProofPair, PublicInputProof, Rlps, ZkProof};
pub use pipeline::run_checks;
