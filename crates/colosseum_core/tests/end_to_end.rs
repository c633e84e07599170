//! End-to-end scenarios from spec §8, driven against the coordinator with
//! in-memory fake collaborators.

use colosseum_core::collaborators::L2Output;
use colosseum_core::fakes::{FakeBondPool, FakeClock, FakeCouncil, FakeMerkleVerifier, FakeOracle, FakeZkVerifier};
use colosseum_core::hashing;
use colosseum_core::proof::{BlockHeaderPublicInput, OutputRootProof, ProofPair, PublicInputProof, Rlps, ZkProof};
use colosseum_core::{Address, ChallengeCoordinator, ChallengeError, Config, Digest, SegmentsLengths, Status};

type Coord = ChallengeCoordinator<FakeOracle, FakeBondPool, FakeCouncil, FakeZkVerifier, FakeMerkleVerifier, FakeClock>;

const SUBMISSION_INTERVAL: u64 = 6;
const BISECTION_TIMEOUT: u64 = 120;
const PROVING_TIMEOUT: u64 = 480;
const MAX_TXS: usize = 4;

fn addr(b: u8) -> Address {
    [b; 20]
}

fn digest(b: u8) -> Digest {
    [b; 32]
}

fn schedule() -> SegmentsLengths {
    // (2-1)(2-1)(3-1)(4-1) = 6 == SUBMISSION_INTERVAL
    SegmentsLengths::new(vec![2, 2, 3, 4])
}

fn build_coordinator(min_bond: u64, now: u64) -> Coord {
    build_coordinator_with(min_bond, now, FakeZkVerifier::accept_all(), FakeMerkleVerifier::default())
}

fn build_coordinator_with(
    min_bond: u64,
    now: u64,
    zk_verifier: FakeZkVerifier,
    trie_verifier: FakeMerkleVerifier,
) -> Coord {
    let config = Config::new(
        SUBMISSION_INTERVAL,
        BISECTION_TIMEOUT,
        PROVING_TIMEOUT,
        digest(0xD0),
        MAX_TXS,
        schedule(),
        addr(0xC0),
        addr(0xC1),
    )
    .expect("valid schedule");
    ChallengeCoordinator::new(
        config,
        FakeOracle::new(),
        FakeBondPool::new(min_bond),
        FakeCouncil::new(),
        zk_verifier,
        trie_verifier,
        FakeClock::new(now),
    )
}

/// A proof bundle that is internally consistent (block linkage, public-input
/// consistency) and whose `src_output_root_proof` hashes to `disputed_root`.
/// `wrong_dst_boundary` is the digest the asserter (wrongly) committed as the
/// boundary following `disputed_root`; it must differ from the proof's real
/// dst hash, which this helper guarantees by construction.
struct ProofFixture {
    disputed_root: Digest,
    wrong_dst_boundary: Digest,
    bundle: PublicInputProof,
}

fn build_proof_fixture() -> ProofFixture {
    let mut src = OutputRootProof {
        state_root: digest(0x01),
        message_passer_storage_root: digest(0x02),
        block_hash: digest(0x03),
        next_block_hash: [0; 32],
    };
    let mut dst = OutputRootProof {
        state_root: digest(0x04),
        message_passer_storage_root: digest(0x05),
        block_hash: [0; 32],
        next_block_hash: digest(0x06),
    };
    let public_input = BlockHeaderPublicInput {
        state_root: dst.state_root,
        parent_hash: digest(0x07),
        number: 1_000_001,
        timestamp: 42,
        extra_fields_hash: digest(0x08),
    };
    let rlps = Rlps { slices: vec![vec![1, 2, 3]] };

    let header_hash = hashing::hash_block_header(&public_input, &rlps);
    src.next_block_hash = header_hash;
    dst.block_hash = header_hash;

    let disputed_root = hashing::hash_output_root_proof(&src);
    let real_dst_hash = hashing::hash_output_root_proof(&dst);
    // Guaranteed distinct from real_dst_hash: flip its first byte.
    let mut wrong_dst_boundary = real_dst_hash;
    wrong_dst_boundary[0] ^= 0xFF;

    let bundle = PublicInputProof {
        src_output_root_proof: src,
        dst_output_root_proof: dst,
        public_input,
        rlps,
        merkle_proof: vec![vec![9, 9, 9]],
        l2_to_l1_message_passer_balance: 0,
        l2_to_l1_message_passer_code_hash: digest(0x0a),
    };

    ProofFixture {
        disputed_root,
        wrong_dst_boundary,
        bundle,
    }
}

/// Drives a freshly created challenge at `output_index` through all three
/// bisections down to single-block granularity, always at `pos = 0`, so the
/// first segment boundary (`disputed_root`) is carried unchanged to the final
/// turn. Returns the final segment pair `(disputed_root, last_boundary)`.
fn drive_to_ready_to_prove(
    coord: &mut Coord,
    asserter: Address,
    challenger: Address,
    output_index: u64,
    disputed_root: Digest,
    last_boundary: Digest,
) {
    coord
        .create_challenge(challenger, output_index, vec![disputed_root, digest(0xB1)])
        .unwrap();
    coord
        .bisect(asserter, output_index, 0, vec![disputed_root, digest(0xB2)])
        .unwrap();
    coord
        .bisect(challenger, output_index, 0, vec![disputed_root, digest(0xB3), digest(0xB4)])
        .unwrap();
    coord
        .bisect(
            asserter,
            output_index,
            0,
            vec![disputed_root, last_boundary, digest(0xB6), digest(0xB7)],
        )
        .unwrap();
    assert_eq!(coord.get_status(output_index), Status::ReadyToProve);
    assert!(!coord.is_able_to_bisect(output_index));
}

#[test]
fn happy_path_to_proof_and_approval() {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 7;
    let fixture = build_proof_fixture();

    let mut coord = build_coordinator(1_000, 0);
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: fixture.disputed_root,
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );

    drive_to_ready_to_prove(
        &mut coord,
        asserter,
        challenger,
        output_index,
        fixture.disputed_root,
        fixture.wrong_dst_boundary,
    );

    coord
        .prove_fault(
            challenger,
            output_index,
            0,
            digest(0x99),
            fixture.bundle.clone(),
            ZkProof(vec![]),
            ProofPair(vec![]),
        )
        .expect("valid proof must be accepted");
    assert_eq!(coord.get_status(output_index), Status::Proven);

    coord
        .approve_challenge(addr(0xC0), output_index)
        .expect("council approval must succeed once proven");
    assert_eq!(coord.get_status(output_index), Status::Approved);
    assert!(coord.get_challenge(output_index).is_none());
}

#[test]
fn asserter_timeout_then_proof_skips_anchoring() {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 11;
    let fixture = build_proof_fixture();

    let mut coord = build_coordinator(1_000, 0);
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: fixture.disputed_root,
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );
    coord
        .create_challenge(challenger, output_index, vec![fixture.disputed_root, digest(0xB1)])
        .unwrap();

    coord.clock_for_test().advance(BISECTION_TIMEOUT + 1);
    assert_eq!(coord.get_status(output_index), Status::AsserterTimeout);

    // Still at turn 1 (2 segments), never collapsed — anchoring is skipped
    // because we got here via ASSERTER_TIMEOUT.
    coord
        .prove_fault(
            challenger,
            output_index,
            0,
            digest(0x55),
            fixture.bundle.clone(),
            ZkProof(vec![]),
            ProofPair(vec![]),
        )
        .expect("proof must be accepted without anchoring under ASSERTER_TIMEOUT");
    assert_eq!(coord.get_status(output_index), Status::Proven);
}

#[test]
fn challenger_abandons_during_asserter_timeout_then_reusable() {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 13;

    let mut coord = build_coordinator(1_000, 0);
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: digest(0xAA),
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );
    coord
        .create_challenge(challenger, output_index, vec![digest(0xAA), digest(0xBB)])
        .unwrap();

    coord.clock_for_test().advance(BISECTION_TIMEOUT + 1);
    assert_eq!(coord.get_status(output_index), Status::AsserterTimeout);

    coord.clock_for_test().advance(PROVING_TIMEOUT);
    assert_eq!(coord.get_status(output_index), Status::AsserterTimeout, "exactly at the boundary");

    coord.clock_for_test().advance(1);
    assert_eq!(coord.get_status(output_index), Status::ChallengerTimeout);

    coord.challenger_timeout(addr(0xFF), output_index).expect("anyone may close it");
    assert_eq!(coord.get_status(output_index), Status::None);
    assert!(coord.get_challenge(output_index).is_none());
}

#[test]
fn rechallenge_after_timeout_doubles_bond() {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 17;

    let mut coord = build_coordinator(1_000, 0);
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: digest(0xAA),
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );

    coord
        .create_challenge(challenger, output_index, vec![digest(0xAA), digest(0xBB)])
        .unwrap();
    assert_eq!(coord.bond_pool_for_test().bond_for(output_index), 1_000);

    coord.clock_for_test().advance(BISECTION_TIMEOUT + PROVING_TIMEOUT + 2);
    assert_eq!(coord.get_status(output_index), Status::ChallengerTimeout);
    coord.challenger_timeout(asserter, output_index).unwrap();

    coord
        .create_challenge(challenger, output_index, vec![digest(0xAA), digest(0xCC)])
        .expect("a CHALLENGER_TIMEOUT slot is reusable");
    assert_eq!(coord.bond_pool_for_test().bond_for(output_index), 2_000);
}

#[test]
fn replay_defense_rejects_second_use_of_the_same_digest() {
    let asserter = addr(1);
    let challenger = addr(2);
    let fixture = build_proof_fixture();

    let mut coord = build_coordinator(1_000, 0);
    for output_index in [101u64, 102u64] {
        coord.oracle_mut_for_test().set_output(
            output_index,
            L2Output {
                output_root: fixture.disputed_root,
                l2_block_number: 1_000,
                timestamp: 0,
                submitter: asserter,
            },
        );
        drive_to_ready_to_prove(
            &mut coord,
            asserter,
            challenger,
            output_index,
            fixture.disputed_root,
            fixture.wrong_dst_boundary,
        );
    }

    coord
        .prove_fault(
            challenger,
            101,
            0,
            digest(0x11),
            fixture.bundle.clone(),
            ZkProof(vec![]),
            ProofPair(vec![]),
        )
        .expect("first use of this public-input digest must be accepted");

    let err = coord
        .prove_fault(
            challenger,
            102,
            0,
            digest(0x12),
            fixture.bundle.clone(),
            ZkProof(vec![]),
            ProofPair(vec![]),
        )
        .expect_err("identical public-input digest must be rejected as a replay");
    assert_eq!(err, ChallengeError::Replay);
}

#[test]
fn zk_verifier_rejection_fails_the_proof() {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 23;
    let fixture = build_proof_fixture();

    let mut coord = build_coordinator_with(1_000, 0, FakeZkVerifier::reject_all(), FakeMerkleVerifier::default());
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: fixture.disputed_root,
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );
    drive_to_ready_to_prove(
        &mut coord,
        asserter,
        challenger,
        output_index,
        fixture.disputed_root,
        fixture.wrong_dst_boundary,
    );

    let err = coord
        .prove_fault(
            challenger,
            output_index,
            0,
            digest(0x66),
            fixture.bundle.clone(),
            ZkProof(vec![]),
            ProofPair(vec![]),
        )
        .expect_err("a rejecting ZK verifier must fail proveFault");
    assert_eq!(err, ChallengeError::ProofRejected("zk verifier rejected the proof"));
    // Rejection must not mutate the challenge: still at READY_TO_PROVE.
    assert_eq!(coord.get_status(output_index), Status::ReadyToProve);
}

#[test]
fn merkle_verifier_rejection_fails_the_proof() {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 27;
    let fixture = build_proof_fixture();

    let mut coord = build_coordinator_with(
        1_000,
        0,
        FakeZkVerifier::accept_all(),
        FakeMerkleVerifier { accept: false },
    );
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: fixture.disputed_root,
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );
    drive_to_ready_to_prove(
        &mut coord,
        asserter,
        challenger,
        output_index,
        fixture.disputed_root,
        fixture.wrong_dst_boundary,
    );

    let err = coord
        .prove_fault(
            challenger,
            output_index,
            0,
            digest(0x77),
            fixture.bundle.clone(),
            ZkProof(vec![]),
            ProofPair(vec![]),
        )
        .expect_err("a rejecting Merkle-trie verifier must fail proveFault");
    assert_eq!(
        err,
        ChallengeError::ProofRejected("withdrawal passer account not included under src state root")
    );
    assert_eq!(coord.get_status(output_index), Status::ReadyToProve);
}

#[test]
fn queries_reflect_a_live_challenge() -> anyhow::Result<()> {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 29;

    let mut coord = build_coordinator(1_000, 0);
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: digest(0xAA),
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );
    coord.create_challenge(challenger, output_index, vec![digest(0xAA), digest(0xBB)])?;

    assert!(coord.is_in_progress(output_index));
    assert!(coord.is_able_to_bisect(output_index));
    assert!(coord.is_challenge_related(output_index, asserter));
    assert!(coord.is_challenge_related(output_index, challenger));
    assert!(!coord.is_challenge_related(output_index, addr(0xFE)));
    assert_eq!(coord.get_segments_length(1), Some(2));
    assert_eq!(coord.get_segments_length(99), None);

    let events = coord.drain_events();
    assert_eq!(events.len(), 1);
    Ok(())
}

#[test]
fn bad_segments_are_rejected_on_bisect() {
    let asserter = addr(1);
    let challenger = addr(2);
    let output_index = 21;

    let mut coord = build_coordinator(1_000, 0);
    coord.oracle_mut_for_test().set_output(
        output_index,
        L2Output {
            output_root: digest(0xAA),
            l2_block_number: 1_000,
            timestamp: 0,
            submitter: asserter,
        },
    );
    coord
        .create_challenge(challenger, output_index, vec![digest(0xAA), digest(0xBB)])
        .unwrap();

    let first_mismatch = coord.bisect(asserter, output_index, 0, vec![digest(0xEE), digest(0xCC)]);
    assert_eq!(
        first_mismatch.unwrap_err(),
        ChallengeError::BadSegments("first segment must match the parent boundary")
    );

    let last_collides = coord.bisect(asserter, output_index, 0, vec![digest(0xAA), digest(0xBB)]);
    assert_eq!(
        last_collides.unwrap_err(),
        ChallengeError::BadSegments("last segment must not collide with the parent boundary")
    );
}
