//! Concurrency wrapper (spec §5, §9): the reference execution model is
//! serialized and single-threaded per operation. A host on a multithreaded
//! executor wraps the coordinator in a single mutex, or — since the protocol
//! imposes no ordering between challenges at distinct `outputIndex` values —
//! a per-index striped lock so unrelated challenges don't serialize on
//! each other.

use std::sync::{Mutex, MutexGuard};

/// A fixed-width array of mutex-guarded stripes, keyed by `output_index %
/// stripe_count`. Each stripe holds its own independent `T` (for this
/// crate, a `ChallengeCoordinator` is itself already a single home for all
/// `outputIndex` values, so `T` here would typically be one coordinator per
/// stripe's shard of the keyspace, or a shared coordinator behind a single
/// stripe — callers pick whichever partitioning matches their host).
pub struct Striped<T> {
    stripes: Vec<Mutex<T>>,
}

impl<T> Striped<T> {
    pub fn new(stripes: Vec<T>) -> Self {
        assert!(!stripes.is_empty(), "Striped requires at least one stripe");
        Self {
            stripes: stripes.into_iter().map(Mutex::new).collect(),
        }
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn stripe_for(&self, output_index: u64) -> &Mutex<T> {
        let idx = (output_index as usize) % self.stripes.len();
        &self.stripes[idx]
    }

    /// Locks the stripe owning `output_index` and returns the guard. The
    /// caller holds the lock only for the duration of one coordinator
    /// operation, matching the "runs to completion before another begins"
    /// discipline of spec §5.
    pub fn lock(&self, output_index: u64) -> MutexGuard<'_, T> {
        self.stripe_for(output_index)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
