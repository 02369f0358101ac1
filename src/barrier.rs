//! Generation barrier between the band workers and the driver.
//!
//! One mutex guards the readiness flags, the generation counters and the
//! failure/shutdown state. Two condition variables hang off it:
//! `may_proceed` (driver -> workers) and `all_ready` (workers -> driver).
//!
//! Per generation the state moves WAITING_FOR_WORKERS -> ALL_READY ->
//! RELEASED and back:
//!
//! ```text
//!  worker i:  arrive(i) ──► ready[i] = true ──► last? commit + signal all_ready
//!                                  │
//!                                  ▼
//!                        wait on may_proceed until `released` moves
//!
//!  driver:    advance() ──► wait all_ready ──► reset flags, released += 1,
//!                           broadcast may_proceed ──► wait all_ready again
//! ```
//!
//! The last worker to arrive commits the generation buffer while still
//! holding the lock, so the swap is ordered after every band write of that
//! generation and before any worker can be released into the next one.

use crate::buffer::GenerationBuffer;
use crate::error::{LifeError, LifeResult};
use crate::grid::Grid;
use parking_lot::{Condvar, Mutex, MutexGuard};

/// What a worker should do after `arrive` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Compute this generation into the next buffer.
    Generation(u64),
    /// Shutdown requested or another participant failed; exit.
    Stop,
}

struct BarrierState {
    ready: Vec<bool>,
    ready_count: usize,
    /// Generations handed to the workers so far.
    released: u64,
    /// Generations whose buffers have been swapped in.
    committed: u64,
    failure: Option<LifeError>,
    shutdown: bool,
}

/// Owns the generation buffers and the only lock in the simulation.
pub struct BarrierCoordinator {
    workers: usize,
    state: Mutex<BarrierState>,
    may_proceed: Condvar,
    all_ready: Condvar,
    buffer: GenerationBuffer,
}

impl BarrierCoordinator {
    pub fn new(buffer: GenerationBuffer, workers: usize) -> Self {
        Self {
            workers,
            state: Mutex::new(BarrierState {
                ready: vec![false; workers],
                ready_count: 0,
                released: 0,
                committed: 0,
                failure: None,
                shutdown: false,
            }),
            may_proceed: Condvar::new(),
            all_ready: Condvar::new(),
            buffer,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn buffer(&self) -> &GenerationBuffer {
        &self.buffer
    }

    /// Worker `id` reports its band done and blocks until the next release.
    ///
    /// The first call of each worker reports readiness without having
    /// computed anything; the commit only happens once a released
    /// generation is fully written.
    pub fn arrive(&self, id: usize) -> LifeResult<Release> {
        let mut state = self.state.lock();

        if state.ready[id] {
            let err = LifeError::Invariant(format!(
                "worker {id} reported ready twice in generation {}",
                state.released
            ));
            self.fail_locked(&mut state, err.clone());
            return Err(err);
        }
        state.ready[id] = true;
        state.ready_count += 1;

        if state.ready_count == self.workers {
            if state.committed < state.released {
                self.buffer.commit();
                state.committed = state.released;
                tracing::trace!(generation = state.committed, worker = id, "generation committed");
            }
            self.all_ready.notify_all();
        }

        let seen = state.released;
        while state.released == seen && !state.shutdown && state.failure.is_none() {
            self.may_proceed.wait(&mut state);
        }

        if state.shutdown || state.failure.is_some() {
            Ok(Release::Stop)
        } else {
            Ok(Release::Generation(state.released))
        }
    }

    /// Release one generation and block until it is committed.
    /// Returns the number of the generation now current.
    pub fn advance(&self) -> LifeResult<u64> {
        let mut state = self.state.lock();
        self.wait_all_ready(&mut state)?;

        state.ready.iter_mut().for_each(|r| *r = false);
        state.ready_count = 0;
        state.released += 1;
        self.may_proceed.notify_all();

        self.wait_all_ready(&mut state)?;
        Ok(state.committed)
    }

    /// Copy of the committed generation, taken between generations.
    pub fn snapshot(&self) -> LifeResult<(Grid, u64)> {
        let mut state = self.state.lock();
        self.wait_all_ready(&mut state)?;
        Ok((self.buffer.snapshot()?, state.committed))
    }

    /// Record a fatal worker error and wake everyone.
    pub fn fail(&self, err: LifeError) {
        let mut state = self.state.lock();
        self.fail_locked(&mut state, err);
    }

    /// Ask all workers to exit at their next wait.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.shutdown = true;
        self.may_proceed.notify_all();
        self.all_ready.notify_all();
    }

    fn fail_locked(&self, state: &mut MutexGuard<'_, BarrierState>, err: LifeError) {
        if state.failure.is_none() {
            state.failure = Some(err);
        }
        self.may_proceed.notify_all();
        self.all_ready.notify_all();
    }

    fn wait_all_ready(&self, state: &mut MutexGuard<'_, BarrierState>) -> LifeResult<()> {
        loop {
            if let Some(err) = &state.failure {
                return Err(err.clone());
            }
            if state.ready_count == self.workers {
                return Ok(());
            }
            if state.shutdown {
                return Err(LifeError::Invariant("barrier used after shutdown".into()));
            }
            self.all_ready.wait(state);
        }
    }

    #[cfg(test)]
    fn ready_count(&self) -> usize {
        self.state.lock().ready_count
    }
}
