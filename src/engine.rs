//! Fixed pool of band workers stepping the universe in lockstep.
//!
//! Workers are spawned once, each bound to one column band for the life of
//! the engine, and parked on the barrier between generations.

use crate::barrier::{BarrierCoordinator, Release};
use crate::buffer::GenerationBuffer;
use crate::error::{LifeError, LifeResult};
use crate::grid::{Grid, Torus};
use crate::partition::{partition, Band};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A committed generation handed to a render sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub grid: Grid,
    pub generation: u64,
    /// Live cell count (the score line)
    pub live: usize,
}

pub struct Engine {
    barrier: Arc<BarrierCoordinator>,
    bands: Vec<Band>,
    handles: Vec<JoinHandle<()>>,
}

impl Engine {
    /// Seed the buffers and spawn one worker per band.
    pub fn start(seed: Grid, workers: usize) -> LifeResult<Self> {
        let bands = partition(seed.width(), workers)?;
        let barrier = Arc::new(BarrierCoordinator::new(GenerationBuffer::new(&seed), workers));

        let mut engine = Self {
            barrier,
            bands,
            handles: Vec::with_capacity(workers),
        };

        for (id, band) in engine.bands.clone().into_iter().enumerate() {
            let barrier = Arc::clone(&engine.barrier);
            let handle = thread::Builder::new()
                .name(format!("life-worker-{id}"))
                .spawn(move || worker_loop(id, band, &barrier))
                .map_err(|e| LifeError::Resource {
                    what: format!("worker thread {id}"),
                    message: e.to_string(),
                })?;
            engine.handles.push(handle);
        }

        tracing::info!(
            width = seed.width(),
            height = seed.height(),
            workers = engine.barrier.workers(),
            bands = ?engine.bands,
            "engine started"
        );
        Ok(engine)
    }

    #[cfg(test)]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Compute one generation; returns its number once committed.
    pub fn advance(&self) -> LifeResult<u64> {
        self.barrier.advance()
    }

    /// The committed generation, never taken mid-commit.
    pub fn snapshot(&self) -> LifeResult<Frame> {
        let (grid, generation) = self.barrier.snapshot()?;
        let live = grid.live_count();
        Ok(Frame {
            grid,
            generation,
            live,
        })
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.barrier.shutdown();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(id: usize, band: Band, barrier: &BarrierCoordinator) {
    tracing::debug!(worker = id, from = band.from, to = band.to, "worker started");
    loop {
        match barrier.arrive(id) {
            Ok(Release::Generation(_)) => {
                if let Err(err) = barrier.buffer().step_band(band) {
                    tracing::error!(worker = id, error = %err, "band step failed");
                    barrier.fail(err);
                    break;
                }
            }
            Ok(Release::Stop) => break,
            Err(err) => {
                tracing::error!(worker = id, error = %err, "barrier protocol violated");
                break;
            }
        }
    }
    tracing::debug!(worker = id, "worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::grid::{neighbor_count, Cell};
    use crate::grid::tests::grid_of;
    use crate::rules::next_state;
    use rand::prelude::*;

    /// Single-threaded reference: every cell from the same frozen grid.
    fn reference_step(grid: &Grid) -> Grid {
        let mut next = Grid::new(grid.width(), grid.height());
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                next.set(x, y, next_state(grid.cell(x, y), neighbor_count(grid, x, y)));
            }
        }
        next
    }

    #[test]
    fn isolated_cell_dies() {
        let engine = Engine::start(grid_of(&["000", "010", "000"]), 1).unwrap();
        assert_eq!(engine.advance().unwrap(), 1);
        let frame = engine.snapshot().unwrap();
        assert_eq!(frame.grid, Grid::new(3, 3));
        assert_eq!(frame.live, 0);
        assert_eq!(frame.generation, 1);
    }

    #[test]
    fn blinker_on_three_by_three_torus() {
        // On a 3x3 torus every cell neighbors all 8 others: with 3 alive,
        // the bar survives (2 neighbors) and every dead cell is born (3),
        // then the full grid starves from overcrowding (8).
        let engine = Engine::start(grid_of(&["000", "111", "000"]), 3).unwrap();

        engine.advance().unwrap();
        assert_eq!(engine.snapshot().unwrap().grid, grid_of(&["111", "111", "111"]));

        engine.advance().unwrap();
        let frame = engine.snapshot().unwrap();
        assert_eq!(frame.grid, grid_of(&["000", "000", "000"]));
        assert_eq!(frame.generation, 2);
    }

    #[test]
    fn blinker_oscillates_on_a_larger_torus() {
        let horizontal = grid_of(&["00000", "00000", "01110", "00000", "00000"]);
        let vertical = grid_of(&["00000", "00100", "00100", "00100", "00000"]);
        let engine = Engine::start(horizontal.clone(), 2).unwrap();

        engine.advance().unwrap();
        assert_eq!(engine.snapshot().unwrap().grid, vertical);
        engine.advance().unwrap();
        assert_eq!(engine.snapshot().unwrap().grid, horizontal);
    }

    #[test]
    fn snapshot_before_first_tick_is_the_seed() {
        let seed = grid_of(&["0110", "1001", "0110"]);
        let engine = Engine::start(seed.clone(), 2).unwrap();
        let frame = engine.snapshot().unwrap();
        assert_eq!(frame.grid, seed);
        assert_eq!(frame.generation, 0);
        assert_eq!(frame.live, 6);
    }

    #[test]
    fn result_is_independent_of_worker_count() {
        let mut rng = StdRng::seed_from_u64(0x11fe);
        let (w, h) = (23, 17);
        let mut seed = Grid::new(w, h);
        for y in 0..h {
            for x in 0..w {
                if rng.gen_bool(0.35) {
                    seed.set(x, y, Cell::Alive);
                }
            }
        }

        let mut expected = vec![seed.clone()];
        for _ in 0..30 {
            let next = reference_step(expected.last().unwrap());
            expected.push(next);
        }

        for workers in [1, 2, 3, 5, 8, 23] {
            let engine = Engine::start(seed.clone(), workers).unwrap();
            for (generation, want) in expected.iter().enumerate().skip(1) {
                assert_eq!(engine.advance().unwrap(), generation as u64);
                assert_eq!(
                    &engine.snapshot().unwrap().grid,
                    want,
                    "workers {workers}, generation {generation}"
                );
            }
        }
    }

    #[test]
    fn too_many_workers_is_a_config_error() {
        let err = Engine::start(Grid::new(3, 3), 4).err().unwrap();
        assert_eq!(
            err,
            LifeError::Config(ConfigError::TooManyWorkers { workers: 4, width: 3 })
        );
    }

    #[test]
    fn one_by_one_alive_cell_dies_of_its_own_reflection() {
        let engine = Engine::start(grid_of(&["1"]), 1).unwrap();
        engine.advance().unwrap();
        assert_eq!(engine.snapshot().unwrap().live, 0);
    }

    #[test]
    fn drop_joins_workers() {
        let engine = Engine::start(grid_of(&["0110", "0110"]), 4).unwrap();
        assert_eq!(engine.bands().len(), 4);
        engine.advance().unwrap();
        drop(engine);
    }
}
