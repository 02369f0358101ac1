//! Double-buffered generation storage.
//!
//! Two grids of identical size: `current` (frozen while a generation is
//! computed, read by every worker) and `next` (written band by band, each
//! band by exactly one worker). Committing flips which buffer is current;
//! nothing is copied.
//!
//! Cells are stored as `AtomicU8` so that shared reads and disjoint band
//! writes need neither locks nor `unsafe`. All accesses are relaxed: the
//! barrier mutex orders the last band write before the commit, and the
//! commit before any worker reads the next generation.

use crate::error::{LifeError, LifeResult};
use crate::grid::{neighbor_count, Cell, Grid, Torus};
use crate::partition::Band;
use crate::rules::next_state;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

pub struct GenerationBuffer {
    width: usize,
    height: usize,
    buffers: [Box<[AtomicU8]>; 2],
    /// Index of the current buffer; next is `current ^ 1`.
    current: AtomicUsize,
}

impl GenerationBuffer {
    /// Both buffers sized exactly to the seed, `current` holding the seed.
    pub fn new(seed: &Grid) -> Self {
        let alloc = || -> Box<[AtomicU8]> {
            (0..seed.width() * seed.height())
                .map(|_| AtomicU8::new(Cell::DEAD_BYTE))
                .collect()
        };
        let buffer = Self {
            width: seed.width(),
            height: seed.height(),
            buffers: [alloc(), alloc()],
            current: AtomicUsize::new(0),
        };
        for (slot, cell) in buffer.buffers[0].iter().zip(seed.cells()) {
            slot.store(cell.to_byte(), Ordering::Relaxed);
        }
        buffer
    }

    fn current_index(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// Read view of the committed generation.
    pub fn current(&self) -> Frozen<'_> {
        Frozen {
            width: self.width,
            height: self.height,
            cells: &self.buffers[self.current_index()],
        }
    }

    /// Write access to one band of the next generation.
    pub fn band_writer(&self, band: Band) -> BandWriter<'_> {
        BandWriter {
            width: self.width,
            band,
            cells: &self.buffers[self.current_index() ^ 1],
        }
    }

    /// Compute `band` of the next generation from the current one.
    pub fn step_band(&self, band: Band) -> LifeResult<()> {
        let current = self.current();
        let next = self.band_writer(band);
        for y in 0..self.height {
            for x in band.columns() {
                let cell = current.decode(x, y)?;
                next.write(x, y, next_state(cell, neighbor_count(&current, x, y)));
            }
        }
        Ok(())
    }

    /// Make `next` the new `current`.
    ///
    /// Only the barrier calls this, under its lock, after the last band of
    /// the generation is written and before any worker is released.
    pub(crate) fn commit(&self) {
        self.current.fetch_xor(1, Ordering::AcqRel);
    }

    /// Owned copy of the committed generation, validating every cell.
    pub fn snapshot(&self) -> LifeResult<Grid> {
        let current = self.current();
        let mut grid = Grid::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                grid.set(x, y, current.decode(x, y)?);
            }
        }
        Ok(grid)
    }

    #[cfg(test)]
    pub(crate) fn poke_current(&self, x: usize, y: usize, byte: u8) {
        self.buffers[self.current_index()][y * self.width + x].store(byte, Ordering::Relaxed);
    }
}

/// Read-only view of the committed generation.
pub struct Frozen<'a> {
    width: usize,
    height: usize,
    cells: &'a [AtomicU8],
}

impl Frozen<'_> {
    fn byte(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x].load(Ordering::Relaxed)
    }

    /// Decoded state of `(x, y)`; a byte outside {0, 1} means corruption.
    pub fn decode(&self, x: usize, y: usize) -> LifeResult<Cell> {
        let byte = self.byte(x, y);
        Cell::from_byte(byte).ok_or_else(|| {
            LifeError::Invariant(format!("cell ({x}, {y}) holds invalid state byte {byte}"))
        })
    }
}

impl Torus for Frozen<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_alive(&self, x: usize, y: usize) -> bool {
        self.byte(x, y) == Cell::ALIVE_BYTE
    }
}

/// Exclusive writer for one band of the next generation.
pub struct BandWriter<'a> {
    width: usize,
    band: Band,
    cells: &'a [AtomicU8],
}

impl BandWriter<'_> {
    pub fn write(&self, x: usize, y: usize, cell: Cell) {
        debug_assert!(self.band.contains(x), "column {x} outside band {:?}", self.band);
        self.cells[y * self.width + x].store(cell.to_byte(), Ordering::Relaxed);
    }
}
