//! Column bands, one per worker.

use crate::error::ConfigError;
use std::ops::Range;

/// Half-open column range `[from, to)` owned by one worker for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    pub from: usize,
    pub to: usize,
}

impl Band {
    pub fn columns(&self) -> Range<usize> {
        self.from..self.to
    }

    pub fn width(&self) -> usize {
        self.to - self.from
    }

    pub fn contains(&self, x: usize) -> bool {
        self.columns().contains(&x)
    }
}

/// Split `[0, width)` into `workers` contiguous bands of `width / workers`
/// columns; the last band absorbs the remainder.
pub fn partition(width: usize, workers: usize) -> Result<Vec<Band>, ConfigError> {
    if width == 0 {
        return Err(ConfigError::ZeroWidth);
    }
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    let band_width = width / workers;
    if band_width == 0 {
        return Err(ConfigError::TooManyWorkers { workers, width });
    }

    Ok((0..workers)
        .map(|i| {
            let from = i * band_width;
            let to = if i == workers - 1 { width } else { from + band_width };
            Band { from, to }
        })
        .collect())
}
