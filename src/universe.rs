//! Seeding the first generation: a '0'/'1' text file or a random soup.

use crate::error::LoadError;
use crate::grid::{Cell, Grid};
use rand::prelude::*;
use std::fs;
use std::path::Path;

/// Read and validate a seed file of exactly `height` lines of `width` cells.
pub fn load(path: &Path, width: usize, height: usize) -> Result<Grid, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse(&text, width, height)
}

/// Parse seed text. A trailing newline does not start an extra row and a
/// trailing `\r` on a line is ignored.
pub fn parse(text: &str, width: usize, height: usize) -> Result<Grid, LoadError> {
    let mut rows = Vec::new();

    for (row, line) in text.lines().enumerate() {
        if row >= height {
            return Err(LoadError::TooManyRows { expected: height });
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        let len = line.chars().count();
        if len > width {
            return Err(LoadError::RowTooLong { row: row + 1, expected: width, len });
        }
        if len < width {
            return Err(LoadError::RowTooShort { row: row + 1, expected: width, len });
        }

        let cells = line
            .chars()
            .enumerate()
            .map(|(col, symbol)| {
                Cell::from_symbol(symbol).ok_or(LoadError::InvalidSymbol {
                    row: row + 1,
                    col: col + 1,
                    symbol,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }

    if rows.len() < height {
        return Err(LoadError::TooFewRows { expected: height, found: rows.len() });
    }
    Ok(Grid::from_rows(rows))
}

/// Random soup where each cell is alive with probability `density`.
pub fn random(width: usize, height: usize, density: f64, rng: &mut StdRng) -> Grid {
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if rng.gen_bool(density) {
                grid.set(x, y, Cell::Alive);
            }
        }
    }
    grid
}
