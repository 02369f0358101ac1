//! Conway's rule: birth on 3, survival on 2 or 3, death otherwise.

use crate::grid::Cell;

/// Next state of a cell given its live-neighbor count.
#[inline]
pub fn next_state(current: Cell, neighbors: u8) -> Cell {
    match (current, neighbors) {
        (_, 3) | (Cell::Alive, 2) => Cell::Alive,
        _ => Cell::Dead,
    }
}
