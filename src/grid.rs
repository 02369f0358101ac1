//! Toroidal cell grid and wraparound neighbor lookup.

/// State of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    /// Byte encoding used by the generation buffers
    pub const DEAD_BYTE: u8 = 0;
    pub const ALIVE_BYTE: u8 = 1;

    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Cell::Dead => Self::DEAD_BYTE,
            Cell::Alive => Self::ALIVE_BYTE,
        }
    }

    /// Decode a stored byte; anything but 0 or 1 is corruption.
    pub fn from_byte(byte: u8) -> Option<Cell> {
        match byte {
            Self::DEAD_BYTE => Some(Cell::Dead),
            Self::ALIVE_BYTE => Some(Cell::Alive),
            _ => None,
        }
    }

    /// Seed file symbol ('0' dead, '1' alive)
    pub fn from_symbol(ch: char) -> Option<Cell> {
        match ch {
            '0' => Some(Cell::Dead),
            '1' => Some(Cell::Alive),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Dead => '0',
            Cell::Alive => '1',
        }
    }
}

/// Anything that can be read as a borderless `width x height` universe.
pub trait Torus {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn is_alive(&self, x: usize, y: usize) -> bool;
}

/// Count live cells among the 8 surrounding `(x, y)`, wrapping both axes.
///
/// On grids narrower or shorter than 3 the wrapped offsets land on the
/// same cell more than once, and each landing counts. On a 1x1 grid every
/// offset wraps onto the cell itself, so an alive lone cell sees 8
/// neighbors and a dead one sees 0.
#[inline]
pub fn neighbor_count<T: Torus + ?Sized>(grid: &T, x: usize, y: usize) -> u8 {
    let w = grid.width();
    let h = grid.height();
    let left = (x + w - 1) % w;
    let right = (x + 1) % w;
    let up = (y + h - 1) % h;
    let down = (y + 1) % h;

    let neighbors = [
        (left, up),
        (x, up),
        (right, up),
        (left, y),
        (right, y),
        (left, down),
        (x, down),
        (right, down),
    ];
    let mut count = 0u8;
    for (nx, ny) in neighbors {
        if grid.is_alive(nx, ny) {
            count += 1;
        }
    }
    count
}

/// Owned row-major grid, used for seeds and rendered snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-dead grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Dead; width * height],
        }
    }

    /// Build from rows. Rows must be rectangular; the loader guarantees it.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y * self.width + x] = cell;
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Rows of '0'/'1', newline terminated, the seed file format.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            out.extend(self.row(y).iter().map(|c| c.symbol()));
            out.push('\n');
        }
        out
    }
}

impl Torus for Grid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_alive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a grid from '0'/'1' strings
    pub(crate) fn grid_of(rows: &[&str]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|r| r.chars().map(|c| Cell::from_symbol(c).unwrap()).collect())
                .collect(),
        )
    }

    #[test]
    fn counts_interior_neighbors() {
        let g = grid_of(&["11100", "01000", "00000", "00000"]);
        assert_eq!(neighbor_count(&g, 1, 1), 3);
        assert_eq!(neighbor_count(&g, 1, 0), 3);
        assert_eq!(neighbor_count(&g, 3, 2), 0);
    }

    #[test]
    fn wraps_at_corners() {
        // Only the four corners are alive; on a torus they are mutual neighbors.
        let g = grid_of(&["10001", "00000", "00000", "10001"]);
        assert_eq!(neighbor_count(&g, 0, 0), 3);
        assert_eq!(neighbor_count(&g, 4, 3), 3);
        assert_eq!(neighbor_count(&g, 2, 1), 0);
    }

    #[test]
    fn lone_cell_on_one_by_one_sees_itself_eight_times() {
        let alive = grid_of(&["1"]);
        let dead = grid_of(&["0"]);
        assert_eq!(neighbor_count(&alive, 0, 0), 8);
        assert_eq!(neighbor_count(&dead, 0, 0), 0);
    }

    #[test]
    fn two_by_two_counts_wrapped_duplicates() {
        // On 2x2 each other cell is reached through two or four offsets.
        let g = grid_of(&["10", "00"]);
        assert_eq!(neighbor_count(&g, 1, 0), 2);
        assert_eq!(neighbor_count(&g, 0, 1), 2);
        assert_eq!(neighbor_count(&g, 1, 1), 4);
        assert_eq!(neighbor_count(&g, 0, 0), 0);
    }

    #[test]
    fn byte_decoding_rejects_garbage() {
        assert_eq!(Cell::from_byte(0), Some(Cell::Dead));
        assert_eq!(Cell::from_byte(1), Some(Cell::Alive));
        assert_eq!(Cell::from_byte(2), None);
        assert_eq!(Cell::from_byte(b'1'), None);
    }

    #[test]
    fn text_matches_rows() {
        let g = grid_of(&["010", "001"]);
        assert_eq!(g.to_text(), "010\n001\n");
        assert_eq!(g.live_count(), 2);
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
    }
}
