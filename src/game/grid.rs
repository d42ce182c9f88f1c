use std::fmt;

use crate::constants::GRID_HEIGHT;
use crate::game::piece::TetrominoKind;

/// A settled cell: empty, or holding the color of a locked variant.
pub type Cell = Option<TetrominoKind>;

/// Contract violations inside the grid. These mark engine bugs, not
/// user-facing conditions; callers assert rather than recover.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GridError {
    OutOfRange { row: i16, col: i16 },
    InvalidPlacement { row: i16, col: i16 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfRange { row, col } => {
                write!(f, "cell ({row}, {col}) is outside the grid")
            }
            GridError::InvalidPlacement { row, col } => {
                write!(f, "cell ({row}, {col}) cannot be settled")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// The playing field: GRID_HEIGHT rows of a selectable width, row-major.
#[derive(Clone, PartialEq, Debug)]
pub struct Grid {
    width: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            cells: vec![None; width * GRID_HEIGHT],
        }
    }

    /// Rebuild from numeric row snapshots. Codes outside 1..=7 become empty
    /// cells; rows beyond the grid are ignored. Callers validate first.
    pub fn from_codes(width: usize, rows: &[Vec<u8>]) -> Self {
        let mut grid = Self::new(width);
        for (row, codes) in rows.iter().enumerate() {
            for (col, &code) in codes.iter().enumerate() {
                if let Some(idx) = grid.index(row as i16, col as i16) {
                    grid.cells[idx] = TetrominoKind::from_code(code);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    fn index(&self, row: i16, col: i16) -> Option<usize> {
        if row < 0 || row >= GRID_HEIGHT as i16 || col < 0 || col >= self.width as i16 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    pub fn get(&self, row: i16, col: i16) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Occupancy query; out-of-range coordinates are a caller bug.
    pub fn is_occupied(&self, row: i16, col: i16) -> Result<bool, GridError> {
        match self.get(row, col) {
            Some(cell) => Ok(cell.is_some()),
            None => Err(GridError::OutOfRange { row, col }),
        }
    }

    /// In bounds and empty.
    pub fn is_free(&self, row: i16, col: i16) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Mark a set of currently-empty cells as settled blocks of `kind`.
    /// All-or-nothing: the grid is untouched unless every target is free.
    pub fn settle(&mut self, cells: &[(i16, i16)], kind: TetrominoKind) -> Result<(), GridError> {
        let mut indices = Vec::with_capacity(cells.len());
        for &(row, col) in cells {
            match self.index(row, col) {
                Some(idx) if self.cells[idx].is_none() => indices.push(idx),
                _ => return Err(GridError::InvalidPlacement { row, col }),
            }
        }
        for idx in indices {
            self.cells[idx] = Some(kind);
        }
        Ok(())
    }

    pub fn row_is_full(&self, row: usize) -> bool {
        if row >= GRID_HEIGHT {
            return false;
        }
        let start = row * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Remove every full row, shift the rows above down, and refill the top
    /// with empty rows. Relative order of surviving rows is preserved.
    /// Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut write_row = GRID_HEIGHT;

        // Walk from the bottom, compacting surviving rows downwards
        for read_row in (0..GRID_HEIGHT).rev() {
            if self.row_is_full(read_row) {
                cleared += 1;
            } else {
                write_row -= 1;
                if write_row != read_row {
                    let src = read_row * self.width;
                    let dst = write_row * self.width;
                    self.cells.copy_within(src..src + self.width, dst);
                }
            }
        }

        for cell in &mut self.cells[..write_row * self.width] {
            *cell = None;
        }

        cleared
    }

    /// One row of numeric color codes for the snapshot/render boundary.
    pub fn row_codes(&self, row: usize) -> Vec<u8> {
        let start = row * self.width;
        self.cells[start..start + self.width]
            .iter()
            .map(|cell| cell.map_or(0, TetrominoKind::code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row(grid: &mut Grid, row: i16, kind: TetrominoKind) {
        let cells: Vec<_> = (0..grid.width() as i16).map(|col| (row, col)).collect();
        grid.settle(&cells, kind).unwrap();
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), GRID_HEIGHT);
        for row in 0..GRID_HEIGHT {
            assert!(grid.row_codes(row).iter().all(|&code| code == 0));
        }
    }

    #[test]
    fn test_is_occupied_rejects_out_of_range() {
        let grid = Grid::new(8);
        assert_eq!(grid.is_occupied(0, 0), Ok(false));
        assert_eq!(
            grid.is_occupied(-1, 0),
            Err(GridError::OutOfRange { row: -1, col: 0 })
        );
        assert_eq!(
            grid.is_occupied(0, 8),
            Err(GridError::OutOfRange { row: 0, col: 8 })
        );
        assert_eq!(
            grid.is_occupied(GRID_HEIGHT as i16, 0),
            Err(GridError::OutOfRange { row: GRID_HEIGHT as i16, col: 0 })
        );
    }

    #[test]
    fn test_settle_marks_cells() {
        let mut grid = Grid::new(8);
        grid.settle(&[(15, 0), (15, 1)], TetrominoKind::O).unwrap();
        assert_eq!(grid.is_occupied(15, 0), Ok(true));
        assert_eq!(grid.is_occupied(15, 1), Ok(true));
        assert_eq!(grid.row_codes(15)[..2], [4, 4]);
    }

    #[test]
    fn test_settle_is_all_or_nothing() {
        let mut grid = Grid::new(8);
        grid.settle(&[(15, 1)], TetrominoKind::T).unwrap();

        // Second cell is taken, so the first must stay empty too
        let err = grid.settle(&[(15, 0), (15, 1)], TetrominoKind::S);
        assert_eq!(err, Err(GridError::InvalidPlacement { row: 15, col: 1 }));
        assert_eq!(grid.is_occupied(15, 0), Ok(false));

        let err = grid.settle(&[(15, 7), (15, 8)], TetrominoKind::S);
        assert_eq!(err, Err(GridError::InvalidPlacement { row: 15, col: 8 }));
        assert_eq!(grid.is_occupied(15, 7), Ok(false));
    }

    #[test]
    fn test_clear_no_full_rows() {
        let mut grid = Grid::new(4);
        grid.settle(&[(15, 0), (15, 1), (15, 2)], TetrominoKind::J)
            .unwrap();
        assert_eq!(grid.clear_full_rows(), 0);
        assert_eq!(grid.row_codes(15), vec![6, 6, 6, 0]);
    }

    #[test]
    fn test_clear_removes_exactly_the_full_rows() {
        let mut grid = Grid::new(4);
        full_row(&mut grid, 13, TetrominoKind::S);
        grid.settle(&[(14, 0)], TetrominoKind::O).unwrap();
        full_row(&mut grid, 15, TetrominoKind::T);

        assert_eq!(grid.clear_full_rows(), 2);

        // The lone partial row dropped to the bottom, everything else empty
        assert_eq!(grid.row_codes(15), vec![4, 0, 0, 0]);
        for row in 0..15 {
            assert!(grid.row_codes(row).iter().all(|&code| code == 0));
        }
    }

    #[test]
    fn test_clear_preserves_survivor_order() {
        let mut grid = Grid::new(4);
        grid.settle(&[(12, 0)], TetrominoKind::Z).unwrap(); // A
        full_row(&mut grid, 13, TetrominoKind::I);
        grid.settle(&[(14, 1)], TetrominoKind::L).unwrap(); // B
        full_row(&mut grid, 15, TetrominoKind::I);

        assert_eq!(grid.clear_full_rows(), 2);
        assert_eq!(grid.row_codes(14), vec![5, 0, 0, 0]); // A above
        assert_eq!(grid.row_codes(15), vec![0, 2, 0, 0]); // B below
    }

    #[test]
    fn test_from_codes_round_trip() {
        let mut grid = Grid::new(8);
        grid.settle(&[(0, 0), (9, 3), (15, 7)], TetrominoKind::I)
            .unwrap();
        let rows: Vec<Vec<u8>> = (0..GRID_HEIGHT).map(|row| grid.row_codes(row)).collect();
        assert_eq!(Grid::from_codes(8, &rows), grid);
    }
}
