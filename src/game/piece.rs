use serde::{Deserialize, Serialize};

/// The seven tetromino variants. Each maps to a settled color code 1..=7
/// (0 marks an empty grid cell).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TetrominoKind {
    T, L, S, O, Z, J, I
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [
        Self::T, Self::L, Self::S, Self::O, Self::Z, Self::J, Self::I,
    ];

    /// Numeric color code used in grid snapshots.
    pub fn code(self) -> u8 {
        match self {
            Self::T => 1,
            Self::L => 2,
            Self::S => 3,
            Self::O => 4,
            Self::Z => 5,
            Self::J => 6,
            Self::I => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::T),
            2 => Some(Self::L),
            3 => Some(Self::S),
            4 => Some(Self::O),
            5 => Some(Self::Z),
            6 => Some(Self::J),
            7 => Some(Self::I),
            _ => None,
        }
    }

    /// Rotation states in clockwise order, as (row, col) offsets from the
    /// anchor. Rotating past the last state wraps back to the first.
    pub fn orientations(self) -> &'static [[(i16, i16); 4]] {
        match self {
            Self::I => &[
                [(0, 0), (0, 1), (0, 2), (0, 3)],
                [(0, 0), (1, 0), (2, 0), (3, 0)],
            ],
            Self::O => &[
                [(0, 0), (0, 1), (1, 0), (1, 1)],
            ],
            Self::T => &[
                [(0, 1), (1, 0), (1, 1), (1, 2)],
                [(0, 1), (1, 1), (1, 2), (2, 1)],
                [(1, 0), (1, 1), (1, 2), (2, 1)],
                [(0, 1), (1, 0), (1, 1), (2, 1)],
            ],
            Self::S => &[
                [(0, 1), (0, 2), (1, 0), (1, 1)],
                [(0, 1), (1, 1), (1, 2), (2, 2)],
            ],
            Self::Z => &[
                [(0, 0), (0, 1), (1, 1), (1, 2)],
                [(0, 2), (1, 1), (1, 2), (2, 1)],
            ],
            Self::J => &[
                [(0, 0), (1, 0), (1, 1), (1, 2)],
                [(0, 1), (0, 2), (1, 1), (2, 1)],
                [(1, 0), (1, 1), (1, 2), (2, 2)],
                [(0, 1), (1, 1), (2, 0), (2, 1)],
            ],
            Self::L => &[
                [(0, 2), (1, 0), (1, 1), (1, 2)],
                [(0, 1), (1, 1), (2, 1), (2, 2)],
                [(1, 0), (1, 1), (1, 2), (2, 0)],
                [(0, 0), (0, 1), (1, 1), (2, 1)],
            ],
        }
    }
}

/// The falling tetromino: variant, orientation index, and anchor cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub orientation: usize,
    pub row: i16,
    pub col: i16,
}

impl Piece {
    /// Spawn at the top row, centered for the table width.
    pub fn spawn(kind: TetrominoKind, width: usize) -> Self {
        Self {
            kind,
            orientation: 0,
            row: 0,
            col: (width as i16 - 4) / 2,
        }
    }

    /// Absolute grid cells occupied at the current anchor and orientation.
    pub fn cells(&self) -> [(i16, i16); 4] {
        let shape = &self.kind.orientations()[self.orientation];
        let mut cells = [(0, 0); 4];
        for (cell, &(dr, dc)) in cells.iter_mut().zip(shape.iter()) {
            *cell = (self.row + dr, self.col + dc);
        }
        cells
    }

    pub fn shifted(&self, dr: i16, dc: i16) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
            ..*self
        }
    }

    /// Next clockwise orientation at the same anchor.
    pub fn rotated(&self) -> Self {
        Self {
            orientation: (self.orientation + 1) % self.kind.orientations().len(),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for kind in TetrominoKind::ALL {
            assert_eq!(TetrominoKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(TetrominoKind::from_code(0), None);
        assert_eq!(TetrominoKind::from_code(8), None);
    }

    #[test]
    fn test_orientations_are_four_distinct_cells() {
        for kind in TetrominoKind::ALL {
            for shape in kind.orientations() {
                let mut cells = shape.to_vec();
                cells.sort();
                cells.dedup();
                assert_eq!(cells.len(), 4, "{:?} has duplicate cells", kind);
                for &(dr, dc) in shape {
                    assert!((0..4).contains(&dr) && (0..4).contains(&dc));
                }
            }
        }
    }

    #[test]
    fn test_rotation_closure() {
        for kind in TetrominoKind::ALL {
            let mut piece = Piece::spawn(kind, 8);
            let original = piece.cells();
            for _ in 0..kind.orientations().len() {
                piece = piece.rotated();
            }
            assert_eq!(piece.cells(), original);

            // Four quarter turns always come back around
            let mut piece = Piece::spawn(kind, 8);
            for _ in 0..4 {
                piece = piece.rotated();
            }
            assert_eq!(piece.cells(), original);
        }
    }

    #[test]
    fn test_spawn_is_top_centered() {
        for (width, col) in [(4, 0), (8, 2), (12, 4)] {
            let piece = Piece::spawn(TetrominoKind::T, width);
            assert_eq!(piece.row, 0);
            assert_eq!(piece.col, col);
            assert_eq!(piece.orientation, 0);
        }
    }
}
