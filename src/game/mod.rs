pub mod grid;
pub mod piece;
pub mod state;

pub use grid::{Cell, Grid, GridError};
pub use piece::{Piece, TetrominoKind};
pub use state::{Direction, Game, GameEvent, Phase, Snapshot, SnapshotError, TableSize};
