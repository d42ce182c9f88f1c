use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::GRID_HEIGHT;
use crate::game::grid::Grid;
use crate::game::piece::{Piece, TetrominoKind};

/// Selectable playing-field widths; the height never changes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TableSize {
    Small,
    Medium,
    Large,
}

impl TableSize {
    pub fn width(self) -> usize {
        match self {
            TableSize::Small => 4,
            TableSize::Medium => 8,
            TableSize::Large => 12,
        }
    }
}

/// Session lifecycle. GameOver is terminal until a new game or a load.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Down,
}

/// Notifications pushed to subscribers after each committed change.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    StateChanged,
    GameOver { elapsed_secs: u64 },
}

/// Complete serializable session state. Loading a just-saved snapshot
/// reproduces the session exactly.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub table_size: TableSize,
    pub rows: Vec<Vec<u8>>,
    pub piece: Option<Piece>,
    pub elapsed_secs: u64,
    pub phase: Phase,
}

/// Why a snapshot cannot be adopted as a live session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SnapshotError {
    WrongDimensions,
    BadCellCode(u8),
    BadPiece,
    Terminated,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::WrongDimensions => {
                write!(f, "grid dimensions do not match the table size")
            }
            SnapshotError::BadCellCode(code) => write!(f, "unknown cell code {code}"),
            SnapshotError::BadPiece => write!(f, "active piece does not fit the grid"),
            SnapshotError::Terminated => write!(f, "a finished game cannot be resumed"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl Snapshot {
    /// Structural validation: dimensions, cell codes, piece placement, and
    /// a resumable phase.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let width = self.table_size.width();
        if self.rows.len() != GRID_HEIGHT || self.rows.iter().any(|row| row.len() != width) {
            return Err(SnapshotError::WrongDimensions);
        }
        if let Some(&code) = self.rows.iter().flatten().find(|&&code| code > 7) {
            return Err(SnapshotError::BadCellCode(code));
        }
        if self.phase == Phase::GameOver {
            return Err(SnapshotError::Terminated);
        }
        if let Some(piece) = self.piece {
            if piece.orientation >= piece.kind.orientations().len() {
                return Err(SnapshotError::BadPiece);
            }
            for (row, col) in piece.cells() {
                if row < 0 || row >= GRID_HEIGHT as i16 || col < 0 || col >= width as i16 {
                    return Err(SnapshotError::BadPiece);
                }
                if self.rows[row as usize][col as usize] != 0 {
                    return Err(SnapshotError::BadPiece);
                }
            }
        }
        Ok(())
    }
}

/// The simulation engine. Owns the grid and the active piece exclusively;
/// the shell drives it through tick/shift/rotate and reads snapshots back.
pub struct Game {
    grid: Grid,
    piece: Option<Piece>,
    table_size: TableSize,
    elapsed_secs: u64,
    phase: Phase,
    rng: StdRng,
    listeners: Vec<Sender<GameEvent>>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Fixed seed for reproducible piece sequences.
    pub fn new_seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            grid: Grid::new(TableSize::Medium.width()),
            piece: None,
            table_size: TableSize::Medium,
            elapsed_secs: 0,
            phase: Phase::Idle,
            rng,
            listeners: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn table_size(&self) -> TableSize {
        self.table_size
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Register a listener; disconnected receivers are dropped on the next
    /// emit. Events always describe a fully-committed state.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    fn emit(&mut self, event: GameEvent) {
        self.listeners.retain(|listener| listener.send(event).is_ok());
    }

    /// Renderable grid: settled codes with the active piece composited in.
    pub fn table(&self) -> Vec<Vec<u8>> {
        let mut rows: Vec<Vec<u8>> = (0..GRID_HEIGHT)
            .map(|row| self.grid.row_codes(row))
            .collect();
        if let Some(piece) = self.piece {
            for (row, col) in piece.cells() {
                rows[row as usize][col as usize] = piece.kind.code();
            }
        }
        rows
    }

    /// Reset to a fresh grid of the chosen width and start running.
    pub fn new_game(&mut self, size: TableSize) {
        self.table_size = size;
        self.grid = Grid::new(size.width());
        self.elapsed_secs = 0;
        self.phase = Phase::Running;
        self.piece = Some(self.draw_piece());
        info!("new game on a {}-column table", size.width());
        self.emit(GameEvent::StateChanged);
    }

    fn draw_piece(&mut self) -> Piece {
        let kind = TetrominoKind::ALL[self.rng.gen_range(0..TetrominoKind::ALL.len())];
        Piece::spawn(kind, self.grid.width())
    }

    /// One simulation step: advance the clock by a second and apply gravity.
    /// Fires exactly one event, so the shell clock refreshes every tick.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.elapsed_secs += 1;
        self.step_down();
    }

    /// Shift the piece one cell. An impossible sideways shift is silently
    /// rejected; an impossible downward shift locks the piece instead.
    pub fn shift(&mut self, direction: Direction) {
        if self.phase != Phase::Running {
            return;
        }
        match direction {
            Direction::Left => self.try_shift(0, -1),
            Direction::Right => self.try_shift(0, 1),
            Direction::Down => self.step_down(),
        }
    }

    fn try_shift(&mut self, dr: i16, dc: i16) {
        if let Some(piece) = self.piece {
            let moved = piece.shifted(dr, dc);
            if self.fits(&moved) {
                self.piece = Some(moved);
                self.emit(GameEvent::StateChanged);
            }
        }
    }

    /// Advance to the next orientation, or silently keep the current one if
    /// the rotated cells do not fit. No wall kicks.
    pub fn rotate(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if let Some(piece) = self.piece {
            let turned = piece.rotated();
            if self.fits(&turned) {
                self.piece = Some(turned);
                self.emit(GameEvent::StateChanged);
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    fn fits(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(row, col)| self.grid.is_free(row, col))
    }

    fn step_down(&mut self) {
        if let Some(piece) = self.piece {
            let dropped = piece.shifted(1, 0);
            if self.fits(&dropped) {
                self.piece = Some(dropped);
                self.emit(GameEvent::StateChanged);
            } else {
                self.lock_piece(piece);
            }
        }
    }

    fn lock_piece(&mut self, piece: Piece) {
        self.grid
            .settle(&piece.cells(), piece.kind)
            .expect("active piece occupies free cells");
        let cleared = self.grid.clear_full_rows();
        if cleared > 0 {
            debug!("cleared {cleared} full rows");
        }

        let next = self.draw_piece();
        if self.fits(&next) {
            self.piece = Some(next);
            self.emit(GameEvent::StateChanged);
        } else {
            // Blocked spawn is the sole game-over condition
            self.piece = None;
            self.phase = Phase::GameOver;
            info!("game over after {}s", self.elapsed_secs);
            self.emit(GameEvent::GameOver {
                elapsed_secs: self.elapsed_secs,
            });
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            table_size: self.table_size,
            rows: (0..GRID_HEIGHT)
                .map(|row| self.grid.row_codes(row))
                .collect(),
            piece: self.piece,
            elapsed_secs: self.elapsed_secs,
            phase: self.phase,
        }
    }

    /// Adopt a snapshot wholesale: every piece of live state is replaced in
    /// one step, or none is.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        snapshot.validate()?;
        self.table_size = snapshot.table_size;
        self.grid = Grid::from_codes(snapshot.table_size.width(), &snapshot.rows);
        self.piece = snapshot.piece;
        self.elapsed_secs = snapshot.elapsed_secs;
        self.phase = snapshot.phase;
        info!("restored a {}s session", self.elapsed_secs);
        self.emit(GameEvent::StateChanged);
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
