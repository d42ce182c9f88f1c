//! blockfall - a terminal falling-block puzzle game
//!
//! Core modules:
//! - `game`: simulation engine (grid, pieces, lifecycle, events)
//! - `persistence`: async save/load of game snapshots
//! - `input`: key-to-command translation
//! - `ui`: ratatui rendering of the grid snapshot

pub mod constants;
pub mod game;
pub mod input;
pub mod persistence;
pub mod ui;
