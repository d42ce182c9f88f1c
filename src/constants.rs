// The playing field is always 16 rows tall; only the width is selectable.
pub const GRID_HEIGHT: usize = 16;

// Tick settings (in milliseconds)
pub const TICK_MS: u64 = 1000; // One gravity step and one clock second per tick
pub const POLL_MS: u64 = 50;   // Input poll timeout between ticks

// Default save file when no path is given on the command line
pub const DEFAULT_SAVE_PATH: &str = "blockfall-save.json";
