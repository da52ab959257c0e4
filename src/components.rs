#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use std::time::{Duration, Instant};

use crate::game::{self, LINES_PER_LEVEL, STARTING_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    /// Draws one of the seven shapes uniformly at random.
    #[must_use]
    pub fn random() -> Self {
        match fastrand::u8(0..7) {
            0 => TetrominoType::I,
            1 => TetrominoType::J,
            2 => TetrominoType::L,
            3 => TetrominoType::O,
            4 => TetrominoType::S,
            5 => TetrominoType::T,
            _ => TetrominoType::Z,
        }
    }

    /// Rotation-0 shape matrix, sized to the shape's bounding box so a
    /// generic NxN rotation works for every piece.
    #[must_use]
    pub fn base_matrix(self) -> Vec<Vec<u8>> {
        match self {
            TetrominoType::I => vec![
                vec![0, 0, 0, 0],
                vec![1, 1, 1, 1],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ],
            TetrominoType::J => vec![vec![1, 0, 0], vec![1, 1, 1], vec![0, 0, 0]],
            TetrominoType::L => vec![vec![0, 0, 1], vec![1, 1, 1], vec![0, 0, 0]],
            TetrominoType::O => vec![vec![1, 1], vec![1, 1]],
            TetrominoType::S => vec![vec![0, 1, 1], vec![1, 1, 0], vec![0, 0, 0]],
            TetrominoType::T => vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 0, 0]],
            TetrominoType::Z => vec![vec![1, 1, 0], vec![0, 1, 1], vec![0, 0, 0]],
        }
    }

    #[must_use]
    pub fn color(self) -> ratatui::style::Color {
        match self {
            TetrominoType::I => ratatui::style::Color::Cyan,
            TetrominoType::J => ratatui::style::Color::Blue,
            TetrominoType::L => ratatui::style::Color::LightYellow,
            TetrominoType::O => ratatui::style::Color::Yellow,
            TetrominoType::S => ratatui::style::Color::Green,
            TetrominoType::T => ratatui::style::Color::Magenta,
            TetrominoType::Z => ratatui::style::Color::Red,
        }
    }
}

/// Top-left anchor of a piece's shape matrix on the board. `y` grows
/// downward; negative `y` means the piece is still partially above the
/// visible board.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A tetromino in a particular rotation state. Treated as a value type:
/// rotating produces a new `Tetromino`, nothing mutates in place.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Tetromino {
    pub kind: TetrominoType,
    matrix: Vec<Vec<u8>>,
}

impl Tetromino {
    #[must_use]
    pub fn new(kind: TetrominoType) -> Self {
        Self {
            kind,
            matrix: kind.base_matrix(),
        }
    }

    /// Side length of the shape matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.matrix.len()
    }

    /// 90-degree clockwise rotation: `rotated[x][N-1-y] = original[y][x]`.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let n = self.matrix.len();
        let mut rotated = vec![vec![0u8; n]; n];
        for (y, row) in self.matrix.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                rotated[x][n - 1 - y] = cell;
            }
        }
        Self {
            kind: self.kind,
            matrix: rotated,
        }
    }

    /// Absolute board coordinates of the filled sub-cells at `anchor`.
    #[must_use]
    pub fn cells(&self, anchor: Position) -> Vec<(i32, i32)> {
        let mut cells = Vec::with_capacity(4);
        for (row, cols) in self.matrix.iter().enumerate() {
            for (col, &filled) in cols.iter().enumerate() {
                if filled != 0 {
                    cells.push((anchor.x + col as i32, anchor.y + row as i32));
                }
            }
        }
        cells
    }

    #[must_use]
    pub fn color(&self) -> ratatui::style::Color {
        self.kind.color()
    }
}

/// The playing field. Cells are indexed `[x][y]` with `x` the column and `y`
/// the row, row 0 at the top. A cell changes only through `with_piece` and
/// `without_rows`, both of which return a new board; the active piece is
/// never written here until it locks.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    cells: Vec<Vec<Option<TetrominoType>>>,
}

impl Board {
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![None; height]; width],
        }
    }

    /// True iff the cell exists in-bounds and is non-empty. Out-of-bounds
    /// coordinates are the business of `collides`, not this accessor.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return false;
        }
        self.cells[x as usize][y as usize].is_some()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<TetrominoType> {
        self.cells[x][y]
    }

    pub(crate) fn set_cell(&mut self, x: usize, y: usize, cell: Option<TetrominoType>) {
        self.cells[x][y] = cell;
    }

    /// Collision test for a piece at `anchor`: out of horizontal bounds,
    /// below the floor, or overlapping an occupied cell. Cells above the
    /// visible board (`y < 0`) do not collide on their own; they only matter
    /// at lock time.
    #[must_use]
    pub fn collides(&self, anchor: Position, piece: &Tetromino) -> bool {
        for (x, y) in piece.cells(anchor) {
            if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
                return true;
            }
            if y >= 0 && self.cells[x as usize][y as usize].is_some() {
                return true;
            }
        }
        false
    }

    /// Returns a new board with the piece's filled sub-cells written at
    /// `anchor`. Cells with `y < 0` are not written; the caller treats their
    /// presence as the game-over signal.
    #[must_use]
    pub fn with_piece(&self, anchor: Position, piece: &Tetromino) -> Self {
        let mut board = self.clone();
        for (x, y) in piece.cells(anchor) {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                board.cells[x as usize][y as usize] = Some(piece.kind);
            }
        }
        board
    }

    /// Row indices that are completely filled, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.height)
            .filter(|&y| (0..self.width).all(|x| self.cells[x][y].is_some()))
            .collect()
    }

    /// Returns a new board with the given rows removed and an equal number
    /// of empty rows prepended at the top. Relative order of the surviving
    /// rows is preserved, so everything above a cleared row falls by exactly
    /// the number of rows cleared below it.
    #[must_use]
    pub fn without_rows(&self, rows: &[usize]) -> Self {
        let mut board = self.clone();
        for x in 0..self.width {
            let mut column = vec![None; rows.len()];
            column.extend((0..self.height).filter(|y| !rows.contains(y)).map(|y| self.cells[x][y]));
            board.cells[x] = column;
        }
        board
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }
}

/// Session lifecycle: `NotStarted -> Running <-> Paused -> GameOver`, with
/// `GameOver` terminal until an explicit new start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Resource, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub start_level: u32,
    pub lines_cleared: u32,
    pub next_tetromino: Option<TetrominoType>,
    pub started_at: Option<Instant>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::default(),
            score: 0,
            level: STARTING_LEVEL,
            start_level: STARTING_LEVEL,
            lines_cleared: 0,
            next_tetromino: None,
            started_at: None,
        }
    }
}

impl GameState {
    /// Fresh session state entering `Running` at the given starting level.
    #[must_use]
    pub fn for_new_session(start_level: u32) -> Self {
        let start_level = start_level.max(1);
        Self {
            phase: GamePhase::Running,
            level: start_level,
            start_level,
            started_at: Some(Instant::now()),
            next_tetromino: Some(TetrominoType::random()),
            ..Self::default()
        }
    }

    /// Applies the scoring table for a simultaneous clear of `rows` lines.
    /// The award uses the level in effect before this clear updates the
    /// line count.
    pub fn apply_clear(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        self.score += game::line_clear_points(rows) * self.level;
        self.lines_cleared += rows as u32;
        self.update_level();
    }

    pub fn update_level(&mut self) {
        self.level = self.lines_cleared / LINES_PER_LEVEL + self.start_level;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Seconds since the session started.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at.map_or(0, |t| t.elapsed().as_secs())
    }
}

/// Owned, resettable gravity clock. Rebuilt whenever the session starts,
/// resumes, or the level changes; it is simply not advanced while paused or
/// after game over.
#[derive(Resource, Debug, Clone)]
pub struct GravityTimer {
    interval: Duration,
    elapsed: f32,
}

impl GravityTimer {
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        Self {
            interval: game::drop_interval(level),
            elapsed: 0.0,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Accumulates elapsed time; returns true when a gravity tick is due.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        self.elapsed += delta_seconds;
        if self.elapsed >= self.interval.as_secs_f32() {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

// Input state for keyboard controls, consumed once per game tick
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate: bool,
    pub hard_drop: bool,
    pub hard_drop_released: bool, // Track if the hard drop key has been released
    pub toggle_pause: bool,
}
