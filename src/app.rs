#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow potential wrapping when casting between types as board coordinates are within reasonable ranges
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use std::error;

use crate::Time;
use crate::components::{Board, GamePhase, GameState, GravityTimer, Input, Position, TetrominoType};
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, STARTING_LEVEL};
use crate::systems;

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

pub struct App {
    pub world: World,
    pub should_quit: bool,
}

impl App {
    /// Builds a world in the `NotStarted` phase. The first session begins
    /// when `start` is called.
    #[must_use]
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(Input::default());
        world.insert_resource(GameState::default());
        world.insert_resource(Board::empty(BOARD_WIDTH, BOARD_HEIGHT));
        world.insert_resource(GravityTimer::for_level(STARTING_LEVEL));

        Self {
            world,
            should_quit: false,
        }
    }

    /// Starts a fresh session; valid from `NotStarted` and `GameOver`.
    pub fn start(&mut self) {
        systems::start_game(&mut self.world);
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.world.resource::<GameState>().phase
    }

    /// Read-only render snapshot: the locked board cells composited with
    /// the active piece. Cells still above the visible board are omitted.
    pub fn get_render_blocks(&mut self) -> Vec<(Position, TetrominoType)> {
        let mut blocks = Vec::new();

        let board = self.world.resource::<Board>();
        for x in 0..board.width {
            for y in 0..board.height {
                if let Some(kind) = board.cell(x, y) {
                    blocks.push((
                        Position {
                            x: x as i32,
                            y: y as i32,
                        },
                        kind,
                    ));
                }
            }
        }

        let piece_blocks: Vec<_> = self
            .world
            .query::<(&crate::components::Tetromino, &Position)>()
            .iter(&self.world)
            .flat_map(|(tetromino, position)| {
                let kind = tetromino.kind;
                tetromino
                    .cells(*position)
                    .into_iter()
                    .filter(|&(_, y)| y >= 0)
                    .map(move |(x, y)| (Position { x, y }, kind))
            })
            .collect();

        blocks.extend(piece_blocks);
        blocks
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
