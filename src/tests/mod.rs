#![warn(clippy::all, clippy::pedantic)]

// Test modules
pub mod app_tests;
pub mod config_loader_tests;
pub mod game_tests;
pub mod time_tests;

// Import test utilities
#[cfg(test)]
pub mod test_utils {
    use crate::components::{
        Board, GamePhase, GameState, GravityTimer, Input, Position, Tetromino, TetrominoType,
    };
    use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, STARTING_LEVEL};
    use bevy_ecs::prelude::*;

    // Helper function to create a test world with standard game resources
    #[must_use]
    pub fn create_test_world() -> World {
        let mut world = World::new();
        world.insert_resource(Board::empty(BOARD_WIDTH, BOARD_HEIGHT));
        world.insert_resource(GameState::default());
        world.insert_resource(Input::default());
        world.insert_resource(GravityTimer::for_level(STARTING_LEVEL));
        world.insert_resource(crate::Time::new());
        world
    }

    // Same as create_test_world but with a session already running
    #[must_use]
    pub fn create_running_world() -> World {
        let mut world = create_test_world();
        world.resource_mut::<GameState>().phase = GamePhase::Running;
        world
    }

    // Spawns a specific piece at a specific anchor, bypassing the random draw
    pub fn spawn_piece_at(world: &mut World, kind: TetrominoType, anchor: Position) -> Entity {
        world.spawn((Tetromino::new(kind), anchor)).id()
    }

    // Fills an entire row of the board
    pub fn fill_row(board: &mut Board, y: usize, kind: TetrominoType) {
        for x in 0..board.width {
            board.set_cell(x, y, Some(kind));
        }
    }

    // Fills specific cells of the board for collision/clear scenarios
    pub fn fill_cells(board: &mut Board, cells: &[(usize, usize)], kind: TetrominoType) {
        for &(x, y) in cells {
            if x < board.width && y < board.height {
                board.set_cell(x, y, Some(kind));
            }
        }
    }
}
