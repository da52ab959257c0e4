#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::components::{
        Board, GamePhase, GameState, GravityTimer, Position, Tetromino, TetrominoType,
    };
    use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};

    #[test]
    fn test_app_creation() {
        let app = App::new();

        // Nothing runs until an explicit start
        assert!(!app.should_quit);
        assert_eq!(app.phase(), GamePhase::NotStarted);

        // Check world was initialized with required resources
        assert!(app.world.contains_resource::<GameState>());
        assert!(app.world.contains_resource::<Board>());
        assert!(app.world.contains_resource::<GravityTimer>());
        assert!(app.world.contains_resource::<crate::Time>());
    }

    #[test]
    fn test_board_dimensions() {
        let app = App::new();
        let board = app.world.resource::<Board>();

        assert_eq!(board.width, BOARD_WIDTH);
        assert_eq!(board.height, BOARD_HEIGHT);
        assert_eq!(board.filled_cells(), 0);
    }

    #[test]
    fn test_start_enters_running_with_two_pieces() {
        let mut app = App::new();

        app.start();

        assert_eq!(app.phase(), GamePhase::Running);

        // One active piece on the board, one queued
        let piece_count = app
            .world
            .query::<(&Tetromino, &Position)>()
            .iter(&app.world)
            .count();
        assert_eq!(piece_count, 1);
        assert!(app.world.resource::<GameState>().next_tetromino.is_some());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut app = App::new();
        app.start();

        {
            let mut game_state = app.world.resource_mut::<GameState>();
            game_state.phase = GamePhase::GameOver;
            game_state.score = 999;
        }

        app.start();

        assert_eq!(app.phase(), GamePhase::Running);
        assert_eq!(app.world.resource::<GameState>().score, 0);
        assert_eq!(app.world.resource::<Board>().filled_cells(), 0);
    }

    #[test]
    fn test_get_render_blocks_composites_board_and_piece() {
        let mut app = App::new();

        // Nothing to draw before the first session
        assert!(app.get_render_blocks().is_empty());

        app.start();

        // The active piece contributes its visible cells
        let initial_blocks = app.get_render_blocks();
        assert_eq!(initial_blocks.len(), 4);

        // Locked cells show up alongside the active piece
        {
            let board = app.world.resource::<Board>();
            let with_block = board.with_piece(
                Position { x: 0, y: 17 },
                &Tetromino::new(TetrominoType::O),
            );
            app.world.insert_resource(with_block);
        }

        let blocks = app.get_render_blocks();
        assert_eq!(blocks.len(), 8);
        assert!(blocks.contains(&(Position { x: 0, y: 17 }, TetrominoType::O)));
    }

    #[test]
    fn test_render_blocks_hide_rows_above_the_board() {
        let mut app = App::new();
        app.world
            .spawn((Tetromino::new(TetrominoType::O), Position { x: 4, y: -1 }));

        // Only the lower half of the piece is visible
        let blocks = app.get_render_blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|(pos, _)| pos.y >= 0));
    }
}
